//! bookstore CLI entry point
//!
//! Parses arguments and dispatches via `cli::run`. The response envelope is
//! already on stdout when an error reaches here; this only sets the exit
//! status.

use bookstore::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
