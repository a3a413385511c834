//! CLI module for bookstore
//!
//! Provides a command-line surface over the inventory:
//! - init: Create the document (and default schema file)
//! - list, get, categories: Read operations
//! - create, update, delete: Single-record writes
//! - export, import: Bulk CSV transfer
//! - fingerprint: Current change token

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, init, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, read_request_from, write_error, write_response};
