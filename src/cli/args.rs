//! CLI argument definitions using clap
//!
//! Commands:
//! - bookstore init
//! - bookstore list [--search] [--category] [--sort-by] [--order] [--page] [--page-size] [--if-none-match]
//! - bookstore get <isbn>
//! - bookstore categories
//! - bookstore create            (book JSON on stdin)
//! - bookstore update <isbn>     (patch JSON on stdin)
//! - bookstore delete <isbn>
//! - bookstore export [--output <path>]
//! - bookstore import [--input <path>]
//! - bookstore fingerprint

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookstore inventory over a single JSON document
#[derive(Parser, Debug)]
#[command(name = "bookstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(long, global = true, default_value = "./bookstore.config.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create the document (and the default schema file, if one is configured but absent)
    Init,

    /// List books with filtering, sorting and pagination
    List {
        /// Case-insensitive substring of title, any author, or ISBN
        #[arg(long)]
        search: Option<String>,

        /// Case-insensitive exact category
        #[arg(long)]
        category: Option<String>,

        /// isbn, title, author, year or price
        #[arg(long)]
        sort_by: Option<String>,

        /// asc or desc
        #[arg(long)]
        order: Option<String>,

        /// 1-based page number
        #[arg(long, default_value_t = 1, allow_hyphen_values = true)]
        page: i64,

        /// Items per page; 0 or less uses the configured default
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        page_size: i64,

        /// Fingerprint from an earlier listing; unchanged documents return no items
        #[arg(long)]
        if_none_match: Option<String>,
    },

    /// Fetch one book by ISBN
    Get { isbn: String },

    /// List distinct categories
    Categories,

    /// Create a book from JSON on stdin
    Create,

    /// Update a book from a JSON patch on stdin
    Update { isbn: String },

    /// Delete a book by ISBN
    Delete { isbn: String },

    /// Export all books as CSV
    Export {
        /// Write the CSV here instead of embedding it in the response
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Merge CSV rows into the store
    Import {
        /// Read the CSV from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the current change token
    Fingerprint,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
