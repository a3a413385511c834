//! bookstore - book inventory over a single JSON document
//!
//! The document store loads, validates and atomically rewrites one file
//! under a readers-writer lock. On top of it sit an in-memory query engine,
//! a CSV bulk-merge importer and exporter, and the inventory service that
//! ties them together.

pub mod bulk;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod inventory;
pub mod observability;
pub mod query;
pub mod schema;
pub mod storage;
