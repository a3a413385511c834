//! Inventory service for bookstore
//!
//! Validation, lookup and uniqueness failures are returned as typed
//! `InventoryError`s; storage failures pass through unchanged.

mod errors;
mod service;

pub use errors::{InventoryError, InventoryResult};
pub use service::{Inventory, ListOutcome};
