//! fundmatch core - funding targets, funding sources and the allocation
//! engine that matches them.
//!
//! This crate is database-agnostic. It defines the store traits that are
//! implemented by the `storage-sqlite` crate.

pub mod errors;
pub mod funding;

// Re-export common types from the funding module
pub use funding::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
