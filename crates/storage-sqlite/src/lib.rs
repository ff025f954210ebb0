//! SQLite storage implementation for fundmatch.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `fundmatch-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Diesel migrations
//! - The funding ledger and repository for targets and sources
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The allocation engine in `core` is database-agnostic and works through traits.
//!
//! ```text
//!        core (engine, services)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod config;
pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod funding;

// Re-export database utilities
pub use config::StorageConfig;
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use funding::FundingRepository;

// Re-export from fundmatch-core for convenience
pub use fundmatch_core::errors::{DatabaseError, Error, Result};
