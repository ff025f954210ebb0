//! SQLite storage implementation for targets, sources and their allocation.

mod ledger;
mod model;
mod repository;

pub use ledger::SqliteFundingLedger;
pub use model::{NewSourceDB, NewTargetDB, SourceDB, TargetDB};
pub use repository::FundingRepository;
