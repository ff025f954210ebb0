//! Funding store, repository and service traits.
//!
//! These traits define the contract for funding operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::funding_model::{Fundable, NewSource, NewTarget, Source, Target, TargetUpdate};
use crate::errors::Result;

/// Store operations for one record kind, executed inside an open transaction.
///
/// Implementations are handed out by a repository for the duration of a
/// single unit of work. They must not commit on their own: the repository
/// commits or rolls back everything done through the ledger as a whole.
pub trait FundingLedger<R: Fundable> {
    /// Inserts a new record stamped with `created_at` and returns it with the
    /// store-assigned id.
    fn insert(&mut self, new_record: R::New, created_at: NaiveDateTime) -> Result<R>;

    /// Loads one record by id.
    fn get(&mut self, id: i32) -> Result<R>;

    /// All records with `fully_invested = false`, oldest first
    /// (`created_at` ascending, then `id` ascending).
    fn query_open(&mut self) -> Result<Vec<R>>;

    /// Writes the funding state (and attributes) of every given record.
    fn save_all(&mut self, records: &[R]) -> Result<()>;
}

/// Trait defining the contract for funding repository operations.
///
/// Every mutating method runs as one atomic unit of work: either all of its
/// writes persist or none do.
#[async_trait]
pub trait FundingRepositoryTrait: Send + Sync {
    fn get_targets(&self) -> Result<Vec<Target>>;
    fn get_target(&self, target_id: i32) -> Result<Target>;
    fn get_open_targets(&self) -> Result<Vec<Target>>;

    /// Inserts the target and allocates open sources to it.
    async fn create_target(&self, new_target: NewTarget) -> Result<Target>;
    async fn update_target(&self, target_id: i32, update: TargetUpdate) -> Result<Target>;
    async fn close_target(&self, target_id: i32) -> Result<Target>;
    /// Deletes an untouched target and returns it.
    async fn delete_target(&self, target_id: i32) -> Result<Target>;

    fn get_sources(&self) -> Result<Vec<Source>>;
    fn get_source(&self, source_id: i32) -> Result<Source>;
    fn get_open_sources(&self) -> Result<Vec<Source>>;
    fn get_sources_by_donor(&self, donor_id: &str) -> Result<Vec<Source>>;

    /// Inserts the source and allocates it to open targets.
    async fn create_source(&self, new_source: NewSource) -> Result<Source>;
    async fn close_source(&self, source_id: i32) -> Result<Source>;
}

/// Trait defining the contract for funding service operations.
#[async_trait]
pub trait FundingServiceTrait: Send + Sync {
    fn get_targets(&self) -> Result<Vec<Target>>;
    fn get_target(&self, target_id: i32) -> Result<Target>;
    fn get_open_targets(&self) -> Result<Vec<Target>>;

    /// Creates a target and immediately funds it from open sources.
    ///
    /// Returns the stored target with its final invested amount and closing state.
    async fn create_target(&self, new_target: NewTarget) -> Result<Target>;

    /// Edits a target. Setting `full_amount` equal to the invested amount closes it.
    async fn update_target(&self, target_id: i32, update: TargetUpdate) -> Result<Target>;

    /// Applies the closing rule to a target whose invested amount already
    /// equals its full amount.
    async fn close_target(&self, target_id: i32) -> Result<Target>;

    async fn delete_target(&self, target_id: i32) -> Result<Target>;

    fn get_sources(&self) -> Result<Vec<Source>>;
    fn get_source(&self, source_id: i32) -> Result<Source>;
    fn get_open_sources(&self) -> Result<Vec<Source>>;
    fn get_sources_by_donor(&self, donor_id: &str) -> Result<Vec<Source>>;

    /// Creates a source and immediately distributes it over open targets.
    async fn create_source(&self, new_source: NewSource) -> Result<Source>;

    async fn close_source(&self, source_id: i32) -> Result<Source>;
}
