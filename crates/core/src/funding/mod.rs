//! Funding module - targets, sources and the allocation between them.

mod allocation;
mod funding_errors;
mod funding_model;
mod funding_service;
mod funding_traits;
mod lifecycle;

#[cfg(test)]
mod allocation_tests;

pub use allocation::{allocate_on_create, invest};
pub use funding_errors::FundingError;
pub use funding_model::{
    Allocation, Fundable, Funding, FundingKind, InvestmentOutcome, NewSource, NewTarget, Source,
    Target, TargetUpdate,
};
pub use funding_service::FundingService;
pub use funding_traits::{FundingLedger, FundingRepositoryTrait, FundingServiceTrait};
pub use lifecycle::{
    apply_target_update, close_funding, close_in_ledger, close_manually, ensure_deletable,
    update_target_in_ledger,
};
