use thiserror::Error;

use super::funding_model::FundingKind;

/// Errors raised by the allocation engine and the closing rule.
///
/// Every variant aborts the enclosing transaction; none are clamped or repaired.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FundingError {
    #[error("{kind} {id:?}: full amount must be positive, got {full_amount}")]
    NonPositiveFullAmount {
        kind: FundingKind,
        id: Option<i32>,
        full_amount: i64,
    },

    #[error("{kind} {id:?}: invested amount {invested_amount} outside 0..={full_amount}")]
    InvestedOutOfRange {
        kind: FundingKind,
        id: Option<i32>,
        invested_amount: i64,
        full_amount: i64,
    },

    #[error("{kind} {id:?}: closed flag and close date disagree")]
    InconsistentClosure { kind: FundingKind, id: Option<i32> },

    #[error("{kind} {id} is closed and cannot be modified")]
    AlreadyClosed { kind: FundingKind, id: i32 },

    #[error("{kind} {id} cannot be closed: invested {invested_amount} of {full_amount}")]
    NotFullyInvested {
        kind: FundingKind,
        id: i32,
        invested_amount: i64,
        full_amount: i64,
    },

    #[error("{kind} {id}: full amount {full_amount} is below the invested amount {invested_amount}")]
    FullAmountBelowInvested {
        kind: FundingKind,
        id: i32,
        full_amount: i64,
        invested_amount: i64,
    },

    #[error("{kind} {id} has received {invested_amount} and cannot be deleted")]
    AlreadyInvested {
        kind: FundingKind,
        id: i32,
        invested_amount: i64,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: FundingKind, id: i32 },
}
