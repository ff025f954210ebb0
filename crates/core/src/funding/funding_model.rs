//! Funding domain models.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::funding_errors::FundingError;
use crate::errors::{Result, ValidationError};

/// The two sides of the funding ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FundingKind {
    /// Demand side: a record requesting funding.
    Target,
    /// Supply side: a record providing funding.
    Source,
}

impl FundingKind {
    pub fn opposite(self) -> Self {
        match self {
            FundingKind::Target => FundingKind::Source,
            FundingKind::Source => FundingKind::Target,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingKind::Target => "target",
            FundingKind::Source => "source",
        }
    }
}

impl fmt::Display for FundingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Funding state shared by targets and sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Funding {
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

impl Funding {
    /// Fresh, untouched funding state.
    pub fn new(full_amount: i64, created_at: NaiveDateTime) -> Self {
        Self {
            full_amount,
            invested_amount: 0,
            fully_invested: false,
            created_at,
            closed_at: None,
        }
    }

    /// Amount still missing before the record is fully invested.
    pub fn remaining(&self) -> i64 {
        self.full_amount - self.invested_amount
    }

    pub fn is_open(&self) -> bool {
        !self.fully_invested
    }

    /// Checks `0 < full_amount` and `0 <= invested_amount <= full_amount`.
    pub fn check_invariants(&self, kind: FundingKind, id: Option<i32>) -> Result<()> {
        if self.full_amount <= 0 {
            return Err(FundingError::NonPositiveFullAmount {
                kind,
                id,
                full_amount: self.full_amount,
            }
            .into());
        }
        if self.invested_amount < 0 || self.invested_amount > self.full_amount {
            return Err(FundingError::InvestedOutOfRange {
                kind,
                id,
                invested_amount: self.invested_amount,
                full_amount: self.full_amount,
            }
            .into());
        }
        if self.fully_invested != self.closed_at.is_some() {
            return Err(FundingError::InconsistentClosure { kind, id }.into());
        }
        Ok(())
    }
}

/// A record that takes part in allocation.
///
/// Implemented by [`Target`] and [`Source`]; the allocation engine is written
/// once against this trait and instantiated in both directions.
pub trait Fundable: Clone + Send + 'static {
    /// Attributes needed to create a record of this kind.
    type New: Send + 'static;
    /// The kind this record is matched against.
    type Opposite: Fundable;

    const KIND: FundingKind;

    fn id(&self) -> i32;
    fn funding(&self) -> &Funding;
    fn funding_mut(&mut self) -> &mut Funding;
}

/// Domain model representing a funding target (e.g. a charity project).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(flatten)]
    pub funding: Funding,
}

/// Input model for creating a new target
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTarget {
    pub name: String,
    pub description: String,
    pub full_amount: i64,
}

impl NewTarget {
    pub fn validate(&self) -> Result<()> {
        validate_full_amount(self.full_amount)
    }
}

/// Partial update of a target. `None` fields are left unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TargetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub full_amount: Option<i64>,
}

impl TargetUpdate {
    pub fn validate(&self) -> Result<()> {
        match self.full_amount {
            Some(amount) => validate_full_amount(amount),
            None => Ok(()),
        }
    }
}

/// Domain model representing a funding source (e.g. a donation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: i32,
    pub donor_id: Option<String>,
    pub comment: Option<String>,
    #[serde(flatten)]
    pub funding: Funding,
}

/// Input model for creating a new source
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewSource {
    pub donor_id: Option<String>,
    pub comment: Option<String>,
    pub full_amount: i64,
}

impl NewSource {
    pub fn validate(&self) -> Result<()> {
        validate_full_amount(self.full_amount)
    }
}

fn validate_full_amount(full_amount: i64) -> Result<()> {
    if full_amount <= 0 {
        return Err(ValidationError::InvalidInput(format!(
            "full_amount must be greater than zero, got {}",
            full_amount
        ))
        .into());
    }
    Ok(())
}

impl Fundable for Target {
    type New = NewTarget;
    type Opposite = Source;

    const KIND: FundingKind = FundingKind::Target;

    fn id(&self) -> i32 {
        self.id
    }

    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

impl Fundable for Source {
    type New = NewSource;
    type Opposite = Target;

    const KIND: FundingKind = FundingKind::Source;

    fn id(&self) -> i32 {
        self.id
    }

    fn funding(&self) -> &Funding {
        &self.funding
    }

    fn funding_mut(&mut self) -> &mut Funding {
        &mut self.funding
    }
}

/// One step of an allocation run: `amount` moved between the incoming record
/// and the counterpart `counterpart_id` of the opposite kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Allocation {
    pub counterpart_id: i32,
    pub amount: i64,
    pub counterpart_closed: bool,
}

/// Result of distributing one record's balance over the open set.
#[derive(Debug, Clone)]
pub struct InvestmentOutcome<R> {
    /// Counterparts whose funding changed, in the order they were visited.
    pub touched: Vec<R>,
    pub allocations: Vec<Allocation>,
}

impl<R> InvestmentOutcome<R> {
    /// Total amount moved during the run.
    pub fn total_allocated(&self) -> i64 {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}
