//! Closing rule and the edit paths that lead to it outside of allocation.

use chrono::NaiveDateTime;
use log::{debug, info};

use super::funding_errors::FundingError;
use super::funding_model::{Fundable, Funding, FundingKind, Target, TargetUpdate};
use super::funding_traits::FundingLedger;
use crate::errors::Result;

/// Marks funding as fully invested.
///
/// Idempotent: the close date is only set the first time.
pub fn close_funding(funding: &mut Funding, now: NaiveDateTime) {
    funding.invested_amount = funding.full_amount;
    funding.fully_invested = true;
    if funding.closed_at.is_none() {
        funding.closed_at = Some(now);
    }
}

/// Closes a record whose invested amount already equals its full amount.
///
/// Closing an already closed record is a no-op. A record that still misses
/// funding is rejected rather than having its balance written off.
pub fn close_manually<R: Fundable>(record: &mut R, now: NaiveDateTime) -> Result<()> {
    let id = record.id();
    let funding = record.funding();
    funding.check_invariants(R::KIND, Some(id))?;

    if !funding.is_open() {
        debug!("{} {} already closed", R::KIND, id);
        return Ok(());
    }
    if funding.invested_amount != funding.full_amount {
        return Err(FundingError::NotFullyInvested {
            kind: R::KIND,
            id,
            invested_amount: funding.invested_amount,
            full_amount: funding.full_amount,
        }
        .into());
    }

    close_funding(record.funding_mut(), now);
    Ok(())
}

/// Applies an edit to an open target.
///
/// The new full amount may not drop below what has already been invested.
/// When it lands exactly on the invested amount the target is closed.
pub fn apply_target_update(
    target: &mut Target,
    update: TargetUpdate,
    now: NaiveDateTime,
) -> Result<()> {
    if !target.funding.is_open() {
        return Err(FundingError::AlreadyClosed {
            kind: FundingKind::Target,
            id: target.id,
        }
        .into());
    }
    update.validate()?;

    if let Some(full_amount) = update.full_amount {
        if full_amount < target.funding.invested_amount {
            return Err(FundingError::FullAmountBelowInvested {
                kind: FundingKind::Target,
                id: target.id,
                full_amount,
                invested_amount: target.funding.invested_amount,
            }
            .into());
        }
        target.funding.full_amount = full_amount;
    }
    if let Some(name) = update.name {
        target.name = name;
    }
    if let Some(description) = update.description {
        target.description = description;
    }

    target
        .funding
        .check_invariants(FundingKind::Target, Some(target.id))?;
    if target.funding.invested_amount == target.funding.full_amount {
        close_funding(&mut target.funding, now);
    }
    Ok(())
}

/// Only open records that never received any allocation may be deleted.
pub fn ensure_deletable<R: Fundable>(record: &R) -> Result<()> {
    let funding = record.funding();
    if !funding.is_open() {
        return Err(FundingError::AlreadyClosed {
            kind: R::KIND,
            id: record.id(),
        }
        .into());
    }
    if funding.invested_amount != 0 {
        return Err(FundingError::AlreadyInvested {
            kind: R::KIND,
            id: record.id(),
            invested_amount: funding.invested_amount,
        }
        .into());
    }
    Ok(())
}

/// Manual close as one unit of work on `ledger`.
pub fn close_in_ledger<R, L>(ledger: &mut L, id: i32, now: NaiveDateTime) -> Result<R>
where
    R: Fundable,
    L: FundingLedger<R>,
{
    let mut record = ledger.get(id)?;
    close_manually(&mut record, now)?;
    ledger.save_all(std::slice::from_ref(&record))?;
    info!("{} {} closed manually", R::KIND, id);
    ledger.get(id)
}

/// Target edit as one unit of work on `ledger`.
pub fn update_target_in_ledger<L>(
    ledger: &mut L,
    id: i32,
    update: TargetUpdate,
    now: NaiveDateTime,
) -> Result<Target>
where
    L: FundingLedger<Target>,
{
    let mut target = ledger.get(id)?;
    apply_target_update(&mut target, update, now)?;
    ledger.save_all(std::slice::from_ref(&target))?;
    if target.funding.fully_invested {
        info!("target {} closed by edit", id);
    }
    ledger.get(id)
}
