//! Greedy allocation of one record's balance over the open records of the
//! opposite kind.
//!
//! The engine is pure: it mutates the records it is given and reports what it
//! did. Persistence and serialization of runs are the caller's job, see
//! [`allocate_on_create`].

use chrono::NaiveDateTime;
use log::{debug, info};

use super::funding_errors::FundingError;
use super::funding_model::{Allocation, Fundable, InvestmentOutcome};
use super::funding_traits::FundingLedger;
use super::lifecycle::close_funding;
use crate::errors::Result;

/// Distributes the uninvested balance of `incoming` over `open`.
///
/// Candidates are visited once each, oldest first (`created_at`, then `id`).
/// Iteration stops as soon as `incoming` is fully invested; candidates after
/// that point are not touched and are not returned. Any record that reaches
/// its full amount, `incoming` included, goes through the closing rule.
pub fn invest<X, Y>(
    incoming: &mut X,
    mut open: Vec<Y>,
    now: NaiveDateTime,
) -> Result<InvestmentOutcome<Y>>
where
    X: Fundable,
    Y: Fundable,
{
    incoming
        .funding()
        .check_invariants(X::KIND, Some(incoming.id()))?;
    if !incoming.funding().is_open() {
        return Err(FundingError::AlreadyClosed {
            kind: X::KIND,
            id: incoming.id(),
        }
        .into());
    }

    let mut outcome = InvestmentOutcome {
        touched: Vec::new(),
        allocations: Vec::new(),
    };
    let mut remaining = incoming.funding().remaining();

    open.sort_by_key(|record| (record.funding().created_at, record.id()));

    for mut candidate in open {
        if remaining == 0 {
            break;
        }

        let candidate_id = candidate.id();
        candidate
            .funding()
            .check_invariants(Y::KIND, Some(candidate_id))?;
        if !candidate.funding().is_open() {
            return Err(FundingError::AlreadyClosed {
                kind: Y::KIND,
                id: candidate_id,
            }
            .into());
        }

        let capacity = candidate.funding().remaining();
        let delta = capacity.min(remaining);

        candidate.funding_mut().invested_amount += delta;
        remaining -= delta;

        let funding = candidate.funding();
        let counterpart_closed = funding.invested_amount == funding.full_amount;
        if counterpart_closed {
            close_funding(candidate.funding_mut(), now);
        }

        debug!(
            "{} {} -> {} {}: {} (capacity {}, remaining {})",
            X::KIND,
            incoming.id(),
            Y::KIND,
            candidate_id,
            delta,
            capacity,
            remaining
        );

        outcome.allocations.push(Allocation {
            counterpart_id: candidate_id,
            amount: delta,
            counterpart_closed,
        });
        outcome.touched.push(candidate);
    }

    let funding = incoming.funding_mut();
    funding.invested_amount = funding.full_amount - remaining;
    if remaining == 0 {
        close_funding(funding, now);
    }

    Ok(outcome)
}

/// Runs one allocation for a freshly created record.
///
/// Inserts the record stamped with `now`, reads the open set of the opposite kind, invests and
/// writes every touched record through `ledger`. The ledger must belong to a
/// single transaction; on error the caller rolls it back and nothing persists.
/// Returns the record as stored after the run.
pub fn allocate_on_create<X, L>(ledger: &mut L, new_record: X::New, now: NaiveDateTime) -> Result<X>
where
    X: Fundable,
    L: FundingLedger<X> + FundingLedger<X::Opposite>,
{
    let mut created = <L as FundingLedger<X>>::insert(ledger, new_record, now)?;
    let open = <L as FundingLedger<X::Opposite>>::query_open(ledger)?;
    let open_count = open.len();

    let outcome = invest(&mut created, open, now)?;

    <L as FundingLedger<X::Opposite>>::save_all(ledger, &outcome.touched)?;
    <L as FundingLedger<X>>::save_all(ledger, std::slice::from_ref(&created))?;

    info!(
        "{} {} created with {}: allocated {} over {} of {} open {}s{}",
        X::KIND,
        created.id(),
        created.funding().full_amount,
        outcome.total_allocated(),
        outcome.touched.len(),
        open_count,
        X::KIND.opposite(),
        if created.funding().fully_invested {
            ", closed"
        } else {
            ""
        }
    );

    <L as FundingLedger<X>>::get(ledger, created.id())
}
