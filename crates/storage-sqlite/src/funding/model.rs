//! Database models for targets and sources.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use fundmatch_core::funding::{Funding, NewSource, NewTarget, Source, Target};

/// Database model for targets
#[derive(Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::targets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct TargetDB {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

/// Database model for creating a new target
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::targets)]
pub struct NewTargetDB {
    pub name: String,
    pub description: String,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: NaiveDateTime,
}

/// Database model for sources
#[derive(Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct SourceDB {
    pub id: i32,
    pub donor_id: Option<String>,
    pub comment: Option<String>,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: NaiveDateTime,
    pub closed_at: Option<NaiveDateTime>,
}

/// Database model for creating a new source
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::sources)]
pub struct NewSourceDB {
    pub donor_id: Option<String>,
    pub comment: Option<String>,
    pub full_amount: i64,
    pub invested_amount: i64,
    pub fully_invested: bool,
    pub created_at: NaiveDateTime,
}

// Conversion to domain models
impl From<TargetDB> for Target {
    fn from(db: TargetDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            funding: Funding {
                full_amount: db.full_amount,
                invested_amount: db.invested_amount,
                fully_invested: db.fully_invested,
                created_at: db.created_at,
                closed_at: db.closed_at,
            },
        }
    }
}

impl From<SourceDB> for Source {
    fn from(db: SourceDB) -> Self {
        Self {
            id: db.id,
            donor_id: db.donor_id,
            comment: db.comment,
            funding: Funding {
                full_amount: db.full_amount,
                invested_amount: db.invested_amount,
                fully_invested: db.fully_invested,
                created_at: db.created_at,
                closed_at: db.closed_at,
            },
        }
    }
}

// Conversion from domain models
impl From<Target> for TargetDB {
    fn from(domain: Target) -> Self {
        Self {
            id: domain.id,
            name: domain.name,
            description: domain.description,
            full_amount: domain.funding.full_amount,
            invested_amount: domain.funding.invested_amount,
            fully_invested: domain.funding.fully_invested,
            created_at: domain.funding.created_at,
            closed_at: domain.funding.closed_at,
        }
    }
}

impl From<Source> for SourceDB {
    fn from(domain: Source) -> Self {
        Self {
            id: domain.id,
            donor_id: domain.donor_id,
            comment: domain.comment,
            full_amount: domain.funding.full_amount,
            invested_amount: domain.funding.invested_amount,
            fully_invested: domain.funding.fully_invested,
            created_at: domain.funding.created_at,
            closed_at: domain.funding.closed_at,
        }
    }
}

// New records start open with nothing invested.
impl NewTargetDB {
    pub fn new(domain: NewTarget, created_at: NaiveDateTime) -> Self {
        Self {
            name: domain.name,
            description: domain.description,
            full_amount: domain.full_amount,
            invested_amount: 0,
            fully_invested: false,
            created_at,
        }
    }
}

impl NewSourceDB {
    pub fn new(domain: NewSource, created_at: NaiveDateTime) -> Self {
        Self {
            donor_id: domain.donor_id,
            comment: domain.comment,
            full_amount: domain.full_amount,
            invested_amount: 0,
            fully_invested: false,
            created_at,
        }
    }
}
