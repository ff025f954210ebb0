use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;

use fundmatch_core::funding::{
    FundingError, FundingKind, FundingLedger, NewSource, NewTarget, Source, Target,
};
use fundmatch_core::Result;

use super::model::{NewSourceDB, NewTargetDB, SourceDB, TargetDB};
use crate::errors::StorageError;
use crate::schema::{sources, targets};

/// Funding ledger bound to a connection that is already inside a transaction.
///
/// Commit and rollback belong to whoever opened the transaction, normally
/// the writer actor.
pub struct SqliteFundingLedger<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteFundingLedger<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        SqliteFundingLedger { conn }
    }
}

impl FundingLedger<Target> for SqliteFundingLedger<'_> {
    fn insert(&mut self, new_record: NewTarget, created_at: NaiveDateTime) -> Result<Target> {
        let new_target_db = NewTargetDB::new(new_record, created_at);
        let result_db = diesel::insert_into(targets::table)
            .values(&new_target_db)
            .returning(TargetDB::as_returning())
            .get_result(&mut *self.conn)
            .map_err(StorageError::from)?;
        Ok(Target::from(result_db))
    }

    fn get(&mut self, target_id: i32) -> Result<Target> {
        targets::table
            .find(target_id)
            .select(TargetDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Target::from)
            .ok_or_else(|| {
                FundingError::NotFound {
                    kind: FundingKind::Target,
                    id: target_id,
                }
                .into()
            })
    }

    fn query_open(&mut self) -> Result<Vec<Target>> {
        let open_db = targets::table
            .filter(targets::fully_invested.eq(false))
            .order((targets::created_at.asc(), targets::id.asc()))
            .select(TargetDB::as_select())
            .load(&mut *self.conn)
            .map_err(StorageError::from)?;
        Ok(open_db.into_iter().map(Target::from).collect())
    }

    fn save_all(&mut self, records: &[Target]) -> Result<()> {
        for record in records {
            let target_db: TargetDB = record.clone().into();
            let updated = diesel::update(targets::table.find(target_db.id))
                .set(&target_db)
                .execute(&mut *self.conn)
                .map_err(StorageError::from)?;
            if updated == 0 {
                return Err(FundingError::NotFound {
                    kind: FundingKind::Target,
                    id: target_db.id,
                }
                .into());
            }
        }
        Ok(())
    }
}

impl FundingLedger<Source> for SqliteFundingLedger<'_> {
    fn insert(&mut self, new_record: NewSource, created_at: NaiveDateTime) -> Result<Source> {
        let new_source_db = NewSourceDB::new(new_record, created_at);
        let result_db = diesel::insert_into(sources::table)
            .values(&new_source_db)
            .returning(SourceDB::as_returning())
            .get_result(&mut *self.conn)
            .map_err(StorageError::from)?;
        Ok(Source::from(result_db))
    }

    fn get(&mut self, source_id: i32) -> Result<Source> {
        sources::table
            .find(source_id)
            .select(SourceDB::as_select())
            .first(&mut *self.conn)
            .optional()
            .map_err(StorageError::from)?
            .map(Source::from)
            .ok_or_else(|| {
                FundingError::NotFound {
                    kind: FundingKind::Source,
                    id: source_id,
                }
                .into()
            })
    }

    fn query_open(&mut self) -> Result<Vec<Source>> {
        let open_db = sources::table
            .filter(sources::fully_invested.eq(false))
            .order((sources::created_at.asc(), sources::id.asc()))
            .select(SourceDB::as_select())
            .load(&mut *self.conn)
            .map_err(StorageError::from)?;
        Ok(open_db.into_iter().map(Source::from).collect())
    }

    fn save_all(&mut self, records: &[Source]) -> Result<()> {
        for record in records {
            let source_db: SourceDB = record.clone().into();
            let updated = diesel::update(sources::table.find(source_db.id))
                .set(&source_db)
                .execute(&mut *self.conn)
                .map_err(StorageError::from)?;
            if updated == 0 {
                return Err(FundingError::NotFound {
                    kind: FundingKind::Source,
                    id: source_db.id,
                }
                .into());
            }
        }
        Ok(())
    }
}
