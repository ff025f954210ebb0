use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::info;
use std::sync::Arc;

use fundmatch_core::funding::{
    allocate_on_create, close_in_ledger, ensure_deletable, update_target_in_ledger,
    FundingLedger, FundingRepositoryTrait, NewSource, NewTarget, Source, Target, TargetUpdate,
};
use fundmatch_core::Result;

use super::ledger::SqliteFundingLedger;
use super::model::{SourceDB, TargetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{sources, targets};

pub struct FundingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FundingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        FundingRepository { pool, writer }
    }
}

#[async_trait]
impl FundingRepositoryTrait for FundingRepository {
    fn get_targets(&self) -> Result<Vec<Target>> {
        let mut conn = get_connection(&self.pool)?;
        let targets_db = targets::table
            .order((targets::created_at.asc(), targets::id.asc()))
            .select(TargetDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        Ok(targets_db.into_iter().map(Target::from).collect())
    }

    fn get_target(&self, target_id: i32) -> Result<Target> {
        let mut conn = get_connection(&self.pool)?;
        FundingLedger::<Target>::get(&mut SqliteFundingLedger::new(&mut conn), target_id)
    }

    fn get_open_targets(&self) -> Result<Vec<Target>> {
        let mut conn = get_connection(&self.pool)?;
        FundingLedger::<Target>::query_open(&mut SqliteFundingLedger::new(&mut conn))
    }

    async fn create_target(&self, new_target: NewTarget) -> Result<Target> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Target> {
                let mut ledger = SqliteFundingLedger::new(conn);
                allocate_on_create::<Target, _>(&mut ledger, new_target, Utc::now().naive_utc())
            })
            .await
    }

    async fn update_target(&self, target_id: i32, update: TargetUpdate) -> Result<Target> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Target> {
                let mut ledger = SqliteFundingLedger::new(conn);
                update_target_in_ledger(&mut ledger, target_id, update, Utc::now().naive_utc())
            })
            .await
    }

    async fn close_target(&self, target_id: i32) -> Result<Target> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Target> {
                let mut ledger = SqliteFundingLedger::new(conn);
                close_in_ledger::<Target, _>(&mut ledger, target_id, Utc::now().naive_utc())
            })
            .await
    }

    async fn delete_target(&self, target_id: i32) -> Result<Target> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Target> {
                let target =
                    FundingLedger::<Target>::get(&mut SqliteFundingLedger::new(conn), target_id)?;
                ensure_deletable(&target)?;
                diesel::delete(targets::table.find(target_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                info!("Deleted target {}", target_id);
                Ok(target)
            })
            .await
    }

    fn get_sources(&self) -> Result<Vec<Source>> {
        let mut conn = get_connection(&self.pool)?;
        let sources_db = sources::table
            .order((sources::created_at.asc(), sources::id.asc()))
            .select(SourceDB::as_select())
            .load(&mut conn)
            .map_err(StorageError::from)?;
        Ok(sources_db.into_iter().map(Source::from).collect())
    }

    fn get_source(&self, source_id: i32) -> Result<Source> {
        let mut conn = get_connection(&self.pool)?;
        FundingLedger::<Source>::get(&mut SqliteFundingLedger::new(&mut conn), source_id)
    }

    fn get_open_sources(&self) -> Result<Vec<Source>> {
        let mut conn = get_connection(&self.pool)?;
        FundingLedger::<Source>::query_open(&mut SqliteFundingLedger::new(&mut conn))
    }

    fn get_sources_by_donor(&self, donor: &str) -> Result<Vec<Source>> {
        let mut conn = get_connection(&self.pool)?;
        let sources_db = sources::table
            .filter(sources::donor_id.eq(donor))
            .order((sources::created_at.asc(), sources::id.asc()))
            .select(SourceDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(sources_db.into_iter().map(Source::from).collect())
    }

    async fn create_source(&self, new_source: NewSource) -> Result<Source> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Source> {
                let mut ledger = SqliteFundingLedger::new(conn);
                allocate_on_create::<Source, _>(&mut ledger, new_source, Utc::now().naive_utc())
            })
            .await
    }

    async fn close_source(&self, source_id: i32) -> Result<Source> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Source> {
                let mut ledger = SqliteFundingLedger::new(conn);
                close_in_ledger::<Source, _>(&mut ledger, source_id, Utc::now().naive_utc())
            })
            .await
    }
}
