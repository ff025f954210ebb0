use log::{debug, warn};
use std::sync::Arc;

use super::funding_model::{NewSource, NewTarget, Source, Target, TargetUpdate};
use super::funding_traits::{FundingRepositoryTrait, FundingServiceTrait};
use crate::errors::Result;

/// Service for creating, funding and closing targets and sources
pub struct FundingService {
    repository: Arc<dyn FundingRepositoryTrait>,
}

impl FundingService {
    pub fn new(repository: Arc<dyn FundingRepositoryTrait>) -> Self {
        FundingService { repository }
    }
}

#[async_trait::async_trait]
impl FundingServiceTrait for FundingService {
    fn get_targets(&self) -> Result<Vec<Target>> {
        self.repository.get_targets()
    }

    fn get_target(&self, target_id: i32) -> Result<Target> {
        self.repository.get_target(target_id)
    }

    fn get_open_targets(&self) -> Result<Vec<Target>> {
        self.repository.get_open_targets()
    }

    async fn create_target(&self, new_target: NewTarget) -> Result<Target> {
        if let Err(e) = new_target.validate() {
            warn!("Rejected target '{}': {}", new_target.name, e);
            return Err(e);
        }
        debug!(
            "Creating target '{}' with full amount {}",
            new_target.name, new_target.full_amount
        );
        self.repository.create_target(new_target).await
    }

    async fn update_target(&self, target_id: i32, update: TargetUpdate) -> Result<Target> {
        update.validate()?;
        self.repository.update_target(target_id, update).await
    }

    async fn close_target(&self, target_id: i32) -> Result<Target> {
        self.repository.close_target(target_id).await
    }

    async fn delete_target(&self, target_id: i32) -> Result<Target> {
        self.repository.delete_target(target_id).await
    }

    fn get_sources(&self) -> Result<Vec<Source>> {
        self.repository.get_sources()
    }

    fn get_source(&self, source_id: i32) -> Result<Source> {
        self.repository.get_source(source_id)
    }

    fn get_open_sources(&self) -> Result<Vec<Source>> {
        self.repository.get_open_sources()
    }

    fn get_sources_by_donor(&self, donor_id: &str) -> Result<Vec<Source>> {
        self.repository.get_sources_by_donor(donor_id)
    }

    async fn create_source(&self, new_source: NewSource) -> Result<Source> {
        if let Err(e) = new_source.validate() {
            warn!("Rejected source: {}", e);
            return Err(e);
        }
        debug!("Creating source with full amount {}", new_source.full_amount);
        self.repository.create_source(new_source).await
    }

    async fn close_source(&self, source_id: i32) -> Result<Source> {
        self.repository.close_source(source_id).await
    }
}
