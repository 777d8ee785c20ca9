use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::info;
use crate::domain::{
    models::{availability::AvailabilityBlock, time_range::TimeRange, user::UserRole},
    ports::AvailabilityRepository,
};
use crate::error::AppError;

/// No retroactive scheduling: a block may start at `now` but not before.
pub fn validate_block(range: &TimeRange, now: DateTime<Utc>) -> Result<(), AppError> {
    if range.starts_before(now) {
        return Err(AppError::Validation("Cannot create availability in the past".into()));
    }
    Ok(())
}

pub struct AvailabilityEditor {
    repo: Arc<dyn AvailabilityRepository>,
}

impl AvailabilityEditor {
    pub fn new(repo: Arc<dyn AvailabilityRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_block(
        &self,
        provider_id: &str,
        role: UserRole,
        range: TimeRange,
        is_blockout: bool,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailabilityBlock>, AppError> {
        if role != UserRole::Provider {
            return Err(AppError::Forbidden("Only providers can edit availability".into()));
        }
        validate_block(&range, now)?;

        let block = AvailabilityBlock::new(provider_id.to_string(), range, is_blockout);
        let created = self.repo.create(&block).await?;
        info!(block_id = %created.id, is_blockout, "Availability block created");

        self.repo.list_by_provider(provider_id).await
    }

    pub async fn delete_block(&self, provider_id: &str, block_id: &str) -> Result<Vec<AvailabilityBlock>, AppError> {
        let block = self.repo.find_by_id(block_id).await?
            .ok_or(AppError::NotFound("Availability block not found".into()))?;

        if block.provider_id != provider_id {
            return Err(AppError::Forbidden("Block belongs to another provider".into()));
        }

        self.repo.delete(provider_id, block_id).await?;
        info!(block_id, "Availability block deleted");

        self.repo.list_by_provider(provider_id).await
    }

    pub async fn list(&self, provider_id: &str) -> Result<Vec<AvailabilityBlock>, AppError> {
        self.repo.list_by_provider(provider_id).await
    }
}
