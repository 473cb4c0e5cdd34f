//! Usage log repository trait

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::AiUsageLog;
use crate::domain::DomainError;

/// Repository for the per-user per-day AI usage counter
#[async_trait]
pub trait UsageLogRepository: Send + Sync {
    /// Find the record for a given user and UTC day
    async fn find_for_day(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AiUsageLog>, DomainError>;

    /// Persist a new record. Returns `DomainError::Conflict` when a record
    /// for the same (user, day) already exists - the caller falls back to
    /// an increment.
    async fn create(&self, log: AiUsageLog) -> Result<AiUsageLog, DomainError>;

    /// Increment the existing record for (user, day) by one
    async fn increment(&self, user_id: Uuid, date: NaiveDate) -> Result<(), DomainError>;
}
