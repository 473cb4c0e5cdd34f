//! Usage limiter - the per-user per-day gate in front of the model

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::domain::usage::{AiUsageLog, UsageLogRepository};
use crate::domain::DomainError;

/// Tracks daily AI message counts and enforces the configured cap.
/// The check runs before any model call; the recording runs after the first
/// model call of a turn succeeds, whatever the model decided to do.
pub struct UsageService {
    repository: Arc<dyn UsageLogRepository>,
    daily_limit: u32,
}

impl UsageService {
    pub fn new(repository: Arc<dyn UsageLogRepository>, daily_limit: u32) -> Self {
        Self {
            repository,
            daily_limit,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Whether the user has exhausted today's allowance
    pub async fn is_over_limit(&self, user_id: Uuid, date: NaiveDate) -> Result<bool, DomainError> {
        let count = self.count_for_day(user_id, date).await?;
        Ok(count >= self.daily_limit)
    }

    /// Today's message count for the user (0 when no record exists)
    pub async fn count_for_day(&self, user_id: Uuid, date: NaiveDate) -> Result<u32, DomainError> {
        Ok(self
            .repository
            .find_for_day(user_id, date)
            .await?
            .map(|log| log.message_count())
            .unwrap_or(0))
    }

    /// Count one model call: create today's record or increment it.
    /// A concurrent turn may create the row between our read and our insert;
    /// the unique constraint turns that into a Conflict and we fall back to
    /// an increment instead of failing the turn.
    pub async fn record_message(&self, user_id: Uuid, date: NaiveDate) -> Result<(), DomainError> {
        match self.repository.find_for_day(user_id, date).await? {
            Some(_) => self.repository.increment(user_id, date).await,
            None => match self.repository.create(AiUsageLog::new(user_id, date)).await {
                Ok(_) => Ok(()),
                Err(e) if e.is_conflict() => {
                    debug!(
                        user_id = %user_id,
                        "Concurrent turn created today's usage log; incrementing instead"
                    );
                    self.repository.increment(user_id, date).await
                }
                Err(e) => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::usage::repository::InMemoryUsageLogRepository;
    use chrono::Utc;

    fn create_service(limit: u32) -> (UsageService, Arc<InMemoryUsageLogRepository>) {
        let repo = Arc::new(InMemoryUsageLogRepository::new());
        (UsageService::new(repo.clone(), limit), repo)
    }

    #[tokio::test]
    async fn test_under_limit_until_cap() {
        let (service, _) = create_service(3);
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        for expected in 0..3 {
            assert_eq!(service.count_for_day(user_id, today).await.unwrap(), expected);
            assert!(!service.is_over_limit(user_id, today).await.unwrap());
            service.record_message(user_id, today).await.unwrap();
        }

        assert!(service.is_over_limit(user_id, today).await.unwrap());
    }

    #[tokio::test]
    async fn test_record_falls_back_on_conflict() {
        let (service, repo) = create_service(30);
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        // Another "turn" wins the create race after our read saw no row
        repo.create(AiUsageLog::new(user_id, today)).await.unwrap();

        // create() would conflict; the service must land on an increment.
        // Exercise the conflict path directly through the repository:
        let conflict = repo.create(AiUsageLog::new(user_id, today)).await;
        assert!(conflict.is_err());

        service.record_message(user_id, today).await.unwrap();
        assert_eq!(service.count_for_day(user_id, today).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_new_day_starts_fresh() {
        let (service, _) = create_service(30);
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();

        service.record_message(user_id, yesterday).await.unwrap();
        service.record_message(user_id, yesterday).await.unwrap();

        service.record_message(user_id, today).await.unwrap();

        assert_eq!(service.count_for_day(user_id, yesterday).await.unwrap(), 2);
        assert_eq!(service.count_for_day(user_id, today).await.unwrap(), 1);
    }
}
