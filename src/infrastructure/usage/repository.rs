//! In-memory usage log repository

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::usage::{AiUsageLog, UsageLogRepository};
use crate::domain::DomainError;

/// In-memory implementation of UsageLogRepository, keyed by (user, day)
#[derive(Debug, Default)]
pub struct InMemoryUsageLogRepository {
    logs: RwLock<HashMap<(Uuid, NaiveDate), AiUsageLog>>,
}

impl InMemoryUsageLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageLogRepository for InMemoryUsageLogRepository {
    async fn find_for_day(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<AiUsageLog>, DomainError> {
        Ok(self.logs.read().unwrap().get(&(user_id, date)).cloned())
    }

    async fn create(&self, log: AiUsageLog) -> Result<AiUsageLog, DomainError> {
        let mut logs = self.logs.write().unwrap();
        let key = (log.user_id(), log.date());

        if logs.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Usage log for user '{}' on {} already exists",
                log.user_id(),
                log.date()
            )));
        }

        logs.insert(key, log.clone());
        Ok(log)
    }

    async fn increment(&self, user_id: Uuid, date: NaiveDate) -> Result<(), DomainError> {
        let mut logs = self.logs.write().unwrap();

        match logs.get_mut(&(user_id, date)) {
            Some(log) => {
                log.increment();
                Ok(())
            }
            None => Err(DomainError::not_found(format!(
                "Usage log for user '{}' on {} not found",
                user_id, date
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_then_increment() {
        let repo = InMemoryUsageLogRepository::new();
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        repo.create(AiUsageLog::new(user_id, today)).await.unwrap();
        repo.increment(user_id, today).await.unwrap();

        let log = repo.find_for_day(user_id, today).await.unwrap().unwrap();
        assert_eq!(log.message_count(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let repo = InMemoryUsageLogRepository::new();
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();

        repo.create(AiUsageLog::new(user_id, today)).await.unwrap();

        let result = repo.create(AiUsageLog::new(user_id, today)).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_days_are_independent() {
        let repo = InMemoryUsageLogRepository::new();
        let user_id = Uuid::new_v4();
        let today = Utc::now().date_naive();
        let yesterday = today.pred_opt().unwrap();

        repo.create(AiUsageLog::new(user_id, yesterday)).await.unwrap();

        // A new day gets its own record
        assert!(repo.find_for_day(user_id, today).await.unwrap().is_none());
        repo.create(AiUsageLog::new(user_id, today)).await.unwrap();

        let log = repo.find_for_day(user_id, today).await.unwrap().unwrap();
        assert_eq!(log.message_count(), 1);
    }
}
