//! AI usage log entity

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user per-day counter of AI assistant messages. The (user, date) pair
/// is unique; the count starts at 1 and only ever increases within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiUsageLog {
    id: Uuid,
    user_id: Uuid,
    /// UTC calendar date; any time-of-day component is discarded
    date: NaiveDate,
    message_count: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AiUsageLog {
    /// Create the first record of the day, counting one message
    pub fn new(user_id: Uuid, date: NaiveDate) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            message_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstruct a usage log from stored fields (repository restore)
    pub fn from_parts(
        id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
        message_count: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            date,
            message_count,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn message_count(&self) -> u32 {
        self.message_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Count one more message
    pub fn increment(&mut self) {
        self.message_count += 1;
        self.updated_at = Utc::now();
    }
}
