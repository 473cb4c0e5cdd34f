//! Usage domain - daily AI message accounting

mod entity;
mod repository;

pub use entity::AiUsageLog;
pub use repository::UsageLogRepository;
