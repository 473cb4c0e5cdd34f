//! Usage infrastructure - daily message accounting

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresUsageLogRepository;
pub use repository::InMemoryUsageLogRepository;
pub use service::UsageService;
