//! Category infrastructure - persistence and seeding

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresCategoryRepository;
pub use repository::InMemoryCategoryRepository;
pub use service::CategoryService;
