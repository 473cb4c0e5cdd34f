//! Category domain - shared system defaults plus per-user categories

mod entity;
mod repository;

pub use entity::Category;
pub use repository::CategoryRepository;
