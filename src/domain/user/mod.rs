//! User domain - authentication identity and ownership root

mod entity;
mod repository;

pub use entity::{User, UserRole};
pub use repository::UserRepository;
