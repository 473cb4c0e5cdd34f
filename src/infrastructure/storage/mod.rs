//! Storage infrastructure - PostgreSQL connection and migrations

pub mod postgres;

pub use postgres::{connect, PostgresMigrator};
