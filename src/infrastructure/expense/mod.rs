//! Expense infrastructure - persistence and the expense service

pub mod postgres_repository;
pub mod repository;
pub mod service;

pub use postgres_repository::PostgresExpenseRepository;
pub use repository::InMemoryExpenseRepository;
pub use service::{ExpenseInput, ExpensePage, ExpenseService};
