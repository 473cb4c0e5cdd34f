//! Expense domain - the core spending record

mod entity;
mod repository;

pub use entity::Expense;
pub use repository::{
    CategoryTotal, ExpenseFilter, ExpenseRecord, ExpenseRepository, ExpenseSummary,
};
