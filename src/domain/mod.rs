//! Domain layer - entities, invariants, and the ports the
//! infrastructure implements

pub mod agent;
pub mod budget;
pub mod category;
pub mod error;
pub mod expense;
pub mod usage;
pub mod user;

pub use agent::{
    AgentClient, AgentReply, CategoryInfo, ChatMessage, StopReason, ToolInvocation,
    TOOL_CREATE_EXPENSE, TOOL_QUERY_EXPENSES,
};
pub use budget::{Budget, BudgetRepository};
pub use category::{Category, CategoryRepository};
pub use error::DomainError;
pub use expense::{
    CategoryTotal, Expense, ExpenseFilter, ExpenseRecord, ExpenseRepository, ExpenseSummary,
};
pub use usage::{AiUsageLog, UsageLogRepository};
pub use user::{User, UserRepository, UserRole};
