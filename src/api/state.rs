//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::JwtGenerator;
use crate::infrastructure::budget::BudgetService;
use crate::infrastructure::category::CategoryService;
use crate::infrastructure::chat::ChatService;
use crate::infrastructure::expense::ExpenseService;
use crate::infrastructure::user::UserService;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub category_service: Arc<CategoryService>,
    pub expense_service: Arc<ExpenseService>,
    pub budget_service: Arc<BudgetService>,
    pub chat_service: Arc<ChatService>,
    pub jwt_service: Arc<dyn JwtGenerator>,
}

impl AppState {
    pub fn new(
        user_service: Arc<UserService>,
        category_service: Arc<CategoryService>,
        expense_service: Arc<ExpenseService>,
        budget_service: Arc<BudgetService>,
        chat_service: Arc<ChatService>,
        jwt_service: Arc<dyn JwtGenerator>,
    ) -> Self {
        Self {
            user_service,
            category_service,
            expense_service,
            budget_service,
            chat_service,
            jwt_service,
        }
    }
}
