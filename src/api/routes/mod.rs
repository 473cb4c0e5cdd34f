//! Authenticated /api routes

pub mod admin;
pub mod ai;
pub mod budget;
pub mod categories;
pub mod expenses;

use axum::{
    routing::{get, post, put},
    Router,
};

use super::state::AppState;

/// Create the /api router
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route(
            "/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route("/categories", get(categories::list_categories))
        .route(
            "/budget",
            put(budget::set_budget)
                .get(budget::get_budget)
                .delete(budget::delete_budget),
        )
        .route("/ai/chat", post(ai::chat))
        .route("/admin/users", get(admin::list_users))
}
