//! Budget endpoints - get, set, delete

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

#[derive(Debug, Deserialize)]
pub struct SetBudgetRequest {
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct BudgetDto {
    pub amount: Decimal,
}

/// GET /api/budget - 204 when no budget is set
pub async fn get_budget(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    match state.budget_service.get(user.id()).await? {
        Some(budget) => Ok(Json(BudgetDto {
            amount: budget.amount(),
        })
        .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// PUT /api/budget - create or replace
pub async fn set_budget(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<SetBudgetRequest>,
) -> Result<StatusCode, ApiError> {
    state.budget_service.set(user.id(), request.amount).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/budget
pub async fn delete_budget(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<StatusCode, ApiError> {
    state.budget_service.delete(user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
