//! Expense CRUD endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::expense::{ExpenseFilter, ExpenseRecord};
use crate::infrastructure::expense::{ExpenseInput, ExpensePage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExpenseListParams {
    #[serde(default = "default_page_number")]
    pub page_number: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    pub category_id: Option<Uuid>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

fn default_page_number() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub notes: Option<String>,
}

impl ExpenseRequest {
    fn into_input(self) -> ExpenseInput {
        ExpenseInput {
            amount: self.amount,
            description: self.description,
            date: self.date,
            category_id: self.category_id,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDto {
    pub id: Uuid,
    pub amount: Decimal,
    pub description: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseDto {
    fn from_record(record: &ExpenseRecord) -> Self {
        let e = &record.expense;
        Self {
            id: e.id(),
            amount: e.amount(),
            description: e.description().to_string(),
            date: e.date(),
            notes: e.notes().map(str::to_string),
            category_id: e.category_id(),
            category_name: record.category_name.clone(),
            created_at: e.created_at(),
            updated_at: e.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryDto {
    pub category_name: String,
    pub amount: Decimal,
}

/// Paged list plus a summary over the whole filtered set
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListResponse {
    pub items: Vec<ExpenseDto>,
    pub total_count: usize,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub total_amount: Decimal,
    pub by_category: Vec<CategorySummaryDto>,
}

impl ExpenseListResponse {
    fn from_page(page: ExpensePage) -> Self {
        Self {
            total_pages: page.total_pages(),
            has_previous_page: page.has_previous_page(),
            has_next_page: page.has_next_page(),
            items: page.items.iter().map(ExpenseDto::from_record).collect(),
            total_count: page.total_count,
            page_number: page.page_number,
            page_size: page.page_size,
            total_amount: page.total_amount,
            by_category: page
                .by_category
                .into_iter()
                .map(|c| CategorySummaryDto {
                    category_name: c.category_name,
                    amount: c.amount,
                })
                .collect(),
        }
    }
}

/// GET /api/expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Query(params): Query<ExpenseListParams>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let filter = ExpenseFilter {
        category_id: params.category_id,
        from: params.from_date,
        to: params.to_date,
    };

    let page = state
        .expense_service
        .list(user.id(), filter, params.page_number, params.page_size)
        .await?;

    Ok(Json(ExpenseListResponse::from_page(page)))
}

/// GET /api/expenses/{id}
pub async fn get_expense(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ExpenseDto>, ApiError> {
    let record = state.expense_service.get(id, user.id()).await?;
    Ok(Json(ExpenseDto::from_record(&record)))
}

/// POST /api/expenses
pub async fn create_expense(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ExpenseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .expense_service
        .create(user.id(), request.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(id)))
}

/// PUT /api/expenses/{id}
pub async fn update_expense(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ExpenseRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .expense_service
        .update(id, user.id(), request.into_input())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/expenses/{id}
pub async fn delete_expense(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.expense_service.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
