//! Category listing endpoint

use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::category::Category;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_default: bool,
}

impl CategoryDto {
    fn from_category(category: &Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
            description: category.description().map(str::to_string),
            icon: category.icon().map(str::to_string),
            color: category.color().map(str::to_string),
            is_default: category.is_default(),
        }
    }
}

/// GET /api/categories - system defaults plus the user's own
pub async fn list_categories(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let categories = state.category_service.list_visible(user.id()).await?;

    Ok(Json(
        categories.iter().map(CategoryDto::from_category).collect(),
    ))
}
