//! Admin endpoints

use axum::extract::State;

use crate::api::auth::UserResponse;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// GET /api/admin/users - admin role required
pub async fn list_users(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !user.is_admin() {
        return Err(ApiError::forbidden(
            "You do not have permission to perform this action",
        ));
    }

    let users = state.user_service.list().await?;

    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}
