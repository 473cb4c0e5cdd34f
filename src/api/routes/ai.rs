//! AI assistant chat endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::agent::ChatMessage;

const MAX_MESSAGE_LENGTH: usize = 500;
const MAX_HISTORY_ENTRIES: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessageDto>,
    /// Sent by the UI; day bucketing is UTC server-side
    #[serde(default)]
    pub timezone_offset: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageDto {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(rename = "type")]
    pub response_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_id: Option<Uuid>,
}

/// POST /api/ai/chat
pub async fn chat(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message is required")
            .with_field_error("message", "Message is required"));
    }

    if request.message.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Message must not exceed {MAX_MESSAGE_LENGTH} characters"
        ))
        .with_field_error("message", "Message too long"));
    }

    if request.history.len() > MAX_HISTORY_ENTRIES {
        return Err(ApiError::bad_request(format!(
            "History must not exceed {MAX_HISTORY_ENTRIES} messages"
        ))
        .with_field_error("history", "Too many history entries"));
    }

    let history: Vec<ChatMessage> = request
        .history
        .into_iter()
        .map(|m| ChatMessage::new(m.role, m.content))
        .collect();

    let reply = state
        .chat_service
        .handle(user.id(), &request.message, history)
        .await?;

    Ok(Json(ChatResponse {
        response_type: reply.kind.as_str().to_string(),
        message: reply.message,
        expense_id: reply.expense_id,
    }))
}
