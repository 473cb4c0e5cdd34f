//! API error types - the single boundary translation of domain errors

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::DomainError;

/// Error body returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                title: title.into(),
                message: message.into(),
                field_errors: None,
            },
        }
    }

    /// Attach a single field error
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.into(), vec![message.into()]);
        self.response.field_errors = Some(errors);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", message)
    }

    /// Generic failure; the real cause is logged, never returned
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Server Error",
            "An unexpected error occurred",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message.clone()),
            DomainError::Validation { message, field } => {
                let api_err = Self::bad_request(message.clone());
                match field {
                    Some(field) => api_err.with_field_error(field.clone(), message.clone()),
                    None => api_err,
                }
            }
            DomainError::Unauthorized { .. } => {
                Self::unauthorized("You are not authorized to access this resource")
            }
            DomainError::Forbidden { .. } => {
                Self::forbidden("You do not have permission to perform this action")
            }
            DomainError::Conflict { message } => Self::bad_request(message.clone()),
            DomainError::Provider { .. }
            | DomainError::Storage { .. }
            | DomainError::Internal { .. } => {
                // Detail stays server-side
                error!(error = %err, "Unhandled error");
                Self::internal()
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.title, self.response.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_field_detail() {
        let err: ApiError =
            DomainError::validation_field("amount", "Amount must be greater than zero").into();

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let fields = err.response.field_errors.unwrap();
        assert_eq!(
            fields.get("amount").unwrap(),
            &vec!["Amount must be greater than zero".to_string()]
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = DomainError::not_found("Expense 'x' not found").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.response.message, "Expense 'x' not found");
    }

    #[test]
    fn test_provider_errors_are_opaque() {
        let err: ApiError = DomainError::provider("anthropic", "HTTP 529: overloaded").into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.response.message.contains("anthropic"));
        assert!(!err.response.message.contains("529"));
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let err: ApiError = DomainError::unauthorized("no token").into();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_serialization_is_camel_case() {
        let err = ApiError::bad_request("bad").with_field_error("firstName", "required");
        let json = serde_json::to_string(&err.response).unwrap();

        assert!(json.contains("\"fieldErrors\""));
        assert!(json.contains("\"title\":\"Validation Error\""));
    }
}
