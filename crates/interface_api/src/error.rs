//! API error handling

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_claims::ClaimError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A claim rule rejected the request
    #[error("{message}")]
    Rejected { kind: &'static str, message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Rejected { kind, message } => (StatusCode::BAD_REQUEST, kind, message),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
            ),
            // detail stays in the logs
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error".to_string(),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ClaimError> for ApiError {
    fn from(err: ClaimError) -> Self {
        let kind = match &err {
            ClaimError::InvalidInput(_) => "invalid_input",
            ClaimError::UnknownPharmacy(_) => "unknown_pharmacy",
            ClaimError::NotFound(_) => "claim_not_found",
            ClaimError::AlreadyReverted(_) => "already_reverted",
            ClaimError::Internal(msg) => return ApiError::Internal(msg.clone()),
        };
        ApiError::Rejected {
            kind,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        for err in [
            ClaimError::InvalidInput("quantity must be positive".to_string()),
            ClaimError::UnknownPharmacy("123".to_string()),
            ClaimError::NotFound("abc".to_string()),
            ClaimError::AlreadyReverted("abc".to_string()),
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_rejection_kind_names_the_rule() {
        let err = ApiError::from(ClaimError::AlreadyReverted("abc".to_string()));
        assert!(matches!(err, ApiError::Rejected { kind: "already_reverted", .. }));
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = ApiError::from(ClaimError::Internal("error saving claim".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
