//! API middleware

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware
///
/// Requires `Authorization: Bearer <token>` matching the configured token.
/// With no token configured every request is rejected.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(token) => token,
        None => {
            warn!(uri = %request.uri(), "Missing or invalid Authorization header");
            return ApiError::Unauthorized.into_response();
        }
    };

    if !state.config.auth_enabled() || token != state.config.auth_token {
        warn!(uri = %request.uri(), "Rejected request with invalid token");
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}

/// Access log middleware
///
/// Logs method, uri, status, and duration of every request
pub async fn access_log_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    info!(
        method = %method,
        uri = %uri,
        status = response.status().as_u16(),
        duration_ms = start.elapsed().as_millis() as u64,
        "API request"
    );

    response
}
