//! HTTP API Layer
//!
//! This crate exposes the claim lifecycle over HTTP using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: submission, reversal, lookup, and health endpoints
//! - **Middleware**: bearer-token authentication, access logging, request metrics
//! - **Metrics**: Prometheus exposition on `GET /metrics`
//! - **DTOs**: request/response bodies
//! - **Error Handling**: consistent `{"error", "message"}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use domain_claims::ClaimService;

use crate::config::ApiConfig;
use crate::handlers::{claims, health};
use crate::metrics::{metrics_handler, metrics_middleware, recorder_handle};
use crate::middleware::{access_log_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ClaimService,
    pub config: ApiConfig,
    pub metrics: PrometheusHandle,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Claim lifecycle service over the configured store
/// * `config` - API configuration
///
/// The claims routes are also served under the short paths `/claim`,
/// `/claim/:id` and `/reversal` used by existing clients.
pub fn create_router(service: ClaimService, config: ApiConfig) -> Router {
    let state = AppState {
        service,
        config,
        metrics: recorder_handle(),
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/metrics", get(metrics_handler));

    let claims_routes = Router::new()
        .route("/claims", post(claims::submit_claim))
        .route("/claims/reverse", post(claims::reverse_claim))
        .route("/claims/:id", get(claims::get_claim))
        .route("/claim", post(claims::submit_claim))
        .route("/claim/:id", get(claims::get_claim))
        .route("/reversal", post(claims::reverse_claim))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(claims_routes)
        .route_layer(axum_middleware::from_fn(metrics_middleware))
        .layer(axum_middleware::from_fn(access_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
