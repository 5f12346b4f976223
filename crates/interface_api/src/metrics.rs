//! Prometheus metrics
//!
//! One process-wide recorder backs the `metrics` macros. The router keeps a
//! [`PrometheusHandle`] to render the text exposition on `GET /metrics`.
//!
//! | Name | Kind | Labels |
//! |------|------|--------|
//! | `http_requests_total` | counter | method, path, status |
//! | `http_request_duration_seconds` | histogram | method, path, status |
//! | `claim_submissions_total` | counter | - |
//! | `claim_reversals_total` | counter | - |

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use tracing::warn;

use crate::AppState;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const CLAIM_SUBMISSIONS_TOTAL: &str = "claim_submissions_total";
pub const CLAIM_REVERSALS_TOTAL: &str = "claim_reversals_total";

/// Default Prometheus client buckets, in seconds
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How often the server drains histogram samples into the exposition
pub const UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Returns the handle of the global recorder, installing it on first use
pub fn recorder_handle() -> PrometheusHandle {
    HANDLE.get_or_init(install_recorder).clone()
}

fn install_recorder() -> PrometheusHandle {
    let builder = PrometheusBuilder::new().set_buckets_for_metric(
        Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
        DURATION_BUCKETS,
    );
    let builder = match builder {
        Ok(builder) => builder,
        Err(e) => {
            warn!(error = %e, "Invalid histogram buckets, falling back to summaries");
            PrometheusBuilder::new()
        }
    };

    let recorder = builder.build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        warn!("A global metrics recorder was already installed; /metrics will be empty");
    }
    handle
}

/// Counts one accepted claim submission
pub fn record_claim_submission() {
    metrics::counter!(CLAIM_SUBMISSIONS_TOTAL).increment(1);
}

/// Counts one accepted claim reversal
pub fn record_claim_reversal() {
    metrics::counter!(CLAIM_REVERSALS_TOTAL).increment(1);
}

/// Request metrics middleware
///
/// Labels use the matched route template (`/claims/:id`), not the raw path.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => request.uri().path().to_owned(),
    };
    let start = Instant::now();

    let response = next.run(request).await;

    let labels = [
        ("method", method),
        ("path", path),
        ("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!(HTTP_REQUESTS_TOTAL, &labels).increment(1);
    metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS, &labels)
        .record(start.elapsed().as_secs_f64());

    response
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_shared() {
        let first = recorder_handle();
        record_claim_reversal();
        let second = recorder_handle();

        assert!(first.render().contains(CLAIM_REVERSALS_TOTAL));
        assert!(second.render().contains(CLAIM_REVERSALS_TOTAL));
    }
}
