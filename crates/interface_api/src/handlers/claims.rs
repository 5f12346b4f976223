//! Claims handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::info;

use crate::dto::claims::*;
use crate::metrics::{record_claim_reversal, record_claim_submission};
use crate::{error::ApiError, AppState};

/// Submits a new claim
pub async fn submit_claim(
    State(state): State<AppState>,
    payload: Result<Json<SubmitClaimRequest>, JsonRejection>,
) -> Result<Json<ClaimResponse>, ApiError> {
    let Json(request) = payload?;

    let claim = state.service.submit_claim(request.into()).await?;
    info!(claim_id = %claim.id, "Claim accepted");
    record_claim_submission();

    Ok(Json(claim.into()))
}

/// Gets a claim by ID
pub async fn get_claim(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ClaimResponse>, ApiError> {
    state
        .service
        .get_claim_by_id(&id)
        .await?
        .map(|claim| Json(claim.into()))
        .ok_or_else(|| ApiError::NotFound("claim not found".to_string()))
}

/// Reverses a claim
pub async fn reverse_claim(
    State(state): State<AppState>,
    payload: Result<Json<ReverseClaimRequest>, JsonRejection>,
) -> Result<Json<ReversalResponse>, ApiError> {
    let Json(request) = payload?;

    let revert = state.service.reverse_claim(request.into()).await?;
    info!(claim_id = %revert.claim_id, revert_id = %revert.id, "Claim reversal accepted");
    record_claim_reversal();

    Ok(Json(ReversalResponse::reversed(revert.claim_id.to_string())))
}
