//! Claims DTOs

use serde::{Deserialize, Serialize};

use domain_claims::{Claim, ClaimReversalRequest, ClaimSubmissionRequest};

/// Body of `POST /claims`
///
/// Absent fields decode to empty or zero and are rejected by validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitClaimRequest {
    pub ndc: String,
    pub quantity: f64,
    pub npi: String,
    pub price: f64,
}

impl From<SubmitClaimRequest> for ClaimSubmissionRequest {
    fn from(req: SubmitClaimRequest) -> Self {
        ClaimSubmissionRequest {
            ndc: req.ndc,
            quantity: req.quantity,
            npi: req.npi,
            price: req.price,
        }
    }
}

/// Body of `POST /claims/reverse`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReverseClaimRequest {
    pub claim_id: String,
}

impl From<ReverseClaimRequest> for ClaimReversalRequest {
    fn from(req: ReverseClaimRequest) -> Self {
        ClaimReversalRequest::new(req.claim_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimResponse {
    pub id: String,
    pub ndc: String,
    pub npi: String,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: String,
    pub reverted: bool,
}

impl From<Claim> for ClaimResponse {
    fn from(claim: Claim) -> Self {
        ClaimResponse {
            id: claim.id.to_string(),
            ndc: claim.ndc,
            npi: claim.npi,
            quantity: claim.quantity,
            price: claim.price,
            timestamp: claim.timestamp,
            reverted: claim.reverted,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReversalResponse {
    pub status: String,
    pub claim_id: String,
}

impl ReversalResponse {
    pub fn reversed(claim_id: impl Into<String>) -> Self {
        Self {
            status: "claim reversed".to_string(),
            claim_id: claim_id.into(),
        }
    }
}
