//! Claim aggregate

use chrono::Local;
use serde::{Deserialize, Serialize};

use core_kernel::ClaimId;
use crate::error::ClaimError;

/// Format used for every timestamp the service stamps on a record
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time rendered with [`TIMESTAMP_FORMAT`]
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Lifecycle status of a claim
///
/// ```text
/// Active -> Reverted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// Submitted or ingested, not yet reversed
    Active,
    /// Reversed; terminal
    Reverted,
}

impl ClaimStatus {
    /// Checks if transition is valid
    pub fn can_transition_to(self, target: ClaimStatus) -> bool {
        matches!((self, target), (ClaimStatus::Active, ClaimStatus::Reverted))
    }
}

/// A medication claim submitted by a pharmacy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,
    /// National Drug Code of the medication
    pub ndc: String,
    /// National Provider Identifier of the dispensing pharmacy
    pub npi: String,
    /// Quantity dispensed
    pub quantity: f64,
    /// Price charged
    pub price: f64,
    /// When the claim was recorded
    pub timestamp: String,
    /// Whether the claim has been reversed
    #[serde(default)]
    pub reverted: bool,
}

impl Claim {
    /// Creates a new active claim from a validated submission
    pub fn submit(request: &ClaimSubmissionRequest) -> Self {
        Self {
            id: ClaimId::new(),
            ndc: request.ndc.clone(),
            npi: request.npi.clone(),
            quantity: request.quantity,
            price: request.price,
            timestamp: current_timestamp(),
            reverted: false,
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> ClaimStatus {
        if self.reverted {
            ClaimStatus::Reverted
        } else {
            ClaimStatus::Active
        }
    }

    /// Moves the claim to `Reverted`
    ///
    /// Fails with `AlreadyReverted` when the claim is already terminal.
    pub fn mark_reverted(&mut self) -> Result<(), ClaimError> {
        if !self.status().can_transition_to(ClaimStatus::Reverted) {
            return Err(ClaimError::AlreadyReverted(self.id.to_string()));
        }
        self.reverted = true;
        Ok(())
    }
}

/// Payload for submitting a new claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmissionRequest {
    pub ndc: String,
    pub quantity: f64,
    pub npi: String,
    pub price: f64,
}

impl ClaimSubmissionRequest {
    /// Checks the submission before any store access
    pub fn validate(&self) -> Result<(), ClaimError> {
        let mut problems = Vec::new();
        if self.ndc.trim().is_empty() {
            problems.push("ndc is required");
        }
        if self.npi.trim().is_empty() {
            problems.push("npi is required");
        }
        // `!(x > 0.0)` also rejects NaN
        if !(self.quantity > 0.0) {
            problems.push("quantity must be positive");
        }
        if !(self.price > 0.0) {
            problems.push("price must be positive");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ClaimError::InvalidInput(problems.join(", ")))
        }
    }
}

/// Payload for reversing an existing claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReversalRequest {
    pub claim_id: String,
}

impl ClaimReversalRequest {
    pub fn new(claim_id: impl Into<String>) -> Self {
        Self { claim_id: claim_id.into() }
    }

    /// Parses the target claim id
    ///
    /// Any non-blank text is accepted; whether it names a claim is the
    /// store's answer, not a parse error.
    pub fn parse_claim_id(&self) -> Result<ClaimId, ClaimError> {
        self.claim_id
            .parse()
            .map_err(|_| ClaimError::InvalidInput("claim_id is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ClaimSubmissionRequest {
        ClaimSubmissionRequest {
            ndc: "00002323401".to_string(),
            quantity: 10.0,
            npi: "1234567890".to_string(),
            price: 50.0,
        }
    }

    #[test]
    fn test_submit_copies_request_fields() {
        let claim = Claim::submit(&request());
        assert_eq!(claim.ndc, "00002323401");
        assert_eq!(claim.npi, "1234567890");
        assert_eq!(claim.quantity, 10.0);
        assert_eq!(claim.price, 50.0);
        assert!(!claim.reverted);
        assert_eq!(claim.status(), ClaimStatus::Active);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = current_timestamp();
        assert!(chrono::NaiveDateTime::parse_from_str(&ts, TIMESTAMP_FORMAT).is_ok());
        assert_eq!(ts.len(), 19);
    }

    #[test]
    fn test_mark_reverted_is_terminal() {
        let mut claim = Claim::submit(&request());
        claim.mark_reverted().unwrap();
        assert_eq!(claim.status(), ClaimStatus::Reverted);

        let err = claim.mark_reverted().unwrap_err();
        assert!(matches!(err, ClaimError::AlreadyReverted(_)));
    }

    #[test]
    fn test_status_transitions() {
        assert!(ClaimStatus::Active.can_transition_to(ClaimStatus::Reverted));
        assert!(!ClaimStatus::Reverted.can_transition_to(ClaimStatus::Active));
        assert!(!ClaimStatus::Reverted.can_transition_to(ClaimStatus::Reverted));
        assert!(!ClaimStatus::Active.can_transition_to(ClaimStatus::Active));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut req = request();
        req.price = f64::NAN;
        assert!(matches!(req.validate(), Err(ClaimError::InvalidInput(_))));
    }

    #[test]
    fn test_validate_lists_every_problem() {
        let req = ClaimSubmissionRequest {
            ndc: String::new(),
            quantity: 0.0,
            npi: " ".to_string(),
            price: -1.0,
        };
        let err = req.validate().unwrap_err().to_string();
        assert!(err.contains("ndc"));
        assert!(err.contains("npi"));
        assert!(err.contains("quantity"));
        assert!(err.contains("price"));
    }

    #[test]
    fn test_reversal_request_parsing() {
        let id = ClaimId::new();
        assert_eq!(ClaimReversalRequest::new(id.to_string()).parse_claim_id().unwrap(), id);
        assert!(ClaimReversalRequest::new("").parse_claim_id().is_err());
        assert!(ClaimReversalRequest::new("  ").parse_claim_id().is_err());
        assert_eq!(
            ClaimReversalRequest::new("legacy-claim-42").parse_claim_id().unwrap().as_str(),
            "legacy-claim-42"
        );
    }

    #[test]
    fn test_batch_record_without_reverted_defaults_to_active() {
        let json = r#"{
            "id": "3b7e2a2e-6f0f-4a53-9d8f-2c1c2b8e1f00",
            "ndc": "00002323401",
            "npi": "1234567890",
            "quantity": 2.0,
            "price": 12.5,
            "timestamp": "2024-03-01T10:00:00"
        }"#;
        let claim: Claim = serde_json::from_str(json).unwrap();
        assert!(!claim.reverted);
        assert_eq!(claim.id.as_str(), "3b7e2a2e-6f0f-4a53-9d8f-2c1c2b8e1f00");
        assert_eq!(claim.timestamp, "2024-03-01T10:00:00");
    }
}
