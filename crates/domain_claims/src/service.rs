//! Claim lifecycle manager
//!
//! Enforces the submission and reversal rules on top of a [`ClaimStorePort`].
//! Holds no state between calls beyond the shared port handle.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use core_kernel::ClaimId;

use crate::claim::{Claim, ClaimReversalRequest, ClaimSubmissionRequest};
use crate::error::ClaimError;
use crate::ports::ClaimStorePort;
use crate::revert::Revert;

/// Application service for submitting, reversing, and fetching claims
#[derive(Clone)]
pub struct ClaimService {
    store: Arc<dyn ClaimStorePort>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ClaimStorePort>) -> Self {
        Self { store }
    }

    /// Returns the underlying store port
    pub fn store(&self) -> &Arc<dyn ClaimStorePort> {
        &self.store
    }

    /// Records a new claim for a catalogued pharmacy
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when a field is empty or not positive; the store is not touched
    /// - `UnknownPharmacy` when the NPI has no catalog entry
    /// - `Internal` when the store fails
    #[instrument(skip(self, request), fields(npi = %request.npi))]
    pub async fn submit_claim(&self, request: ClaimSubmissionRequest) -> Result<Claim, ClaimError> {
        request.validate()?;

        let pharmacy = self
            .store
            .get_pharmacy_by_npi(&request.npi)
            .await
            .map_err(|e| {
                error!(npi = %request.npi, error = %e, "Failed to fetch pharmacy");
                ClaimError::Internal("error processing claim".to_string())
            })?;

        if pharmacy.is_none() {
            warn!(npi = %request.npi, "Claim submitted for unknown pharmacy");
            return Err(ClaimError::UnknownPharmacy(request.npi));
        }

        let claim = Claim::submit(&request);

        self.store.save_claim(&claim).await.map_err(|e| {
            error!(claim_id = %claim.id, error = %e, "Failed to save new claim");
            ClaimError::Internal("error saving claim".to_string())
        })?;

        info!(claim_id = %claim.id, npi = %claim.npi, "Claim submitted");
        Ok(claim)
    }

    /// Reverses an active claim and records the revert
    ///
    /// The status flip and the revert insert are two separate writes. If the
    /// second fails the claim stays reverted without a revert row; that state
    /// is logged and reported as `Internal`.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when the claim id is blank
    /// - `NotFound` when no claim has this id
    /// - `AlreadyReverted` when the claim was reversed before; nothing is written
    /// - `Internal` when the store fails
    #[instrument(skip(self, request), fields(claim_id = %request.claim_id))]
    pub async fn reverse_claim(&self, request: ClaimReversalRequest) -> Result<Revert, ClaimError> {
        let claim_id = request.parse_claim_id()?;

        let mut claim = self
            .store
            .get_claim_by_id(&claim_id)
            .await
            .map_err(|e| {
                error!(claim_id = %claim_id, error = %e, "Failed to fetch claim for reversal");
                ClaimError::Internal("error reverting claim".to_string())
            })?
            .ok_or_else(|| ClaimError::NotFound(claim_id.to_string()))?;

        claim.mark_reverted()?;

        self.store
            .update_claim_reverted_status(&claim.id, true)
            .await
            .map_err(|e| {
                error!(claim_id = %claim.id, error = %e, "Failed to update claim reversal status");
                ClaimError::Internal("error reverting claim".to_string())
            })?;

        let revert = Revert::new(claim.id.clone());

        self.store.save_revert(&revert).await.map_err(|e| {
            error!(
                claim_id = %claim.id,
                revert_id = %revert.id,
                error = %e,
                "Claim marked reverted but revert record was not saved"
            );
            ClaimError::Internal("error saving claim reversal".to_string())
        })?;

        info!(claim_id = %claim.id, revert_id = %revert.id, "Claim reverted");
        Ok(revert)
    }

    /// Fetches a claim; absence is `Ok(None)`
    ///
    /// A blank id cannot name a stored claim and is treated as absent.
    pub async fn get_claim_by_id(&self, id: &str) -> Result<Option<Claim>, ClaimError> {
        let Ok(claim_id) = id.parse::<ClaimId>() else {
            return Ok(None);
        };

        self.store.get_claim_by_id(&claim_id).await.map_err(|e| {
            error!(claim_id = %claim_id, error = %e, "Failed to fetch claim");
            ClaimError::Internal("error fetching claim".to_string())
        })
    }
}
