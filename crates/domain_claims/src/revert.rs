//! Claim reversals

use serde::{Deserialize, Serialize};

use core_kernel::{ClaimId, RevertId};
use crate::claim::current_timestamp;

/// Record of a claim being reversed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revert {
    pub id: RevertId,
    pub claim_id: ClaimId,
    pub timestamp: String,
}

impl Revert {
    /// Creates a new revert for the given claim, stamped now
    pub fn new(claim_id: ClaimId) -> Self {
        Self {
            id: RevertId::new(),
            claim_id,
            timestamp: current_timestamp(),
        }
    }
}
