//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{ClaimId, RevertId};
use domain_claims::{Claim, Revert};

use crate::fixtures::{KNOWN_NPI, SAMPLE_NDC, SAMPLE_TIMESTAMP};

/// Builder for claims as they appear in the store or a batch file
pub struct ClaimBuilder {
    claim: Claim,
}

impl Default for ClaimBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            claim: Claim {
                id: ClaimId::new(),
                ndc: SAMPLE_NDC.to_string(),
                npi: KNOWN_NPI.to_string(),
                quantity: 10.0,
                price: 50.0,
                timestamp: SAMPLE_TIMESTAMP.to_string(),
                reverted: false,
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<ClaimId>) -> Self {
        self.claim.id = id.into();
        self
    }

    pub fn with_ndc(mut self, ndc: impl Into<String>) -> Self {
        self.claim.ndc = ndc.into();
        self
    }

    pub fn with_npi(mut self, npi: impl Into<String>) -> Self {
        self.claim.npi = npi.into();
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.claim.quantity = quantity;
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.claim.price = price;
        self
    }

    /// Marks the claim as already reversed
    pub fn reverted(mut self) -> Self {
        self.claim.reverted = true;
        self
    }

    pub fn build(self) -> Claim {
        self.claim
    }
}

/// Builder for revert records
pub struct RevertBuilder {
    revert: Revert,
}

impl RevertBuilder {
    /// Creates a builder for a revert of `claim_id`
    pub fn for_claim(claim_id: impl Into<ClaimId>) -> Self {
        Self {
            revert: Revert {
                id: RevertId::new(),
                claim_id: claim_id.into(),
                timestamp: SAMPLE_TIMESTAMP.to_string(),
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<RevertId>) -> Self {
        self.revert.id = id.into();
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.revert.timestamp = timestamp.into();
        self
    }

    pub fn build(self) -> Revert {
        self.revert
    }
}
