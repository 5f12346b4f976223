//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data. Values are fixed so assertions can name
//! them directly.

use domain_claims::{Claim, ClaimSubmissionRequest, Pharmacy};

/// NPI of the pharmacy returned by [`known_pharmacy`]
pub const KNOWN_NPI: &str = "1234567890";

/// NPI with no catalog entry
pub const UNKNOWN_NPI: &str = "0000000000";

/// NDC used by the sample claim
pub const SAMPLE_NDC: &str = "00002323401";

/// Fixed timestamp for records built outside the lifecycle manager
pub const SAMPLE_TIMESTAMP: &str = "2024-01-15T10:30:00";

/// A catalogued pharmacy
pub fn known_pharmacy() -> Pharmacy {
    Pharmacy::new("health", KNOWN_NPI)
}

/// A small catalog of distinct pharmacies
pub fn pharmacy_catalog() -> Vec<Pharmacy> {
    vec![
        known_pharmacy(),
        Pharmacy::new("doctor", "9876543210"),
        Pharmacy::new("saint", "1111111111"),
    ]
}

/// A valid submission for the known pharmacy
pub fn sample_submission() -> ClaimSubmissionRequest {
    ClaimSubmissionRequest {
        ndc: SAMPLE_NDC.to_string(),
        quantity: 10.0,
        npi: KNOWN_NPI.to_string(),
        price: 50.0,
    }
}

/// An active claim for the known pharmacy with a fresh id
pub fn sample_claim() -> Claim {
    crate::builders::ClaimBuilder::new().build()
}
