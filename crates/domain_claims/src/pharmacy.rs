//! Pharmacy catalog entries

use serde::{Deserialize, Serialize};

/// A pharmacy from the external catalog, keyed by NPI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pharmacy {
    /// Name of the pharmacy chain
    pub chain: String,
    /// National Provider Identifier
    pub npi: String,
}

impl Pharmacy {
    pub fn new(chain: impl Into<String>, npi: impl Into<String>) -> Self {
        Self {
            chain: chain.into(),
            npi: npi.into(),
        }
    }
}
