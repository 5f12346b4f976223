//! Claims domain errors

use std::path::PathBuf;

use core_kernel::PortError;
use thiserror::Error;

/// Errors returned by the claim lifecycle operations
///
/// `Internal` carries a fixed, caller-safe description. The underlying store
/// error is logged where it happens and never stored here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimError {
    #[error("Invalid claim data: {0}")]
    InvalidInput(String),

    #[error("Unknown pharmacy: no catalog entry for NPI '{0}'")]
    UnknownPharmacy(String),

    #[error("Claim not found: {0}")]
    NotFound(String),

    #[error("Claim already reverted: {0}")]
    AlreadyReverted(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClaimError {
    /// Returns true when the caller supplied something the rules reject
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ClaimError::Internal(_))
    }
}

/// Errors that abort a batch ingestion run
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open catalog {path}: {source}")]
    OpenCatalog {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to save {kind} batch: {source}")]
    Store {
        kind: &'static str,
        #[source]
        source: PortError,
    },
}
