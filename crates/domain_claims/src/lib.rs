//! Pharmacy Claims Domain
//!
//! This crate implements the claim lifecycle: submission against the pharmacy
//! catalog, reversal, lookup, and the batch ingestion that seeds the store at
//! startup.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Active -> Reverted
//! ```
//!
//! Business rules live in [`ClaimService`]; persistence goes through the
//! [`ClaimStorePort`] trait so the rules can be tested against an in-memory
//! store.

pub mod claim;
pub mod pharmacy;
pub mod revert;
pub mod ports;
pub mod service;
pub mod ingestion;
pub mod error;

pub use claim::{Claim, ClaimStatus, ClaimSubmissionRequest, ClaimReversalRequest};
pub use pharmacy::Pharmacy;
pub use revert::Revert;
pub use ports::ClaimStorePort;
pub use service::ClaimService;
pub use ingestion::{IngestionReport, CatalogReport};
pub use error::{ClaimError, IngestionError};

#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockClaimStore, MockOperation};
