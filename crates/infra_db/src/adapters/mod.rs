//! Domain Adapters
//!
//! This module provides adapter implementations for domain ports,
//! connecting domain interfaces to the SQLite database layer.
//!
//! # Architecture
//!
//! Each adapter:
//! - Implements the domain's port trait
//! - Translates between domain models and database row types
//! - Uses the repository layer for database operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::SqliteClaimsAdapter;
//! use domain_claims::ClaimStorePort;
//!
//! let adapter = SqliteClaimsAdapter::new(pool);
//! let claim = adapter.get_claim_by_id(&claim_id).await?;
//! ```

pub mod claims;

pub use claims::SqliteClaimsAdapter;
