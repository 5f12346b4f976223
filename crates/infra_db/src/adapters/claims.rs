//! SQLite Claims Adapter
//!
//! Implements `ClaimStorePort` on top of [`ClaimsRepository`]. The adapter
//! owns the translation between domain models and row types, and between
//! `DatabaseError` and `PortError`; it adds no behavior of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::SqliteClaimsAdapter;
//! use domain_claims::{ClaimService, ClaimStorePort};
//!
//! let store: Arc<dyn ClaimStorePort> = Arc::new(SqliteClaimsAdapter::new(pool));
//! let service = ClaimService::new(store);
//! ```

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, ClaimId, DomainPort, HealthCheckResult, HealthCheckable, PortError, RevertId,
};
use domain_claims::{Claim, ClaimStorePort, Pharmacy, Revert};

use crate::error::DatabaseError;
use crate::repositories::claims::{ClaimRow, ClaimsRepository, PharmacyRow, RevertRow};

const ADAPTER_ID: &str = "sqlite-claims-adapter";

/// SQLite-backed implementation of the ClaimStorePort trait
///
/// Health checks run `SELECT 1` against the pool and report the latency.
#[derive(Debug, Clone)]
pub struct SqliteClaimsAdapter {
    repository: ClaimsRepository,
}

impl SqliteClaimsAdapter {
    /// Creates a new adapter over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool),
        }
    }

    /// Returns a reference to the underlying repository
    pub fn repository(&self) -> &ClaimsRepository {
        &self.repository
    }
}

impl DomainPort for SqliteClaimsAdapter {}

#[async_trait]
impl HealthCheckable for SqliteClaimsAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();
        let result = self.repository.ping().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(()) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: ADAPTER_ID.to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl ClaimStorePort for SqliteClaimsAdapter {
    #[instrument(skip(self, pharmacy), fields(npi = %pharmacy.npi))]
    async fn save_pharmacy(&self, pharmacy: &Pharmacy) -> Result<(), PortError> {
        self.repository
            .save_pharmacy(&pharmacy_to_row(pharmacy))
            .await
            .map_err(|e| e.into_port_error("Pharmacy", &pharmacy.npi))
    }

    async fn get_pharmacy_by_npi(&self, npi: &str) -> Result<Option<Pharmacy>, PortError> {
        let row = self
            .repository
            .get_pharmacy_by_npi(npi)
            .await
            .map_err(|e| e.into_port_error("Pharmacy", npi))?;

        Ok(row.map(|row| Pharmacy::new(row.chain, row.npi)))
    }

    #[instrument(skip(self, claim), fields(claim_id = %claim.id))]
    async fn save_claim(&self, claim: &Claim) -> Result<(), PortError> {
        self.repository
            .save_claim(&claim_to_row(claim))
            .await
            .map_err(|e| e.into_port_error(ClaimId::entity(), &claim.id))
    }

    #[instrument(skip(self, claims), fields(count = claims.len()))]
    async fn save_claims(&self, claims: &[Claim]) -> Result<(), PortError> {
        let rows: Vec<ClaimRow> = claims.iter().map(claim_to_row).collect();
        self.repository
            .save_claims(&rows)
            .await
            .map_err(batch_to_port_error)
    }

    async fn get_claim_by_id(&self, id: &ClaimId) -> Result<Option<Claim>, PortError> {
        debug!(claim_id = %id, "Fetching claim by ID");

        let row = self
            .repository
            .get_claim_by_id(id.as_str())
            .await
            .map_err(|e| e.into_port_error(ClaimId::entity(), id))?;

        Ok(row.map(row_to_claim))
    }

    #[instrument(skip(self))]
    async fn update_claim_reverted_status(
        &self,
        id: &ClaimId,
        reverted: bool,
    ) -> Result<(), PortError> {
        self.repository
            .update_claim_reverted_status(id.as_str(), reverted)
            .await
            .map_err(|e| e.into_port_error(ClaimId::entity(), id))
    }

    #[instrument(skip(self, revert), fields(revert_id = %revert.id, claim_id = %revert.claim_id))]
    async fn save_revert(&self, revert: &Revert) -> Result<(), PortError> {
        self.repository
            .save_revert(&revert_to_row(revert))
            .await
            .map_err(|e| e.into_port_error(RevertId::entity(), &revert.id))
    }

    #[instrument(skip(self, reverts), fields(count = reverts.len()))]
    async fn save_reverts(&self, reverts: &[Revert]) -> Result<(), PortError> {
        let rows: Vec<RevertRow> = reverts.iter().map(revert_to_row).collect();
        self.repository
            .save_reverts(&rows)
            .await
            .map_err(batch_to_port_error)
    }
}

fn batch_to_port_error(error: DatabaseError) -> PortError {
    let message = error.to_string();
    match error {
        DatabaseError::TransactionFailed(_) | DatabaseError::PoolExhausted => {
            PortError::connection(message)
        }
        other => PortError::internal_with_source(message, other),
    }
}

// ============================================================================
// Type conversion helpers
// ============================================================================

fn pharmacy_to_row(pharmacy: &Pharmacy) -> PharmacyRow {
    PharmacyRow {
        chain: pharmacy.chain.clone(),
        npi: pharmacy.npi.clone(),
    }
}

fn claim_to_row(claim: &Claim) -> ClaimRow {
    ClaimRow {
        id: claim.id.to_string(),
        ndc: claim.ndc.clone(),
        npi: claim.npi.clone(),
        quantity: claim.quantity,
        price: claim.price,
        timestamp: claim.timestamp.clone(),
        reverted: claim.reverted,
    }
}

fn row_to_claim(row: ClaimRow) -> Claim {
    Claim {
        id: ClaimId::from(row.id),
        ndc: row.ndc,
        npi: row.npi,
        quantity: row.quantity,
        price: row.price,
        timestamp: row.timestamp,
        reverted: row.reverted,
    }
}

fn revert_to_row(revert: &Revert) -> RevertRow {
    RevertRow {
        id: revert.id.to_string(),
        claim_id: revert.claim_id.to_string(),
        timestamp: revert.timestamp.clone(),
    }
}
