//! Claims Domain Ports
//!
//! The `ClaimStorePort` trait is the seam between the claim lifecycle rules
//! and durable storage. Two adapters implement it:
//!
//! - **SQLite Adapter**: `infra_db::adapters::SqliteClaimsAdapter`
//! - **Mock Adapter**: [`mock::MockClaimStore`], in memory, for tests
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::{ClaimService, ClaimStorePort};
//! use std::sync::Arc;
//!
//! let store: Arc<dyn ClaimStorePort> = Arc::new(SqliteClaimsAdapter::new(pool));
//! let service = ClaimService::new(store);
//! ```

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, HealthCheckable, PortError};

use crate::claim::Claim;
use crate::pharmacy::Pharmacy;
use crate::revert::Revert;

/// Persistence capabilities the claims domain needs
///
/// One method per store operation, no business logic. Lookups return
/// `Ok(None)` when the row is absent; only infrastructure failures are errors.
#[async_trait]
pub trait ClaimStorePort: DomainPort + HealthCheckable {
    /// Inserts or replaces the pharmacy keyed by NPI
    async fn save_pharmacy(&self, pharmacy: &Pharmacy) -> Result<(), PortError>;

    /// Fetches a pharmacy by NPI
    async fn get_pharmacy_by_npi(&self, npi: &str) -> Result<Option<Pharmacy>, PortError>;

    /// Inserts or replaces a claim keyed by id
    async fn save_claim(&self, claim: &Claim) -> Result<(), PortError>;

    /// Inserts or replaces every claim in one atomic write
    ///
    /// A failure on any record leaves the store untouched.
    async fn save_claims(&self, claims: &[Claim]) -> Result<(), PortError>;

    /// Fetches a claim by id
    async fn get_claim_by_id(&self, id: &ClaimId) -> Result<Option<Claim>, PortError>;

    /// Sets the reverted flag of a claim
    ///
    /// Returns `PortError::NotFound` when no claim has this id.
    async fn update_claim_reverted_status(
        &self,
        id: &ClaimId,
        reverted: bool,
    ) -> Result<(), PortError>;

    /// Inserts or replaces a revert keyed by id
    async fn save_revert(&self, revert: &Revert) -> Result<(), PortError>;

    /// Inserts or replaces every revert in one atomic write
    async fn save_reverts(&self, reverts: &[Revert]) -> Result<(), PortError>;
}

/// Mock implementation of ClaimStorePort for testing
///
/// Stores records in memory, counts every call, and can be told to fail a
/// given operation so error paths of the lifecycle manager can be exercised.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult, RevertId};

    /// Operations of the mock that can be made to fail
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum MockOperation {
        SavePharmacy,
        GetPharmacy,
        SaveClaim,
        SaveClaims,
        GetClaim,
        UpdateStatus,
        SaveRevert,
        SaveReverts,
    }

    /// In-memory mock implementation of ClaimStorePort
    #[derive(Debug, Default)]
    pub struct MockClaimStore {
        pharmacies: Arc<RwLock<HashMap<String, Pharmacy>>>,
        claims: Arc<RwLock<HashMap<ClaimId, Claim>>>,
        reverts: Arc<RwLock<HashMap<RevertId, Revert>>>,
        failing: Arc<RwLock<HashSet<MockOperation>>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MockClaimStore {
        /// Creates a new empty mock
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with pharmacies for testing
        pub async fn with_pharmacies(pharmacies: Vec<Pharmacy>) -> Self {
            let store = Self::new();
            {
                let mut map = store.pharmacies.write().await;
                for pharmacy in pharmacies {
                    map.insert(pharmacy.npi.clone(), pharmacy);
                }
            }
            store
        }

        /// Inserts a claim without counting it as a call
        pub async fn seed_claim(&self, claim: Claim) {
            self.claims.write().await.insert(claim.id.clone(), claim);
        }

        /// Makes every later call of `operation` fail with an internal error
        pub async fn fail_on(&self, operation: MockOperation) {
            self.failing.write().await.insert(operation);
        }

        /// Number of read calls made through the port
        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        /// Number of write calls made through the port
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        /// Total number of port calls
        pub fn call_count(&self) -> usize {
            self.read_count() + self.write_count()
        }

        /// Snapshot of stored claims
        pub async fn claims(&self) -> Vec<Claim> {
            self.claims.read().await.values().cloned().collect()
        }

        /// Snapshot of stored reverts
        pub async fn reverts(&self) -> Vec<Revert> {
            self.reverts.read().await.values().cloned().collect()
        }

        /// Snapshot of stored pharmacies
        pub async fn pharmacies(&self) -> Vec<Pharmacy> {
            self.pharmacies.read().await.values().cloned().collect()
        }

        async fn check(&self, operation: MockOperation) -> Result<(), PortError> {
            if self.failing.read().await.contains(&operation) {
                return Err(PortError::internal(format!("mock failure: {:?}", operation)));
            }
            Ok(())
        }

        fn record_read(&self) {
            self.reads.fetch_add(1, Ordering::SeqCst);
        }

        fn record_write(&self) {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl DomainPort for MockClaimStore {}

    #[async_trait]
    impl HealthCheckable for MockClaimStore {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-claim-store".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ClaimStorePort for MockClaimStore {
        async fn save_pharmacy(&self, pharmacy: &Pharmacy) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::SavePharmacy).await?;
            self.pharmacies
                .write()
                .await
                .insert(pharmacy.npi.clone(), pharmacy.clone());
            Ok(())
        }

        async fn get_pharmacy_by_npi(&self, npi: &str) -> Result<Option<Pharmacy>, PortError> {
            self.record_read();
            self.check(MockOperation::GetPharmacy).await?;
            Ok(self.pharmacies.read().await.get(npi).cloned())
        }

        async fn save_claim(&self, claim: &Claim) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::SaveClaim).await?;
            self.claims.write().await.insert(claim.id.clone(), claim.clone());
            Ok(())
        }

        async fn save_claims(&self, claims: &[Claim]) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::SaveClaims).await?;
            let mut map = self.claims.write().await;
            for claim in claims {
                map.insert(claim.id.clone(), claim.clone());
            }
            Ok(())
        }

        async fn get_claim_by_id(&self, id: &ClaimId) -> Result<Option<Claim>, PortError> {
            self.record_read();
            self.check(MockOperation::GetClaim).await?;
            Ok(self.claims.read().await.get(id).cloned())
        }

        async fn update_claim_reverted_status(
            &self,
            id: &ClaimId,
            reverted: bool,
        ) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::UpdateStatus).await?;
            let mut map = self.claims.write().await;
            let claim = map
                .get_mut(id)
                .ok_or_else(|| PortError::not_found(ClaimId::entity(), id))?;
            claim.reverted = reverted;
            Ok(())
        }

        async fn save_revert(&self, revert: &Revert) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::SaveRevert).await?;
            self.reverts.write().await.insert(revert.id.clone(), revert.clone());
            Ok(())
        }

        async fn save_reverts(&self, reverts: &[Revert]) -> Result<(), PortError> {
            self.record_write();
            self.check(MockOperation::SaveReverts).await?;
            let mut map = self.reverts.write().await;
            for revert in reverts {
                map.insert(revert.id.clone(), revert.clone());
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::{MockClaimStore, MockOperation};
    use crate::claim::ClaimSubmissionRequest;

    fn sample_claim() -> Claim {
        Claim::submit(&ClaimSubmissionRequest {
            ndc: "00002323401".to_string(),
            quantity: 1.0,
            npi: "1234567890".to_string(),
            price: 9.99,
        })
    }

    #[tokio::test]
    async fn test_mock_save_and_get_claim() {
        let store = MockClaimStore::new();
        let claim = sample_claim();

        store.save_claim(&claim).await.unwrap();
        let fetched = store.get_claim_by_id(&claim.id).await.unwrap();
        assert_eq!(fetched, Some(claim));
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_update_missing_claim_is_not_found() {
        let store = MockClaimStore::new();
        let result = store.update_claim_reverted_status(&ClaimId::new(), true).await;
        assert!(result.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_mock_pharmacy_upsert_last_write_wins() {
        let store = MockClaimStore::new();
        store.save_pharmacy(&Pharmacy::new("health", "111")).await.unwrap();
        store.save_pharmacy(&Pharmacy::new("saint", "111")).await.unwrap();

        let pharmacy = store.get_pharmacy_by_npi("111").await.unwrap().unwrap();
        assert_eq!(pharmacy.chain, "saint");
        assert_eq!(store.pharmacies().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_injection() {
        let store = MockClaimStore::new();
        store.fail_on(MockOperation::SaveClaim).await;

        assert!(store.save_claim(&sample_claim()).await.is_err());
        assert!(store.claims().await.is_empty());
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let store = MockClaimStore::new();
        assert!(store.health_check().await.is_healthy());
    }
}
