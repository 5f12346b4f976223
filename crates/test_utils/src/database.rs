//! Database Test Utilities
//!
//! Provides a migrated in-memory SQLite store and helpers for writing batch
//! files to temporary directories.

use std::path::Path;
use std::sync::Arc;

use domain_claims::{Claim, ClaimService, ClaimStorePort, Pharmacy, Revert};
use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabasePool, SqliteClaimsAdapter};

/// A private, migrated in-memory database
///
/// Each instance is isolated; it disappears when dropped.
pub struct TestDatabase {
    pub pool: DatabasePool,
    pub store: Arc<SqliteClaimsAdapter>,
}

impl TestDatabase {
    /// Opens and migrates a fresh database
    ///
    /// # Panics
    ///
    /// Panics if the pool cannot be created or the schema cannot be applied
    pub async fn new() -> Self {
        let pool = create_pool(DatabaseConfig::in_memory())
            .await
            .expect("Failed to open in-memory database");
        run_migrations(&pool)
            .await
            .expect("Failed to apply schema");

        let store = Arc::new(SqliteClaimsAdapter::new(pool.clone()));
        Self { pool, store }
    }

    /// Opens a database pre-loaded with `pharmacies`
    pub async fn with_pharmacies(pharmacies: &[Pharmacy]) -> Self {
        let db = Self::new().await;
        for pharmacy in pharmacies {
            db.store
                .save_pharmacy(pharmacy)
                .await
                .expect("Failed to seed pharmacy");
        }
        db
    }

    /// A lifecycle service over this database
    pub fn service(&self) -> ClaimService {
        ClaimService::new(self.store.clone())
    }

    /// Number of rows in `table`
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

/// Writes `claims` as a JSON array to `dir/name`
pub fn write_claims_file(dir: &Path, name: &str, claims: &[Claim]) {
    let json = serde_json::to_vec(claims).expect("Failed to encode claims");
    std::fs::write(dir.join(name), json).expect("Failed to write claims file");
}

/// Writes `reverts` as a JSON array to `dir/name`
pub fn write_reverts_file(dir: &Path, name: &str, reverts: &[Revert]) {
    let json = serde_json::to_vec(reverts).expect("Failed to encode reverts");
    std::fs::write(dir.join(name), json).expect("Failed to write reverts file");
}

/// A temporary directory removed on drop
pub fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}
