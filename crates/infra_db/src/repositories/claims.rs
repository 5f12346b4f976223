//! Claims repository implementation
//!
//! This module provides database access for the pharmacy catalog, claims,
//! and reverts. Every write is an upsert keyed by the table's primary key, so
//! replaying the same record leaves a single row holding its latest values.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::DatabaseError;

const UPSERT_PHARMACY: &str = r#"
    INSERT INTO pharmacies (npi, chain)
    VALUES (?, ?)
    ON CONFLICT(npi) DO UPDATE SET chain = excluded.chain
"#;

const UPSERT_CLAIM: &str = r#"
    INSERT INTO claims (id, ndc, npi, quantity, price, timestamp, reverted)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        ndc = excluded.ndc,
        npi = excluded.npi,
        quantity = excluded.quantity,
        price = excluded.price,
        timestamp = excluded.timestamp,
        reverted = excluded.reverted
"#;

const UPSERT_REVERT: &str = r#"
    INSERT INTO reverts (id, claim_id, timestamp)
    VALUES (?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        claim_id = excluded.claim_id,
        timestamp = excluded.timestamp
"#;

/// Repository for pharmacies, claims, and reverts
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: SqlitePool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Inserts or replaces a pharmacy keyed by NPI
    pub async fn save_pharmacy(&self, pharmacy: &PharmacyRow) -> Result<(), DatabaseError> {
        sqlx::query(UPSERT_PHARMACY)
            .bind(&pharmacy.npi)
            .bind(&pharmacy.chain)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Retrieves a pharmacy by NPI
    pub async fn get_pharmacy_by_npi(&self, npi: &str) -> Result<Option<PharmacyRow>, DatabaseError> {
        let pharmacy = sqlx::query_as::<_, PharmacyRow>(
            "SELECT chain, npi FROM pharmacies WHERE npi = ?",
        )
        .bind(npi)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pharmacy)
    }

    /// Inserts or replaces a single claim
    pub async fn save_claim(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        bind_claim(sqlx::query(UPSERT_CLAIM), claim)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserts or replaces every claim in one transaction
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::BatchRecordFailed` naming the first record that
    /// failed; no row of the batch is kept.
    pub async fn save_claims(&self, claims: &[ClaimRow]) -> Result<(), DatabaseError> {
        let mut tx = self.begin().await?;

        for claim in claims {
            bind_claim(sqlx::query(UPSERT_CLAIM), claim)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::BatchRecordFailed {
                    id: claim.id.clone(),
                    message: DatabaseError::from(e).to_string(),
                })?;
        }

        Self::commit(tx).await?;
        debug!(count = claims.len(), "Claims batch committed");
        Ok(())
    }

    /// Retrieves a claim by id
    pub async fn get_claim_by_id(&self, id: &str) -> Result<Option<ClaimRow>, DatabaseError> {
        let claim = sqlx::query_as::<_, ClaimRow>(
            r#"
            SELECT id, ndc, npi, quantity, price, timestamp, reverted
            FROM claims
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claim)
    }

    /// Sets the reverted flag of a claim
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no row has this id
    pub async fn update_claim_reverted_status(
        &self,
        id: &str,
        reverted: bool,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE claims SET reverted = ? WHERE id = ?")
            .bind(reverted)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", id));
        }
        Ok(())
    }

    /// Inserts or replaces a single revert
    pub async fn save_revert(&self, revert: &RevertRow) -> Result<(), DatabaseError> {
        bind_revert(sqlx::query(UPSERT_REVERT), revert)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserts or replaces every revert in one transaction
    pub async fn save_reverts(&self, reverts: &[RevertRow]) -> Result<(), DatabaseError> {
        let mut tx = self.begin().await?;

        for revert in reverts {
            bind_revert(sqlx::query(UPSERT_REVERT), revert)
                .execute(&mut *tx)
                .await
                .map_err(|e| DatabaseError::BatchRecordFailed {
                    id: revert.id.clone(),
                    message: DatabaseError::from(e).to_string(),
                })?;
        }

        Self::commit(tx).await?;
        debug!(count = reverts.len(), "Reverts batch committed");
        Ok(())
    }

    /// Runs a trivial query to confirm the database answers
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, DatabaseError> {
        self.pool
            .begin()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }

    async fn commit(tx: Transaction<'static, Sqlite>) -> Result<(), DatabaseError> {
        tx.commit()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))
    }
}

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, sqlx::sqlite::SqliteArguments<'q>>;

fn bind_claim<'q>(query: SqliteQuery<'q>, claim: &'q ClaimRow) -> SqliteQuery<'q> {
    query
        .bind(&claim.id)
        .bind(&claim.ndc)
        .bind(&claim.npi)
        .bind(claim.quantity)
        .bind(claim.price)
        .bind(&claim.timestamp)
        .bind(claim.reverted)
}

fn bind_revert<'q>(query: SqliteQuery<'q>, revert: &'q RevertRow) -> SqliteQuery<'q> {
    query
        .bind(&revert.id)
        .bind(&revert.claim_id)
        .bind(&revert.timestamp)
}

/// Database row representation of a pharmacy
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct PharmacyRow {
    pub chain: String,
    pub npi: String,
}

/// Database row representation of a claim
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: String,
    pub ndc: String,
    pub npi: String,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: String,
    pub reverted: bool,
}

/// Database row representation of a revert
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct RevertRow {
    pub id: String,
    pub claim_id: String,
    pub timestamp: String,
}
