//! Schema creation
//!
//! Tables are created with `IF NOT EXISTS`, so running the migration against an
//! existing database is a no-op. Statements run in one transaction.

use tracing::info;

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS pharmacies (
        npi   TEXT PRIMARY KEY,
        chain TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS claims (
        id        TEXT PRIMARY KEY,
        ndc       TEXT NOT NULL,
        npi       TEXT NOT NULL,
        quantity  REAL NOT NULL,
        price     REAL NOT NULL,
        timestamp TEXT NOT NULL,
        reverted  BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reverts (
        id        TEXT PRIMARY KEY,
        claim_id  TEXT NOT NULL REFERENCES claims(id),
        timestamp TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_reverts_claim_id ON reverts (claim_id)",
];

/// Creates the `pharmacies`, `claims`, and `reverts` tables if missing
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if any statement fails
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{create_pool, DatabaseConfig};

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();

        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["claims", "pharmacies", "reverts"]);
    }
}
