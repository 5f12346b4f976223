//! Integration tests for the SQLite store
//!
//! Each test opens its own in-memory database, except the durability test
//! which reopens a file on disk.

use core_kernel::{ClaimId, RevertId};
use domain_claims::{Claim, ClaimStorePort, Pharmacy, Revert};
use infra_db::{create_pool, run_migrations, DatabaseConfig, DatabaseError, SqliteClaimsAdapter};
use infra_db::repositories::{ClaimRow, ClaimsRepository, RevertRow};

async fn store() -> SqliteClaimsAdapter {
    let pool = create_pool(DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    SqliteClaimsAdapter::new(pool)
}

fn claim(ndc: &str) -> Claim {
    Claim {
        id: ClaimId::new(),
        ndc: ndc.to_string(),
        npi: "1234567890".to_string(),
        quantity: 30.0,
        price: 12.75,
        timestamp: "2024-03-01T09:30:00".to_string(),
        reverted: false,
    }
}

fn revert(claim_id: ClaimId) -> Revert {
    Revert {
        id: RevertId::new(),
        claim_id,
        timestamp: "2024-03-02T10:00:00".to_string(),
    }
}

async fn count(store: &SqliteClaimsAdapter, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(store.repository().pool())
        .await
        .unwrap()
}

mod pharmacy_tests {
    use super::*;

    #[tokio::test]
    async fn test_pharmacy_upsert_last_write_wins() {
        let store = store().await;

        store.save_pharmacy(&Pharmacy::new("health", "1111111111")).await.unwrap();
        store.save_pharmacy(&Pharmacy::new("saint", "1111111111")).await.unwrap();

        let pharmacy = store.get_pharmacy_by_npi("1111111111").await.unwrap().unwrap();
        assert_eq!(pharmacy.chain, "saint");
        assert_eq!(count(&store, "pharmacies").await, 1);
    }

    #[tokio::test]
    async fn test_unknown_npi_is_none() {
        let store = store().await;
        assert!(store.get_pharmacy_by_npi("0000000000").await.unwrap().is_none());
    }
}

mod claim_tests {
    use super::*;

    #[tokio::test]
    async fn test_resaving_claim_replaces_row() {
        let store = store().await;
        let mut claim = claim("00002323401");

        store.save_claim(&claim).await.unwrap();
        claim.price = 99.0;
        store.save_claim(&claim).await.unwrap();

        let fetched = store.get_claim_by_id(&claim.id).await.unwrap().unwrap();
        assert_eq!(fetched.price, 99.0);
        assert_eq!(count(&store, "claims").await, 1);
    }

    #[tokio::test]
    async fn test_absent_claim_is_none() {
        let store = store().await;
        assert!(store.get_claim_by_id(&ClaimId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_reverted_status() {
        let store = store().await;
        let claim = claim("00002323401");
        store.save_claim(&claim).await.unwrap();

        store.update_claim_reverted_status(&claim.id, true).await.unwrap();

        let fetched = store.get_claim_by_id(&claim.id).await.unwrap().unwrap();
        assert!(fetched.reverted);
    }

    #[tokio::test]
    async fn test_update_unknown_claim_is_not_found() {
        let store = store().await;
        let err = store
            .update_claim_reverted_status(&ClaimId::new(), true)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_batch_save_is_idempotent() {
        let store = store().await;
        let batch = vec![claim("00000000001"), claim("00000000002"), claim("00000000003")];

        store.save_claims(&batch).await.unwrap();
        store.save_claims(&batch).await.unwrap();

        assert_eq!(count(&store, "claims").await, 3);
        for claim in &batch {
            assert_eq!(store.get_claim_by_id(&claim.id).await.unwrap().as_ref(), Some(claim));
        }
    }

    #[tokio::test]
    async fn test_batch_keeps_non_uuid_ids() {
        let store = store().await;
        let mut legacy = claim("00000000002");
        legacy.id = ClaimId::from("legacy-claim-42");
        let batch = vec![claim("00000000001"), legacy.clone()];

        store.save_claims(&batch).await.unwrap();

        assert_eq!(count(&store, "claims").await, 2);
        assert_eq!(store.get_claim_by_id(&legacy.id).await.unwrap(), Some(legacy));
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let store = store().await;
        store.save_claims(&[]).await.unwrap();
        assert_eq!(count(&store, "claims").await, 0);
    }

    #[tokio::test]
    async fn test_failed_record_rolls_back_whole_batch() {
        let store = store().await;
        sqlx::query(
            r#"
            CREATE TRIGGER reject_poisoned_claim BEFORE INSERT ON claims
            WHEN NEW.ndc = 'poison'
            BEGIN
                SELECT RAISE(ABORT, 'poisoned claim');
            END
            "#,
        )
        .execute(store.repository().pool())
        .await
        .unwrap();

        let poisoned = claim("poison");
        let batch = vec![claim("00000000001"), poisoned.clone(), claim("00000000003")];

        let repository = ClaimsRepository::new(store.repository().pool().clone());
        let rows: Vec<ClaimRow> = batch
            .iter()
            .map(|c| ClaimRow {
                id: c.id.to_string(),
                ndc: c.ndc.clone(),
                npi: c.npi.clone(),
                quantity: c.quantity,
                price: c.price,
                timestamp: c.timestamp.clone(),
                reverted: c.reverted,
            })
            .collect();

        let err = repository.save_claims(&rows).await.unwrap_err();
        match err {
            DatabaseError::BatchRecordFailed { id, .. } => assert_eq!(id, poisoned.id.to_string()),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count(&store, "claims").await, 0);

        assert!(store.save_claims(&batch).await.is_err());
        assert_eq!(count(&store, "claims").await, 0);
    }
}

mod revert_tests {
    use super::*;

    #[tokio::test]
    async fn test_reverts_load_before_their_claims() {
        let store = store().await;
        let orphan = revert(ClaimId::new());

        store.save_reverts(std::slice::from_ref(&orphan)).await.unwrap();

        let rows: Vec<RevertRow> =
            sqlx::query_as("SELECT id, claim_id, timestamp FROM reverts WHERE claim_id = ?")
                .bind(orphan.claim_id.as_str())
                .fetch_all(store.repository().pool())
                .await
                .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, orphan.id.to_string());
    }

    #[tokio::test]
    async fn test_revert_batch_is_idempotent() {
        let store = store().await;
        let claim_id = ClaimId::new();
        let batch = vec![revert(claim_id.clone()), revert(claim_id)];

        store.save_reverts(&batch).await.unwrap();
        store.save_reverts(&batch).await.unwrap();

        assert_eq!(count(&store, "reverts").await, 2);
    }

    #[tokio::test]
    async fn test_single_revert_save() {
        let store = store().await;
        let claim = claim("00002323401");
        store.save_claim(&claim).await.unwrap();

        store.save_revert(&revert(claim.id.clone())).await.unwrap();
        assert_eq!(count(&store, "reverts").await, 1);
    }
}

#[tokio::test]
async fn test_writes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pharmacy.db");
    let claim = claim("00002323401");

    {
        let pool = create_pool(DatabaseConfig::file(&path)).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let store = SqliteClaimsAdapter::new(pool.clone());
        store.save_claim(&claim).await.unwrap();
        pool.close().await;
    }

    let pool = create_pool(DatabaseConfig::file(&path)).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let store = SqliteClaimsAdapter::new(pool);

    assert_eq!(store.get_claim_by_id(&claim.id).await.unwrap(), Some(claim));
}
