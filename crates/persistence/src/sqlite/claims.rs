//! Durable claim-state store
//!
//! One row per (reward kind, user): `{kindKey}_{userId}_lastClaim` mapped to
//! an RFC 3339 instant, mirroring the browser-local storage of the web
//! client. The value is advisory only; the ledger never consults it.

use carddrop_core::{Error, Result, RewardKind};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

fn last_claim_key(kind: RewardKind, user_id: &str) -> String {
    format!("{}_{}_lastClaim", kind.key(), user_id)
}

/// Last recorded claim instant, or `None` if the user never claimed
pub async fn get_last_claim(
    pool: &SqlitePool,
    kind: RewardKind,
    user_id: &str,
) -> Result<Option<DateTime<Utc>>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM claim_state WHERE key = ?")
        .bind(last_claim_key(kind, user_id))
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    match row {
        Some((value,)) => {
            let instant = DateTime::parse_from_rfc3339(&value).map_err(|e| {
                Error::InvalidData(format!("bad claim timestamp '{}': {}", value, e))
            })?;
            Ok(Some(instant.with_timezone(&Utc)))
        }
        None => Ok(None),
    }
}

/// Unconditionally overwrite the last-claim instant. No history retained.
pub async fn record_claim(
    pool: &SqlitePool,
    kind: RewardKind,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO claim_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = ?2",
    )
    .bind(last_claim_key(kind, user_id))
    .bind(now.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Remove the record so the user may claim again (rollback path)
pub async fn clear_claim(pool: &SqlitePool, kind: RewardKind, user_id: &str) -> Result<()> {
    sqlx::query("DELETE FROM claim_state WHERE key = ?")
        .bind(last_claim_key(kind, user_id))
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::Database;
    use chrono::Duration;

    #[tokio::test]
    async fn test_absent_record_means_never_claimed() {
        let db = Database::connect_in_memory().await.unwrap();
        let last = get_last_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();
        assert_eq!(last, None);
    }

    #[tokio::test]
    async fn test_record_roundtrips_instant() {
        let db = Database::connect_in_memory().await.unwrap();
        let now = Utc::now();

        record_claim(db.pool(), RewardKind::Coin, "u1", now).await.unwrap();
        let last = get_last_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();

        // RFC 3339 keeps sub-second precision, so the instant survives intact
        assert_eq!(last, Some(now));
    }

    #[tokio::test]
    async fn test_record_overwrites_previous_claim() {
        let db = Database::connect_in_memory().await.unwrap();
        let first = Utc::now() - Duration::hours(13);
        let second = Utc::now();

        record_claim(db.pool(), RewardKind::Coin, "u1", first).await.unwrap();
        record_claim(db.pool(), RewardKind::Coin, "u1", second).await.unwrap();

        let last = get_last_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();
        assert_eq!(last, Some(second));
    }

    #[tokio::test]
    async fn test_kinds_are_tracked_independently() {
        let db = Database::connect_in_memory().await.unwrap();
        let now = Utc::now();

        record_claim(db.pool(), RewardKind::Pack, "u1", now).await.unwrap();

        let coin = get_last_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();
        assert_eq!(coin, None);
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let db = Database::connect_in_memory().await.unwrap();
        let now = Utc::now();

        record_claim(db.pool(), RewardKind::Coin, "u1", now).await.unwrap();
        clear_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();

        let last = get_last_claim(db.pool(), RewardKind::Coin, "u1").await.unwrap();
        assert_eq!(last, None);
    }

    #[tokio::test]
    async fn test_clear_without_record_is_harmless() {
        let db = Database::connect_in_memory().await.unwrap();
        clear_claim(db.pool(), RewardKind::Pack, "u1").await.unwrap();
    }
}
