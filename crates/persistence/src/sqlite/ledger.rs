//! Reward ledger lookups and merge-upserts
//!
//! The ledger accumulates monotonically: each applied claim adds its
//! increment, never caps, never decrements. Nothing here deduplicates by
//! request, so a retried claim after a timeout can apply twice: the ledger
//! is at-least-once, and a single successful call applies exactly one
//! increment.

use carddrop_core::{Error, LedgerReceipt, Result};
use sqlx::SqlitePool;

/// Current coin balance for a user, if any claim was ever applied
pub async fn get_coin_balance(pool: &SqlitePool, user_id: &str) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT balance FROM coins WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.map(|(balance,)| balance))
}

/// Apply one coin claim: add `amount` to the user's balance.
///
/// Not-found is the normal first-claim case and creates the row with
/// `balance = amount`; only a genuine driver error surfaces as a failure.
pub async fn claim_coins(pool: &SqlitePool, user_id: &str, amount: i64) -> Result<LedgerReceipt> {
    match get_coin_balance(pool, user_id).await? {
        Some(balance) => {
            let new_balance = balance + amount;
            sqlx::query(
                "UPDATE coins SET balance = ?, updated_at = CURRENT_TIMESTAMP WHERE user_id = ?",
            )
            .bind(new_balance)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

            Ok(LedgerReceipt {
                new_quantity: new_balance,
                applied_delta: amount,
            })
        }
        None => {
            sqlx::query("INSERT INTO coins (user_id, balance) VALUES (?, ?)")
                .bind(user_id)
                .bind(amount)
                .execute(pool)
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;

            Ok(LedgerReceipt {
                new_quantity: amount,
                applied_delta: amount,
            })
        }
    }
}

/// Current quantity of the named pack for a user, if any claim was applied
pub async fn get_pack_quantity(
    pool: &SqlitePool,
    user_id: &str,
    pack_name: &str,
) -> Result<Option<i64>> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT quantity FROM inventory WHERE user_id = ? AND pack_name = ?")
            .bind(user_id)
            .bind(pack_name)
            .fetch_optional(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(row.map(|(quantity,)| quantity))
}

/// Apply one pack claim: add `amount` packs of `pack_name` to the user's
/// inventory, creating the row on first claim.
pub async fn claim_pack(
    pool: &SqlitePool,
    user_id: &str,
    pack_name: &str,
    amount: i64,
) -> Result<LedgerReceipt> {
    match get_pack_quantity(pool, user_id, pack_name).await? {
        Some(quantity) => {
            let new_quantity = quantity + amount;
            sqlx::query(
                "UPDATE inventory SET quantity = ?, updated_at = CURRENT_TIMESTAMP
                 WHERE user_id = ? AND pack_name = ?",
            )
            .bind(new_quantity)
            .bind(user_id)
            .bind(pack_name)
            .execute(pool)
            .await
            .map_err(|e| Error::DatabaseError(e.to_string()))?;

            Ok(LedgerReceipt {
                new_quantity,
                applied_delta: amount,
            })
        }
        None => {
            sqlx::query("INSERT INTO inventory (user_id, pack_name, quantity) VALUES (?, ?, ?)")
                .bind(user_id)
                .bind(pack_name)
                .bind(amount)
                .execute(pool)
                .await
                .map_err(|e| Error::DatabaseError(e.to_string()))?;

            Ok(LedgerReceipt {
                new_quantity: amount,
                applied_delta: amount,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::Database;
    use carddrop_core::DAILY_PACK_NAME;

    #[tokio::test]
    async fn test_first_coin_claim_creates_exact_increment() {
        let db = Database::connect_in_memory().await.unwrap();

        let receipt = claim_coins(db.pool(), "u1", 10).await.unwrap();
        assert_eq!(receipt.new_quantity, 10);
        assert_eq!(receipt.applied_delta, 10);

        let balance = get_coin_balance(db.pool(), "u1").await.unwrap();
        assert_eq!(balance, Some(10));
    }

    #[tokio::test]
    async fn test_coin_claims_accumulate() {
        let db = Database::connect_in_memory().await.unwrap();

        claim_coins(db.pool(), "u1", 10).await.unwrap();
        let receipt = claim_coins(db.pool(), "u1", 10).await.unwrap();

        assert_eq!(receipt.new_quantity, 20);
        assert_eq!(receipt.applied_delta, 10);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_balance() {
        let db = Database::connect_in_memory().await.unwrap();
        let balance = get_coin_balance(db.pool(), "nobody").await.unwrap();
        assert_eq!(balance, None);
    }

    #[tokio::test]
    async fn test_first_pack_claim_creates_exact_increment() {
        let db = Database::connect_in_memory().await.unwrap();

        let receipt = claim_pack(db.pool(), "u1", DAILY_PACK_NAME, 1).await.unwrap();
        assert_eq!(receipt.new_quantity, 1);
        assert_eq!(receipt.applied_delta, 1);
    }

    #[tokio::test]
    async fn test_pack_claims_accumulate_per_pack_name() {
        let db = Database::connect_in_memory().await.unwrap();

        claim_pack(db.pool(), "u1", DAILY_PACK_NAME, 1).await.unwrap();
        let receipt = claim_pack(db.pool(), "u1", DAILY_PACK_NAME, 1).await.unwrap();
        assert_eq!(receipt.new_quantity, 2);

        // A different pack name accrues independently
        let other = claim_pack(db.pool(), "u1", "promo pack", 1).await.unwrap();
        assert_eq!(other.new_quantity, 1);
    }

    #[tokio::test]
    async fn test_users_do_not_share_balances() {
        let db = Database::connect_in_memory().await.unwrap();

        claim_coins(db.pool(), "u1", 10).await.unwrap();
        claim_coins(db.pool(), "u2", 10).await.unwrap();

        assert_eq!(get_coin_balance(db.pool(), "u1").await.unwrap(), Some(10));
        assert_eq!(get_coin_balance(db.pool(), "u2").await.unwrap(), Some(10));
    }
}
