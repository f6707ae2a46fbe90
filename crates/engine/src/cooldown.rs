//! Durable cooldown tracking per (user, reward kind)

use carddrop_core::{cooldown, CooldownStatus, Result, RewardConfig, RewardKind};
use carddrop_persistence::sqlite;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Binds the pure cooldown arithmetic to the durable claim-state store.
///
/// The store is client-local and advisory: it gates the UI, while the
/// remote ledger accepts claims regardless of timing.
#[derive(Clone)]
pub struct CooldownStore {
    pool: SqlitePool,
}

impl CooldownStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Eligibility of `user_id` for `config.kind` at `now`
    pub async fn status(
        &self,
        config: &RewardConfig,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CooldownStatus> {
        let last = sqlite::get_last_claim(&self.pool, config.kind, user_id).await?;
        Ok(cooldown::evaluate(config, last, now))
    }

    /// Overwrite the last-claim instant (optimistic commit)
    pub async fn record(&self, kind: RewardKind, user_id: &str, now: DateTime<Utc>) -> Result<()> {
        sqlite::record_claim(&self.pool, kind, user_id, now).await
    }

    /// Drop the record so the user may claim again (rollback)
    pub async fn clear(&self, kind: RewardKind, user_id: &str) -> Result<()> {
        sqlite::clear_claim(&self.pool, kind, user_id).await
    }
}
