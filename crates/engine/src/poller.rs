//! Availability poller
//!
//! Re-evaluates both cooldowns on a fixed cadence and publishes the result
//! on a watch channel. Mirrors the daily page's 60-second status refresh:
//! consumers re-render from the channel, nothing is pushed further.

use crate::claims::ClaimEngine;
use carddrop_core::CooldownStatus;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How often to re-evaluate cooldowns (60 seconds)
pub const POLL_INTERVAL_SECS: u64 = 60;

/// Snapshot of both rewards' eligibility for one user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardAvailability {
    pub pack: CooldownStatus,
    pub coin: CooldownStatus,
}

/// Handle to observe and stop the availability poller
pub struct AvailabilityHandle {
    cancel: CancellationToken,
    rx: watch::Receiver<RewardAvailability>,
}

impl AvailabilityHandle {
    /// Subscribe to availability snapshots
    pub fn subscribe(&self) -> watch::Receiver<RewardAvailability> {
        self.rx.clone()
    }

    /// Stop the poller task
    pub fn stop(&self) {
        self.cancel.cancel();
        info!("Availability poller stopped");
    }
}

/// Spawn the availability poller for one user.
/// Returns a handle for observing and stopping it.
pub fn spawn_availability_poller(engine: Arc<ClaimEngine>, user_id: String) -> AvailabilityHandle {
    let cancel = CancellationToken::new();
    let (tx, rx) = watch::channel(RewardAvailability {
        pack: CooldownStatus::ready(),
        coin: CooldownStatus::ready(),
    });

    let loop_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(POLL_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = loop_cancel.cancelled() => {
                    info!("Availability poller cancelled, exiting");
                    return;
                }
                _ = interval.tick() => {
                    let now = Utc::now();

                    let pack = match engine.daily_pack_status(&user_id, now).await {
                        Ok(status) => status,
                        Err(e) => {
                            debug!("Pack status check failed: {}", e);
                            continue;
                        }
                    };
                    let coin = match engine.daily_coin_status(&user_id, now).await {
                        Ok(status) => status,
                        Err(e) => {
                            debug!("Coin status check failed: {}", e);
                            continue;
                        }
                    };

                    if tx.send(RewardAvailability { pack, coin }).is_err() {
                        // Every receiver is gone, nothing left to notify
                        return;
                    }
                }
            }
        }
    });

    AvailabilityHandle { cancel, rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cooldown::CooldownStore;
    use crate::ledger::RewardLedger;
    use async_trait::async_trait;
    use carddrop_core::{LedgerReceipt, Result, RewardKind};
    use carddrop_persistence::Database;
    use std::time::Duration;

    struct FixedLedger;

    #[async_trait]
    impl RewardLedger for FixedLedger {
        async fn claim(&self, _user_id: &str, _kind: RewardKind) -> Result<LedgerReceipt> {
            Ok(LedgerReceipt {
                new_quantity: 10,
                applied_delta: 10,
            })
        }
    }

    #[tokio::test]
    async fn test_poller_publishes_cooldown_state() {
        let db = Database::connect_in_memory().await.unwrap();
        let engine = Arc::new(ClaimEngine::new(
            CooldownStore::new(db.pool().clone()),
            Arc::new(FixedLedger),
        ));

        engine.claim_daily_coin("u1").await.unwrap();

        let handle = spawn_availability_poller(Arc::clone(&engine), "u1".to_string());
        let mut rx = handle.subscribe();

        // The first interval tick fires immediately
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .expect("poller never published")
            .unwrap();

        let snapshot = rx.borrow().clone();
        assert!(!snapshot.coin.can_claim);
        assert!(snapshot.pack.can_claim);

        handle.stop();
    }
}
