//! Daily claim orchestration
//!
//! Both reward kinds share one code path parameterized by `RewardConfig`,
//! but keep deliberately different consistency postures:
//!
//! - **coin** records the cooldown, then waits for the ledger before
//!   reporting success; a remote failure clears the cooldown and reports a
//!   generic failure message.
//! - **pack** records the cooldown and reports success immediately with the
//!   fixed mock card set; the ledger call runs in a detached task that
//!   clears the cooldown if it fails. The returned handle exposes that
//!   otherwise-silent outcome.
//!
//! The cooldown is a client-trust gate only. The ledger applies any claim
//! it receives, so two racing sessions can both succeed and double-apply;
//! the last writer wins on the cooldown record.

use crate::cooldown::CooldownStore;
use crate::ledger::RewardLedger;
use carddrop_core::{
    mock_pack_cards, CooldownStatus, Error, LedgerReceipt, Result, RewardConfig, RewardKind,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// Result reported to the caller for a coin claim
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinClaimOutcome {
    pub success: bool,
    pub message: String,
    pub coins: i64,
    pub balance: i64,
}

/// Result reported to the caller for a pack claim
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackClaimOutcome {
    pub success: bool,
    pub message: String,
    pub quantity: i64,
    pub cards: Vec<String>,
}

/// Final state of a pack claim's detached ledger apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteApply {
    /// Ledger confirmed the claim
    Confirmed(LedgerReceipt),
    /// Ledger rejected or the call failed; the cooldown was cleared
    RolledBack(String),
    /// The apply task died before reporting (e.g. runtime shutdown). The
    /// caller was already told "success"; the truth is unknown until the
    /// next status check or another session observes the ledger.
    Unknown,
}

/// Observable completion of a pack claim's detached ledger call
pub struct PackApplyHandle {
    rx: oneshot::Receiver<RemoteApply>,
}

impl PackApplyHandle {
    /// Wait for the background apply to finish
    pub async fn outcome(self) -> RemoteApply {
        self.rx.await.unwrap_or(RemoteApply::Unknown)
    }
}

/// Orchestrates daily claims against the cooldown store and remote ledger
pub struct ClaimEngine {
    cooldowns: CooldownStore,
    ledger: Arc<dyn RewardLedger>,
    coin: RewardConfig,
    pack: RewardConfig,
}

impl ClaimEngine {
    pub fn new(cooldowns: CooldownStore, ledger: Arc<dyn RewardLedger>) -> Self {
        Self {
            cooldowns,
            ledger,
            coin: RewardKind::Coin.default_config(),
            pack: RewardKind::Pack.default_config(),
        }
    }

    /// Override one kind's claim parameters (demo intervals, tests)
    pub fn with_config(mut self, config: RewardConfig) -> Self {
        match config.kind {
            RewardKind::Coin => self.coin = config,
            RewardKind::Pack => self.pack = config,
        }
        self
    }

    /// Claim parameters for a kind
    pub fn config(&self, kind: RewardKind) -> &RewardConfig {
        match kind {
            RewardKind::Coin => &self.coin,
            RewardKind::Pack => &self.pack,
        }
    }

    /// Eligibility of the daily coin at `now`
    pub async fn daily_coin_status(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CooldownStatus> {
        self.cooldowns.status(&self.coin, user_id, now).await
    }

    /// Eligibility of the daily pack at `now`
    pub async fn daily_pack_status(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CooldownStatus> {
        self.cooldowns.status(&self.pack, user_id, now).await
    }

    /// Record a claim without touching the ledger (UI-confirmed claims)
    pub async fn mark_claimed(
        &self,
        kind: RewardKind,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.cooldowns.record(kind, user_id, now).await
    }

    /// Claim the daily coin grant.
    ///
    /// Synchronous-confirm policy: the caller learns the real balance or a
    /// real failure. Validation faults reject before the cooldown is
    /// touched.
    pub async fn claim_daily_coin(&self, user_id: &str) -> Result<CoinClaimOutcome> {
        validate_user_id(user_id)?;

        let now = Utc::now();
        self.cooldowns.record(RewardKind::Coin, user_id, now).await?;

        match self.ledger.claim(user_id, RewardKind::Coin).await {
            Ok(receipt) => {
                info!(
                    "Daily coins claimed for {}: +{} (balance {})",
                    user_id, receipt.applied_delta, receipt.new_quantity
                );
                Ok(CoinClaimOutcome {
                    success: true,
                    message: "Daily coin claimed successfully!".to_string(),
                    coins: receipt.applied_delta,
                    balance: receipt.new_quantity,
                })
            }
            Err(e) => {
                warn!(
                    "Coin claim failed for {}: {} — rolling back cooldown",
                    user_id, e
                );
                if let Err(clear_err) = self.cooldowns.clear(RewardKind::Coin, user_id).await {
                    // The user stays locked out until the cooldown elapses
                    error!("Cooldown rollback failed for {}: {}", user_id, clear_err);
                }
                Ok(CoinClaimOutcome {
                    success: false,
                    message: "Failed to claim daily coin".to_string(),
                    coins: 0,
                    balance: 0,
                })
            }
        }
    }

    /// Claim the daily pack.
    ///
    /// Fire-and-forget policy: reports success as soon as the cooldown is
    /// recorded. The ledger call runs detached and clears the cooldown if
    /// it fails; the handle resolves once the remote outcome is known.
    pub async fn claim_daily_pack(
        &self,
        user_id: &str,
    ) -> Result<(PackClaimOutcome, PackApplyHandle)> {
        validate_user_id(user_id)?;

        let now = Utc::now();
        self.cooldowns.record(RewardKind::Pack, user_id, now).await?;

        let outcome = PackClaimOutcome {
            success: true,
            message: "Daily pack claimed successfully!".to_string(),
            quantity: self.pack.increment,
            cards: mock_pack_cards(),
        };

        let (tx, rx) = oneshot::channel();
        let ledger = Arc::clone(&self.ledger);
        let cooldowns = self.cooldowns.clone();
        let user = user_id.to_string();

        tokio::spawn(async move {
            let apply = match ledger.claim(&user, RewardKind::Pack).await {
                Ok(receipt) => {
                    debug!(
                        "Pack claim confirmed for {}: quantity {}",
                        user, receipt.new_quantity
                    );
                    RemoteApply::Confirmed(receipt)
                }
                Err(e) => {
                    warn!(
                        "Pack claim failed for {}: {} — rolling back cooldown",
                        user, e
                    );
                    if let Err(clear_err) = cooldowns.clear(RewardKind::Pack, &user).await {
                        error!("Cooldown rollback failed for {}: {}", user, clear_err);
                    }
                    RemoteApply::RolledBack(e.to_string())
                }
            };
            let _ = tx.send(apply);
        });

        Ok((outcome, PackApplyHandle { rx }))
    }
}

fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id.is_empty() {
        return Err(Error::InvalidData("User ID is required".to_string()));
    }
    Ok(())
}
