//! The ledger seam consumed by the claim orchestrator

use async_trait::async_trait;
use carddrop_core::{LedgerReceipt, Result, RewardKind};
use carddrop_networking::LedgerClient;

/// Remote reward ledger as seen by the orchestrator.
///
/// One successful call applies exactly one increment; there is no
/// deduplication across retries (at-least-once).
#[async_trait]
pub trait RewardLedger: Send + Sync {
    async fn claim(&self, user_id: &str, kind: RewardKind) -> Result<LedgerReceipt>;
}

#[async_trait]
impl RewardLedger for LedgerClient {
    async fn claim(&self, user_id: &str, kind: RewardKind) -> Result<LedgerReceipt> {
        match kind {
            RewardKind::Coin => {
                let response = self.claim_coin(user_id).await?;
                Ok(LedgerReceipt {
                    new_quantity: response.balance,
                    applied_delta: response.coins,
                })
            }
            RewardKind::Pack => {
                let response = self.claim_pack(user_id).await?;
                Ok(LedgerReceipt {
                    new_quantity: response.quantity,
                    applied_delta: RewardKind::Pack.default_config().increment,
                })
            }
        }
    }
}
