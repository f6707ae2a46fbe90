//! Reward-related data models for the daily claim endpoints

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inventory row name used for the daily pack
pub const DAILY_PACK_NAME: &str = "daily pack";

/// Placeholder card set granted with every pack until real pack opening ships
pub const MOCK_PACK_CARDS: [&str; 3] = ["Card 1", "Card 2", "Card 3"];

/// The mock card set as owned strings (wire payload shape)
pub fn mock_pack_cards() -> Vec<String> {
    MOCK_PACK_CARDS.iter().map(|c| c.to_string()).collect()
}

/// A claimable daily reward type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardKind {
    Pack,
    Coin,
}

impl RewardKind {
    /// Stable key prefix used in the claim-state store
    pub fn key(&self) -> &'static str {
        match self {
            RewardKind::Pack => "dailypack",
            RewardKind::Coin => "dailycoin",
        }
    }

    /// Production claim parameters for this kind
    pub fn default_config(&self) -> RewardConfig {
        match self {
            RewardKind::Pack => RewardConfig {
                kind: *self,
                cooldown: Duration::hours(24),
                increment: 1,
            },
            RewardKind::Coin => RewardConfig {
                kind: *self,
                cooldown: Duration::hours(12),
                increment: 10,
            },
        }
    }
}

impl fmt::Display for RewardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewardKind::Pack => write!(f, "daily pack"),
            RewardKind::Coin => write!(f, "daily coin"),
        }
    }
}

/// Per-kind claim parameters.
///
/// One definition covers both kinds; earlier revisions duplicated the pack
/// and coin claim paths with drifting cooldown constants.
#[derive(Debug, Clone, Copy)]
pub struct RewardConfig {
    pub kind: RewardKind,
    /// Minimum time between successive claims
    pub cooldown: Duration,
    /// Amount added to the ledger per successful claim
    pub increment: i64,
}

impl RewardConfig {
    /// Same parameters with a different cooldown (demo intervals, tests)
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }
}

/// Receipt for one applied ledger claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerReceipt {
    /// Quantity/balance after the claim was applied
    pub new_quantity: i64,
    /// Amount this claim added
    pub applied_delta: i64,
}

/// Request body for both claim endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub user_id: String,
}

/// Response from `POST /api/coins/claim`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinClaimResponse {
    /// Coins added by this claim
    pub coins: i64,
    /// Balance after the claim was applied
    pub balance: i64,
}

/// Response from `POST /api/packs/claim`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackClaimResponse {
    /// Pack quantity after the claim was applied
    pub quantity: i64,
    /// Cards granted with the pack
    pub cards: Vec<String>,
}

/// Error body returned by the service on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
