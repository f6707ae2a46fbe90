//! Cooldown arithmetic for daily rewards
//!
//! Pure functions over an explicit `now` so eligibility is testable without
//! a clock. The durable claim-state store lives in the persistence crate;
//! the engine binds the two together.

use crate::models::RewardConfig;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Eligibility of one (user, reward kind) pair at a given instant
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownStatus {
    pub can_claim: bool,
    /// Human-readable time until the next claim (absent when claimable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_until_next: Option<String>,
    /// Raw remaining duration (absent when claimable)
    #[serde(skip)]
    pub remaining: Option<Duration>,
}

impl CooldownStatus {
    /// Status for a user who may claim right now
    pub fn ready() -> Self {
        Self {
            can_claim: true,
            time_until_next: None,
            remaining: None,
        }
    }
}

/// Evaluate eligibility from the last recorded claim instant.
///
/// `None` means the user never claimed this kind. The boundary is inclusive:
/// a claim exactly `cooldown` after the previous one is allowed.
pub fn evaluate(
    config: &RewardConfig,
    last_claim: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> CooldownStatus {
    let Some(last) = last_claim else {
        return CooldownStatus::ready();
    };

    let elapsed = now - last;
    if elapsed >= config.cooldown {
        return CooldownStatus::ready();
    }

    let remaining = config.cooldown - elapsed;
    CooldownStatus {
        can_claim: false,
        time_until_next: Some(format_remaining(remaining, config.cooldown)),
        remaining: Some(remaining),
    }
}

/// Format a remaining duration for display.
///
/// Sub-minute cooldowns count whole seconds, rounded up so "0s" never shows
/// while a wait is pending. Longer cooldowns use floored hours and minutes,
/// the countdown granularity of the daily page.
pub fn format_remaining(remaining: Duration, cooldown: Duration) -> String {
    if cooldown < Duration::minutes(1) {
        let millis = remaining.num_milliseconds().max(0);
        let seconds = (millis + 999) / 1000;
        format!("{}s", seconds)
    } else {
        let minutes = remaining.num_minutes().max(0);
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}
