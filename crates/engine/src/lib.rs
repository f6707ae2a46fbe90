//! CardDrop Engine - Claim orchestration, cooldown tracking, and polling

pub mod claims;
pub mod cooldown;
pub mod ledger;
pub mod poller;

pub use claims::{ClaimEngine, CoinClaimOutcome, PackApplyHandle, PackClaimOutcome, RemoteApply};
pub use cooldown::CooldownStore;
pub use ledger::RewardLedger;
pub use poller::{spawn_availability_poller, AvailabilityHandle, RewardAvailability};
