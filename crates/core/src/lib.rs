//! CardDrop Core - Shared data models, cooldown arithmetic, and errors

pub mod cooldown;
pub mod errors;
pub mod models;

pub use cooldown::{evaluate, format_remaining, CooldownStatus};
pub use errors::{Error, Result};
pub use models::*;
