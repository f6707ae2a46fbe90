//! CardDrop Networking - HTTP clients for the reward service and Discord

pub mod discord;
pub mod http;

pub use discord::DiscordAuthClient;
pub use http::LedgerClient;
