//! Server configuration from the environment

use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default bind address
const DEFAULT_BIND: &str = "127.0.0.1:3001";

/// Default database file
const DEFAULT_DB: &str = "carddrop.db";

/// Default catalog file
const DEFAULT_CARDS: &str = "data/cards.json";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub database_path: PathBuf,
    pub cards_path: PathBuf,
    pub discord_client_id: String,
    pub discord_client_secret: String,
    /// Public origin of the web app; the OAuth redirect lands at
    /// `{public_app_url}/auth/callback`
    pub public_app_url: String,
}

impl ServerConfig {
    /// Load from the environment, reading `.env` when present
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let bind = std::env::var("CARDDROP_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .context("invalid CARDDROP_BIND")?;

        let database_path = std::env::var("CARDDROP_DB")
            .unwrap_or_else(|_| DEFAULT_DB.to_string())
            .into();

        let cards_path = std::env::var("CARDDROP_CARDS")
            .unwrap_or_else(|_| DEFAULT_CARDS.to_string())
            .into();

        let discord_client_id =
            std::env::var("DISCORD_CLIENT_ID").context("DISCORD_CLIENT_ID is not set")?;
        let discord_client_secret =
            std::env::var("DISCORD_CLIENT_SECRET").context("DISCORD_CLIENT_SECRET is not set")?;

        let public_app_url = std::env::var("PUBLIC_APP_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            bind,
            database_path,
            cards_path,
            discord_client_id,
            discord_client_secret,
            public_app_url,
        })
    }

    /// OAuth redirect URI registered with Discord
    pub fn redirect_uri(&self) -> String {
        format!("{}/auth/callback", self.public_app_url.trim_end_matches('/'))
    }
}
