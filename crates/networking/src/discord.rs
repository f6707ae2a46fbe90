//! Discord OAuth code exchange
//!
//! Exchanges an authorization code for a bearer token and resolves it to
//! the user's identity. A short-lived expiring set refuses codes that were
//! already processed: the callback page can fire twice, and Discord
//! invalidates a code on first use.

use carddrop_core::{DiscordUser, Error, Result};
use carddrop_persistence::ExpiringSet;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

const DISCORD_API: &str = "https://discord.com/api";

/// How long a processed authorization code is remembered
const CODE_DEDUP_TTL: Duration = Duration::from_secs(5);

/// Cap on remembered codes
const CODE_DEDUP_CAPACITY: usize = 1024;

/// Token grant returned by the Discord OAuth token endpoint
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// OAuth client for the Discord authorization-code grant
pub struct DiscordAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    used_codes: ExpiringSet<String>,
}

impl DiscordAuthClient {
    /// Create a new client with the application credentials and the
    /// redirect URI registered with Discord
    pub fn new(client_id: &str, client_secret: &str, redirect_uri: &str) -> Self {
        let http = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: redirect_uri.to_string(),
            used_codes: ExpiringSet::with_capacity(CODE_DEDUP_TTL, CODE_DEDUP_CAPACITY),
        }
    }

    /// Exchange an authorization code for the user's identity.
    ///
    /// Rejects empty and replayed codes before touching the network.
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str) -> Result<DiscordUser> {
        if code.is_empty() {
            return Err(Error::InvalidData("No code provided".to_string()));
        }

        if !self.used_codes.insert(code.to_string()) {
            debug!("Rejecting replayed authorization code");
            return Err(Error::AuthenticationError(
                "Authorization code already processed".to_string(),
            ));
        }

        let token = self.fetch_token(code).await?;
        self.fetch_identity(&token).await
    }

    /// Exchange the code for an access token
    async fn fetch_token(&self, code: &str) -> Result<String> {
        let url = format!("{}/oauth2/token", DISCORD_API);

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let response = self.http.post(&url).form(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Token exchange failed: HTTP {} — {}", status, body);
            return Err(Error::AuthenticationError(format!(
                "Token exchange failed (HTTP {})",
                status
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        Ok(token.access_token)
    }

    /// Resolve the access token to the user's identity
    async fn fetch_identity(&self, access_token: &str) -> Result<DiscordUser> {
        let url = format!("{}/users/@me", DISCORD_API);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Identity lookup failed: HTTP {}", status);
            return Err(Error::AuthenticationError(format!(
                "Identity lookup failed (HTTP {})",
                status
            )));
        }

        let user: DiscordUser = response.json().await.map_err(|e| {
            error!("Failed to parse identity response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        debug!("Authenticated Discord user: {}", user.username);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_code_rejected_before_dedup() {
        let client = DiscordAuthClient::new("id", "secret", "http://localhost/auth/callback");

        let err = client.exchange_code("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        // The empty code must not occupy a dedup slot
        assert!(client.used_codes.is_empty());
    }

    #[tokio::test]
    async fn test_replayed_code_rejected_without_network() {
        let client = DiscordAuthClient::new("id", "secret", "http://localhost/auth/callback");

        // Seed the guard as if a first exchange already started
        assert!(client.used_codes.insert("abc123".to_string()));

        let err = client.exchange_code("abc123").await.unwrap_err();
        assert!(matches!(err, Error::AuthenticationError(_)));
    }
}
