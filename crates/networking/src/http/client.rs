//! Reward service HTTP client

use carddrop_core::{
    Card, ClaimRequest, CoinClaimResponse, Error, PackClaimResponse, Result,
};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// HTTP client for the hosted CardDrop reward service
///
/// Thin JSON client over the claim and catalog endpoints. Claim calls carry
/// no authentication: the service trusts the submitted user id.
pub struct LedgerClient {
    http: Client,
    base_url: String,
}

impl LedgerClient {
    /// Create a new client for the service at `base_url`
    /// (e.g. `https://carddrop.example.app`)
    pub fn new(base_url: &str) -> Self {
        let http = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Claim the daily coin grant for a user
    #[instrument(skip(self))]
    pub async fn claim_coin(&self, user_id: &str) -> Result<CoinClaimResponse> {
        let url = format!("{}/api/coins/claim", self.base_url);

        debug!("Claiming daily coins for {}", user_id);

        let response = self
            .http
            .post(&url)
            .json(&ClaimRequest {
                user_id: user_id.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            error!("Coin claim failed: HTTP {} — {}", status, body);
            return Err(Error::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let claim: CoinClaimResponse = response.json().await.map_err(|e| {
            error!("Failed to parse coin claim response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        debug!(
            "Daily coins claimed: +{} (balance {})",
            claim.coins, claim.balance
        );
        Ok(claim)
    }

    /// Claim the daily pack for a user
    #[instrument(skip(self))]
    pub async fn claim_pack(&self, user_id: &str) -> Result<PackClaimResponse> {
        let url = format!("{}/api/packs/claim", self.base_url);

        debug!("Claiming daily pack for {}", user_id);

        let response = self
            .http
            .post(&url)
            .json(&ClaimRequest {
                user_id: user_id.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            error!("Pack claim failed: HTTP {} — {}", status, body);
            return Err(Error::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let claim: PackClaimResponse = response.json().await.map_err(|e| {
            error!("Failed to parse pack claim response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        debug!(
            "Daily pack claimed: quantity {} ({} cards)",
            claim.quantity,
            claim.cards.len()
        );
        Ok(claim)
    }

    /// Fetch the full card catalog
    #[instrument(skip(self))]
    pub async fn fetch_cards(&self) -> Result<Vec<Card>> {
        let url = format!("{}/api/cards", self.base_url);

        debug!("Fetching card catalog from: {}", url);

        let response = self.http.get(&url).send().await?;

        let response = response.error_for_status().map_err(|e| {
            error!("Catalog request failed: {}", e);
            Error::ApiError(e.to_string())
        })?;

        let cards: Vec<Card> = response.json().await.map_err(|e| {
            error!("Failed to parse catalog response: {}", e);
            Error::InvalidData(e.to_string())
        })?;

        debug!("Card catalog fetched: {} cards", cards.len());
        Ok(cards)
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
