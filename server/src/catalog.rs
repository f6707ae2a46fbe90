//! Static card catalog
//!
//! Loaded once at startup; a missing or malformed file fails the boot
//! instead of surfacing as a 500 on every request.

use carddrop_core::{Card, Error, Result};
use std::path::Path;
use tracing::info;

/// In-memory card catalog served by `GET /api/cards`
pub struct CardCatalog {
    cards: Vec<Card>,
}

impl CardCatalog {
    /// Load the catalog from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::InvalidData(format!("cannot read card catalog {}: {}", path.display(), e))
        })?;

        let cards: Vec<Card> = serde_json::from_str(&raw)?;
        info!("Card catalog loaded: {} cards", cards.len());
        Ok(Self { cards })
    }

    /// Build a catalog from already-parsed cards (for testing)
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// All cards, catalog order
    pub fn all(&self) -> &[Card] {
        &self.cards
    }

    /// Filter by the data page's dimensions. Empty filters match all.
    pub fn filter(&self, search: &str, rarity: &str, card_type: &str) -> Vec<Card> {
        let search = search.to_lowercase();
        self.cards
            .iter()
            .filter(|card| {
                (search.is_empty() || card.name.to_lowercase().contains(&search))
                    && (rarity.is_empty() || card.rarity.eq_ignore_ascii_case(rarity))
                    && (card_type.is_empty()
                        || card.types.iter().any(|t| t.eq_ignore_ascii_case(card_type)))
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
