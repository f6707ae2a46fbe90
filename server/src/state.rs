//! Shared server state

use crate::catalog::CardCatalog;
use carddrop_networking::DiscordAuthClient;
use carddrop_persistence::Database;
use std::sync::Arc;

/// State shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: Arc<DiscordAuthClient>,
    pub catalog: Arc<CardCatalog>,
}
