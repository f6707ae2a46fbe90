//! CardDrop server - Main entry point

use anyhow::Context;
use carddrop_networking::DiscordAuthClient;
use carddrop_persistence::Database;
use carddrop_server::{build_router, AppState, CardCatalog, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carddrop_server=debug,carddrop_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CardDrop server");

    let config = ServerConfig::from_env()?;

    let db = Database::connect(&config.database_path)
        .await
        .context("failed to open database")?;

    let catalog = CardCatalog::load(&config.cards_path)
        .await
        .context("failed to load card catalog")?;

    let auth = DiscordAuthClient::new(
        &config.discord_client_id,
        &config.discord_client_secret,
        &config.redirect_uri(),
    );

    let state = AppState {
        db: Arc::new(db),
        auth: Arc::new(auth),
        catalog: Arc::new(catalog),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!("Listening on {}", config.bind);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
