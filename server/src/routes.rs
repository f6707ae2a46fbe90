//! HTTP routes for the reward service
//!
//! The claim endpoints trust the submitted user id and perform no cooldown
//! bookkeeping: the cooldown gate lives client-side, and the ledger applies
//! any claim it receives.

use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use carddrop_core::{
    mock_pack_cards, AuthResponse, ClaimRequest, CoinClaimResponse, Error, ErrorResponse,
    PackClaimResponse, RewardKind, DAILY_PACK_NAME,
};
use carddrop_persistence::sqlite;
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

/// Build the axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/cards", get(handle_cards))
        .route("/api/coins/claim", post(handle_coin_claim))
        .route("/api/packs/claim", post(handle_pack_claim))
        .route("/api/auth/discord", post(handle_discord_auth))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Default, Deserialize)]
struct CardsQuery {
    #[serde(default)]
    search: String,
    #[serde(default)]
    rarity: String,
    #[serde(default, rename = "type")]
    card_type: String,
}

async fn handle_cards(
    State(state): State<AppState>,
    Query(query): Query<CardsQuery>,
) -> impl IntoResponse {
    Json(state.catalog.filter(&query.search, &query.rarity, &query.card_type))
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

async fn handle_coin_claim(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> Response {
    if request.user_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "User ID is required");
    }

    let increment = RewardKind::Coin.default_config().increment;
    match sqlite::claim_coins(state.db.pool(), &request.user_id, increment).await {
        Ok(receipt) => {
            info!(
                "Coin claim applied for {}: balance {}",
                request.user_id, receipt.new_quantity
            );
            Json(CoinClaimResponse {
                coins: receipt.applied_delta,
                balance: receipt.new_quantity,
            })
            .into_response()
        }
        Err(e) => {
            error!("Coin claim failed for {}: {}", request.user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

async fn handle_pack_claim(
    State(state): State<AppState>,
    Json(request): Json<ClaimRequest>,
) -> Response {
    if request.user_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "User ID is required");
    }

    let increment = RewardKind::Pack.default_config().increment;
    match sqlite::claim_pack(
        state.db.pool(),
        &request.user_id,
        DAILY_PACK_NAME,
        increment,
    )
    .await
    {
        Ok(receipt) => {
            info!(
                "Pack claim applied for {}: quantity {}",
                request.user_id, receipt.new_quantity
            );
            Json(PackClaimResponse {
                quantity: receipt.new_quantity,
                cards: mock_pack_cards(),
            })
            .into_response()
        }
        Err(e) => {
            error!("Pack claim failed for {}: {}", request.user_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthRequest {
    #[serde(default)]
    code: String,
}

async fn handle_discord_auth(
    State(state): State<AppState>,
    Json(request): Json<AuthRequest>,
) -> Response {
    if request.code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failed("No code provided")),
        )
            .into_response();
    }

    match state.auth.exchange_code(&request.code).await {
        Ok(user) => {
            info!("Discord login: {} ({})", user.username, user.id);
            Json(AuthResponse::ok(user)).into_response()
        }
        Err(Error::AuthenticationError(message)) => (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failed(message)),
        )
            .into_response(),
        Err(Error::NetworkError(message)) => {
            error!("Discord unreachable: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                Json(AuthResponse::failed("Discord is unreachable")),
            )
                .into_response()
        }
        Err(e) => {
            error!("Discord auth failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthResponse::failed("Authentication failed")),
            )
                .into_response()
        }
    }
}
