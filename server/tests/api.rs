//! Route-level tests against an in-memory database

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use carddrop_core::Card;
use carddrop_networking::DiscordAuthClient;
use carddrop_persistence::Database;
use carddrop_server::{build_router, AppState, CardCatalog};
use std::sync::Arc;
use tower::ServiceExt;

fn sample_cards() -> Vec<Card> {
    serde_json::from_str(
        r#"[
            {"id":"c1","name":"Wumpus","image":"/cards/wumpus.png","rarity":"Rare","types":["Beast"]},
            {"id":"c2","name":"Mod Hammer","image":"/cards/hammer.png","rarity":"Common","types":["Tool"]}
        ]"#,
    )
    .unwrap()
}

async fn test_app() -> Router {
    let db = Database::connect_in_memory().await.unwrap();
    let state = AppState {
        db: Arc::new(db),
        auth: Arc::new(DiscordAuthClient::new(
            "client-id",
            "client-secret",
            "http://localhost:3000/auth/callback",
        )),
        catalog: Arc::new(CardCatalog::from_cards(sample_cards())),
    };
    build_router(state)
}

async fn post_json(
    app: &Router,
    path: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_first_coin_claim_grants_increment() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/coins/claim",
        serde_json::json!({ "userId": "u1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({ "coins": 10, "balance": 10 }));
}

#[tokio::test]
async fn test_coin_claims_accumulate() {
    let app = test_app().await;

    post_json(
        &app,
        "/api/coins/claim",
        serde_json::json!({ "userId": "u1" }),
    )
    .await;
    let (status, body) = post_json(
        &app,
        "/api/coins/claim",
        serde_json::json!({ "userId": "u1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], 20);
    assert_eq!(body["coins"], 10);
}

#[tokio::test]
async fn test_coin_claim_requires_user_id() {
    let app = test_app().await;

    let (status, body) =
        post_json(&app, "/api/coins/claim", serde_json::json!({ "userId": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User ID is required");
}

#[tokio::test]
async fn test_pack_claim_grants_quantity_and_cards() {
    let app = test_app().await;

    let (status, body) = post_json(
        &app,
        "/api/packs/claim",
        serde_json::json!({ "userId": "u1" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 1);
    assert_eq!(
        body["cards"],
        serde_json::json!(["Card 1", "Card 2", "Card 3"])
    );

    let (_, body) = post_json(
        &app,
        "/api/packs/claim",
        serde_json::json!({ "userId": "u1" }),
    )
    .await;
    assert_eq!(body["quantity"], 2);
}

#[tokio::test]
async fn test_pack_claim_requires_user_id() {
    let app = test_app().await;

    let (status, _) =
        post_json(&app, "/api/packs/claim", serde_json::json!({ "userId": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cards_returns_catalog() {
    let app = test_app().await;

    let (status, body) = get_json(&app, "/api/cards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_cards_filters_by_rarity() {
    let app = test_app().await;

    let (status, body) = get_json(&app, "/api/cards?rarity=Common").await;
    assert_eq!(status, StatusCode::OK);

    let cards = body.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], "c2");
}

#[tokio::test]
async fn test_cards_filters_by_search_and_type() {
    let app = test_app().await;

    let (_, body) = get_json(&app, "/api/cards?search=wumpus&type=Beast").await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get_json(&app, "/api/cards?search=nomatch").await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_auth_requires_code() {
    let app = test_app().await;

    let (status, body) = post_json(&app, "/api/auth/discord", serde_json::json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No code provided");
}
