//! Integration tests for the wallet HTTP API.
//!
//! The router is driven in-process with `oneshot` over the in-process store
//! and cache, so no database or Redis is required.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use player_wallet::cache::MemoryWalletCache;
use player_wallet::db::{MemoryWalletRepository, WalletRepository};
use player_wallet::wallet::{Amount, NewWallet, WalletConfig, WalletManager};
use pw_server::api::{AppState, auth::TokenService, create_router, request_id::REQUEST_ID_HEADER};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // For `oneshot` method

const JWT_SECRET: &str = "test_secret_key_for_testing_only_32b";

struct TestServer {
    app: axum::Router,
    repo: Arc<MemoryWalletRepository>,
    token: String,
}

/// Helper to create test server with in-process backends
fn create_test_server() -> TestServer {
    let repo = Arc::new(MemoryWalletRepository::new());
    let cache = Arc::new(MemoryWalletCache::new());
    let config = WalletConfig::default()
        .with_initial_balance("0")
        .unwrap();
    let wallet_manager = WalletManager::with_config(repo.clone(), cache, config);

    let tokens = TokenService::new(JWT_SECRET);
    let token = tokens.issue(42, "player42", 900).unwrap();

    let state = AppState {
        wallet_manager: Arc::new(wallet_manager),
        tokens: Arc::new(tokens),
    };

    TestServer {
        app: create_router(state),
        repo,
        token,
    }
}

impl TestServer {
    async fn seed(&self, balance: &str) -> i64 {
        self.repo
            .create(&NewWallet {
                player_id: 42,
                balance: Amount::parse(balance).unwrap(),
            })
            .await
            .unwrap()
            .id
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn post(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check_endpoint() {
    let server = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = server.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], true);
    assert_eq!(body["cache"], true);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "abc-123")
        .body(Body::empty())
        .unwrap();
    let response = server.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.headers()[REQUEST_ID_HEADER], "abc-123");
}

// ============================================================================
// Authentication Tests
// ============================================================================

#[tokio::test]
async fn test_missing_token_rejected() {
    let server = create_test_server();
    let id = server.seed("900").await;

    let request = Request::builder()
        .uri(format!("/api/v1/wallets/{id}/balance"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = server.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_invalid_token_rejected() {
    let server = create_test_server();
    let forged = TokenService::new("some_other_secret_key_of_32_chars!")
        .issue(42, "player42", 900)
        .unwrap();

    for value in [format!("Bearer {forged}"), "Bearer garbage".to_string(), format!("Token {}", server.token)] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/wallets")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap();
        let (status, _) = server.send(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    assert!(server.repo.is_empty().await);
}

// ============================================================================
// Wallet Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_create_wallet_for_authenticated_player() {
    let server = create_test_server();

    let (status, body) = server.post("/api/v1/wallets", "").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["playerId"], 42);
    assert_eq!(body["payload"]["balance"], "0");
    assert_eq!(server.repo.len().await, 1);
}

#[tokio::test]
async fn test_credit_then_balance() {
    let server = create_test_server();
    let id = server.seed("900.00").await;

    let (status, body) = server
        .post(&format!("/api/v1/wallets/{id}/credit"), r#"{"amount": "5000"}"#)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "wallet credited");

    let (status, body) = server.get(&format!("/api/v1/wallets/{id}/balance")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"]["balance"], "5900.00");
}

#[tokio::test]
async fn test_debit_scenarios() {
    let server = create_test_server();
    let id = server.seed("900.00").await;
    let uri = format!("/api/v1/wallets/{id}/debit");

    let (status, body) = server.post(&uri, r#"{"amount": "5000"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient funds");

    let (status, body) = server.post(&uri, r#"{"amount": "-5000"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid amount");

    let (status, body) = server.post(&uri, r#"{"amount": "900"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "wallet debited");

    let (_, body) = server.get(&format!("/api/v1/wallets/{id}/balance")).await;
    assert_eq!(
        Amount::parse(body["payload"]["balance"].as_str().unwrap()).unwrap(),
        Amount::ZERO
    );
}

#[tokio::test]
async fn test_invalid_amount_on_credit() {
    let server = create_test_server();
    let id = server.seed("900.00").await;

    for amount in ["abc", "", "-1", "1_000"] {
        let (status, _) = server
            .post(
                &format!("/api/v1/wallets/{id}/credit"),
                &format!(r#"{{"amount": "{amount}"}}"#),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount:?}");
    }

    let wallet = server.repo.get(id).await.unwrap();
    assert_eq!(wallet.balance.to_string(), "900.00");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let server = create_test_server();
    let id = server.seed("1").await;

    let (status, body) = server
        .post(&format!("/api/v1/wallets/{id}/credit"), "{not json")
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_wallet_is_not_found() {
    let server = create_test_server();

    let (status, body) = server.get("/api/v1/wallets/999/balance").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Wallet not found");

    let (status, _) = server
        .post("/api/v1/wallets/999/debit", r#"{"amount": "1"}"#)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_wallet_id_is_unprocessable() {
    let server = create_test_server();

    for id in ["0", "-3", "abc", "1.5"] {
        let (status, _) = server.get(&format!("/api/v1/wallets/{id}/balance")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "id {id:?}");

        let (status, _) = server
            .post(&format!("/api/v1/wallets/{id}/credit"), r#"{"amount": "1"}"#)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "id {id:?}");
    }
}

#[tokio::test]
async fn test_invalid_wallet_id_wins_over_malformed_body() {
    let server = create_test_server();

    for op in ["credit", "debit"] {
        let (status, body) = server
            .post(&format!("/api/v1/wallets/abc/{op}"), "{not json")
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{op}");
        assert!(body["error"].is_string());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_over_http() {
    let server = Arc::new(create_test_server());
    let id = server.seed("100").await;

    let mut handles = Vec::new();
    for _ in 0..25 {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            server
                .post(&format!("/api/v1/wallets/{id}/debit"), r#"{"amount": "5"}"#)
                .await
                .0
        }));
    }

    let mut ok = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::BAD_REQUEST => rejected += 1,
            other => panic!("unexpected status {other}"),
        }
    }

    assert_eq!(ok, 20);
    assert_eq!(rejected, 5);
    assert_eq!(server.repo.get(id).await.unwrap().balance, Amount::ZERO);
}
