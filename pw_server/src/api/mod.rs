//! HTTP API for the wallet service.
//!
//! # Modules
//!
//! - [`auth`]: Player access tokens
//! - [`middleware`]: Authentication middleware for wallet endpoints
//! - [`request_id`]: Request correlation, request logging and HTTP metrics
//! - [`wallets`]: Wallet endpoints
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                                - Store and cache status (public)
//! POST /api/v1/wallets                        - Create wallet for the caller
//! GET  /api/v1/wallets/{wallet_id}/balance    - Read balance
//! POST /api/v1/wallets/{wallet_id}/credit     - Add funds
//! POST /api/v1/wallets/{wallet_id}/debit      - Remove funds
//! ```
//!
//! Every `/api/v1` route requires `Authorization: Bearer <jwt>`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use pw_server::api::{AppState, auth::TokenService, create_router};
//! use player_wallet::cache::MemoryWalletCache;
//! use player_wallet::db::MemoryWalletRepository;
//! use player_wallet::wallet::WalletManager;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let wallet_manager = WalletManager::new(
//!     Arc::new(MemoryWalletRepository::new()),
//!     Arc::new(MemoryWalletCache::new()),
//! );
//! let state = AppState {
//!     wallet_manager: Arc::new(wallet_manager),
//!     tokens: Arc::new(TokenService::new("a-secret-of-at-least-thirty-two-chars")),
//! };
//!
//! let app = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod auth;
pub mod middleware;
pub mod request_id;
pub mod wallets;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use player_wallet::wallet::{WalletError, WalletManager};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use self::auth::TokenService;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub wallet_manager: Arc<WalletManager>,
    pub tokens: Arc<TokenService>,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Ledger error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            WalletError::InvalidWalletId(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WalletError::NotFound(_) => StatusCode::NOT_FOUND,
            WalletError::InvalidAmount(_)
            | WalletError::InsufficientFunds { .. }
            | WalletError::BalanceOverflow => StatusCode::BAD_REQUEST,
            WalletError::CacheMiss(_) | WalletError::Store(_) | WalletError::Cache(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.0.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Create the complete API router with all endpoints and middleware.
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/wallets", post(wallets::create_wallet))
        .route("/wallets/{wallet_id}/balance", get(wallets::get_balance))
        .route("/wallets/{wallet_id}/credit", post(wallets::credit_wallet))
        .route("/wallets/{wallet_id}/debit", post(wallets::debit_wallet))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}

/// Health check endpoint for monitoring and load balancers.
///
/// Returns `200 OK` while the durable store is reachable, `503 Service
/// Unavailable` otherwise. An unreachable cache degrades reads to the store
/// and is reported but does not fail the check.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","store":true,"cache":true,"version":"0.1.0","timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let health = state.wallet_manager.health().await;

    let (status_code, status) = match (health.is_healthy(), health.cache) {
        (true, true) => (StatusCode::OK, "healthy"),
        (true, false) => (StatusCode::OK, "degraded"),
        (false, _) => (StatusCode::SERVICE_UNAVAILABLE, "unhealthy"),
    };

    let response = json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "store": health.store,
        "cache": health.cache,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use player_wallet::wallet::{Amount, StoreError};
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (WalletError::InvalidWalletId("abc".into()), StatusCode::UNPROCESSABLE_ENTITY),
            (WalletError::NotFound(6), StatusCode::NOT_FOUND),
            (WalletError::InvalidAmount("-1".into()), StatusCode::BAD_REQUEST),
            (
                WalletError::InsufficientFunds {
                    available: Amount::ZERO,
                    required: Amount::parse("1").unwrap(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (WalletError::BalanceOverflow, StatusCode::BAD_REQUEST),
            (
                WalletError::Store(StoreError::Timeout(Duration::from_secs(5))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn test_internal_errors_are_sanitized() {
        let err = ApiError(WalletError::Store(StoreError::Timeout(Duration::from_secs(5))));
        assert_eq!(err.0.client_message(), "Internal server error");
    }
}
