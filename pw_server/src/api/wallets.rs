//! Wallet API handlers.
//!
//! # Examples
//!
//! Credit a wallet:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/wallets/6/credit \
//!   -H "Authorization: Bearer $TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"amount": "5000"}'
//! ```
//!
//! Read the balance:
//! ```bash
//! curl http://localhost:8080/api/v1/wallets/6/balance -H "Authorization: Bearer $TOKEN"
//! # {"payload":{"balance":"5900.00"}}
//! ```

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use player_wallet::wallet::{WalletError, WalletId, WalletResult, parse_wallet_id};
use serde::Deserialize;
use serde_json::{Value, json};
use std::future::Future;
use std::time::Instant;

use super::{ApiError, AppState, ErrorResponse, middleware::AuthenticatedPlayer, request_id::RequestId};
use crate::{logging, metrics};

/// Body of credit and debit requests
#[derive(Debug, Deserialize)]
pub struct AmountPayload {
    pub amount: String,
}

/// Create a wallet for the authenticated player.
///
/// # Response
///
/// ```json
/// {"payload": {"id": 7, "playerId": 42, "balance": "0", "created_at": "...", "updated_at": "..."}}
/// ```
///
/// # Errors
///
/// - `500 Internal Server Error`: Store failure
pub async fn create_wallet(
    State(state): State<AppState>,
    Extension(AuthenticatedPlayer(player_id)): Extension<AuthenticatedPlayer>,
    request_id: RequestId,
) -> Result<Json<Value>, ApiError> {
    let wallet = observe(
        "create",
        None,
        &request_id,
        state.wallet_manager.create_for_player(player_id),
    )
    .await?;

    Ok(Json(json!({ "payload": wallet })))
}

/// Read a wallet's balance.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: `wallet_id` is not a positive integer
/// - `404 Not Found`: No such wallet
/// - `500 Internal Server Error`: Store failure
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    request_id: RequestId,
) -> Result<Json<Value>, ApiError> {
    let id = parse_wallet_id(&wallet_id)?;
    let wallet = observe("get", Some(id), &request_id, state.wallet_manager.get(id)).await?;

    Ok(Json(json!({ "payload": { "balance": wallet.balance } })))
}

/// Add funds to a wallet.
///
/// # Request Body
///
/// ```json
/// {"amount": "5000"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body or invalid amount
/// - `422 Unprocessable Entity`: `wallet_id` is not a positive integer
/// - `404 Not Found`: No such wallet
/// - `500 Internal Server Error`: Store failure
pub async fn credit_wallet(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    request_id: RequestId,
    payload: Result<Json<AmountPayload>, JsonRejection>,
) -> Response {
    let id = match parse_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };

    let result = observe(
        "credit",
        Some(id),
        &request_id,
        state.wallet_manager.credit(id, &payload.amount),
    )
    .await;

    match result {
        Ok(()) => Json(json!({ "message": "wallet credited" })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Remove funds from a wallet.
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body, invalid amount or insufficient funds
/// - `422 Unprocessable Entity`: `wallet_id` is not a positive integer
/// - `404 Not Found`: No such wallet
/// - `500 Internal Server Error`: Store failure
pub async fn debit_wallet(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
    request_id: RequestId,
    payload: Result<Json<AmountPayload>, JsonRejection>,
) -> Response {
    let id = match parse_wallet_id(&wallet_id) {
        Ok(id) => id,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };

    let result = observe(
        "debit",
        Some(id),
        &request_id,
        state.wallet_manager.debit(id, &payload.amount),
    )
    .await;

    match result {
        Ok(()) => Json(json!({ "message": "wallet debited" })).into_response(),
        Err(e) => e.into_response(),
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
        .into_response()
}

/// Run a ledger call, recording its outcome in logs and metrics.
async fn observe<T>(
    operation: &'static str,
    wallet_id: Option<WalletId>,
    request_id: &RequestId,
    call: impl Future<Output = WalletResult<T>>,
) -> Result<T, ApiError> {
    let started = Instant::now();
    let result = call.await;
    let elapsed = started.elapsed();

    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => outcome_label(e),
    };
    logging::log_wallet_operation(operation, wallet_id, outcome, elapsed);
    metrics::wallet_operation(operation, outcome, elapsed);

    result.map_err(|e| {
        if !e.is_client_error() {
            tracing::error!(
                request_id = request_id.as_str(),
                operation,
                wallet_id,
                error = %e,
                "Wallet operation failed"
            );
        }
        ApiError(e)
    })
}

fn outcome_label(err: &WalletError) -> &'static str {
    match err {
        WalletError::NotFound(_) => "not_found",
        WalletError::InsufficientFunds { .. } => "insufficient_funds",
        WalletError::InvalidAmount(_) => "invalid_amount",
        WalletError::InvalidWalletId(_) => "invalid_wallet_id",
        WalletError::BalanceOverflow => "overflow",
        WalletError::CacheMiss(_) | WalletError::Cache(_) => "cache_error",
        WalletError::Store(_) => "store_error",
    }
}
