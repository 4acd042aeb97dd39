//! Axum handlers for the RPC endpoint.
//!
//! Accepted requests always get HTTP 200 with a JSON body; JSON-RPC level
//! failures are reported inside that body, never via the status code.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};

use crate::rpc::dispatch::dispatch;
use crate::AppState;

pub async fn rpc_endpoint(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    let response = dispatch(&state, &body).await;
    (StatusCode::OK, Json(response))
}

/// Shared fallback for unknown paths and non-POST methods: a bare 404 with
/// an empty body, no RPC processing.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
