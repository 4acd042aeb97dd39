use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    typed_header::TypedHeaderRejection,
    TypedHeader,
};
use tracing::warn;

use crate::{errors::AppError, AppState, RPC_PATH};

/// Basic-auth gate for the RPC endpoint. Requests that are not a POST to
/// the RPC path pass through untouched so the router's 404 fallbacks keep
/// precedence over authentication. For guarded requests, a missing or
/// undecodable `Authorization` header is rejected with 400 before any RPC
/// parsing; a decoded pair that does not match the configured credentials
/// gets 401. The presented pair is never logged.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    auth_header: Result<TypedHeader<Authorization<Basic>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if request.method() != Method::POST || request.uri().path() != RPC_PATH {
        return Ok(next.run(request).await);
    }

    let TypedHeader(auth) = auth_header
        .map_err(|_| AppError::bad_request("missing or malformed authorization header"))?;

    // Exact string equality on both fields. No constant-time comparison,
    // rate limiting, or lockout; known hardening gap.
    if auth.username() != state.config.user || auth.password() != state.config.password {
        warn!("rejected request with invalid credentials");
        return Err(AppError::unauthorized("invalid credentials"));
    }

    Ok(next.run(request).await)
}
