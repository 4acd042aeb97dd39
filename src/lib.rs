use std::sync::Arc;

use axum::{middleware, routing::post, Router};

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod logging;
pub mod pool;
pub mod registry;
pub mod rpc;

use config::Config;
use pool::PoolProvider;
use registry::Registry;

pub const RPC_PATH: &str = "/targetrpc";

/// Read-only state shared by every request task. Nothing in here may be
/// mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<Registry>,
    pub pool: Arc<dyn PoolProvider>,
}

impl AppState {
    pub fn new(config: Config, registry: Registry, pool: Arc<dyn PoolProvider>) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            pool,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route(RPC_PATH, post(http::handlers::rpc_endpoint))
        .fallback(http::handlers::not_found)
        .method_not_allowed_fallback(http::handlers::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_basic_auth,
        ))
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
