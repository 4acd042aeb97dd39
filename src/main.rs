use std::sync::Arc;

use targetd::{build_app, config::Config, logging, pool::LvmPool, registry::Registry, AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::load()?;
    if config.ssl {
        // Flag is accepted for forward compatibility but has no effect.
        warn!("ssl is enabled in the configuration but TLS is not implemented; serving plaintext");
    }

    // Fail early if the pool is unreachable; the daemon must not start
    // serving without it.
    let pool = LvmPool::new(config.pool_name.clone());
    pool.probe().await?;

    let registry = Registry::with_builtin_methods()?;
    let bind_socket = config.bind_socket()?;
    let state = AppState::new(config, registry, Arc::new(pool));
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(addr = %bind_socket, "server starting");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives. The listener stops accepting at
/// that point; in-flight requests finish on their own.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("failed to install SIGINT handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                warn!("failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("interrupt received, shutting down");
}
