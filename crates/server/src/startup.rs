use std::future::Future;

use common::env;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: load config, open the store and serve until Ctrl+C.
///
/// `.env` loading and tracing init belong to the binary and happen before this is called.
pub async fn run() -> anyhow::Result<()> {
    // config.toml if present, otherwise env vars; blanks in the file are filled from env
    let cfg = AppConfig::load_and_validate()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    serve(cfg, shutdown_signal()).await
}

/// Open the configured store, bind the configured address and serve until `shutdown` resolves.
pub async fn serve<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    // Fail early on a path that can never be a store file
    env::ensure_env(&cfg.store.path).await?;

    // The one store handle for the process; opening also creates missing parent dirs
    let db = models::db::open(&cfg.store.path)
        .map_err(|e| StartupError::Store(e.to_string()))?;

    if let Ok(extra) = std::env::var("EXTRA_CONFIG") {
        info!(extra_config = %extra, "extra configuration supplied");
    }

    // bind errors abort startup
    let addr = cfg.server.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, store = %cfg.store.path, "starting todo server");
    serve_listener(listener, AppState::from_store(db), shutdown).await
}

/// Serve the todo router on an already bound listener. The store handle inside
/// `state` is released once this returns.
pub async fn serve_listener<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = routes::build_router(state, build_cors());
    // In-flight requests finish; idle keep-alive connections are closed
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    // `app` and its store handle are dropped here
    info!("todo server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler the only way out is an external kill
        error!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
