use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use service::counter::{repo::seaorm::SeaOrmCounterStore, CounterStore};
use service::runtime;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::{metrics, routes::{self, ServerState}};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Connect the database, create the counter row if needed and wrap the store in router state.
pub async fn build_state(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Runtime(format!("database connect failed: {e}")))?;
    let store = Arc::new(SeaOrmCounterStore::new(db));
    store
        .ensure_initialized()
        .await
        .map_err(|e| StartupError::Runtime(format!("counter initialization failed: {e}")))?;
    Ok(ServerState::new(store))
}

pub fn build_app(state: ServerState, cfg: &AppConfig) -> Router {
    metrics::register_all();
    routes::build_router(state, &cfg.server.static_dir, build_cors())
}

/// Serve `app` on an already bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; serving until killed");
        std::future::pending::<()>().await;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, shutting down");
}

/// Run the server with an already validated config.
pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    runtime::ensure_env(&cfg.server.static_dir).await?;

    let state = build_state(&cfg).await?;
    let app = build_app(state, &cfg);

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting clicker server");
    serve(listener, app, ctrl_c()).await
}
