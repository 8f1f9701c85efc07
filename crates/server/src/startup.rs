use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Seed the configured admin account when no admin exists yet.
pub async fn bootstrap_admin(state: &ServerState, cfg: &AppConfig) -> Result<(), StartupError> {
    let (Some(email), Some(password)) = (cfg.auth.admin_email.as_deref(), cfg.auth.admin_password.as_deref()) else {
        return Ok(());
    };
    state
        .auth
        .ensure_admin(email, password, &cfg.auth.admin_name)
        .await
        .map_err(|e| StartupError::Runtime(format!("admin bootstrap: {e}")))?;
    Ok(())
}

/// Connect, migrate and bootstrap; everything the router needs.
pub async fn prepare(cfg: &AppConfig) -> Result<ServerState, StartupError> {
    let db: DatabaseConnection = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        models::db::migrate(&db).await?;
    } else {
        warn!("database.auto_migrate is off; assuming schema is current");
    }
    let state = ServerState::new(db, cfg);
    bootstrap_admin(&state, cfg).await?;
    Ok(state)
}

pub fn app(state: ServerState, cfg: &AppConfig) -> Router {
    routes::build_router(state, build_cors(), &cfg.server.static_dir)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

/// Load `.env` and the validated config. Call before logging is set up so
/// the configured format can be honoured.
pub fn load_config() -> Result<AppConfig, StartupError> {
    dotenv().ok();
    AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))
}

/// Build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    common::env::ensure_env(&cfg.server.static_dir).await?;
    let state = prepare(&cfg).await?;
    let app = app(state, &cfg);

    let addr: SocketAddr = cfg
        .bind_addr()
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {}: {e}", cfg.bind_addr())))?;
    info!(%addr, static_dir = %cfg.server.static_dir, "starting quran academy api");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {addr}: {e}")))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!("server stopped");
    Ok(())
}
