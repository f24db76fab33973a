use axum::http::HeaderValue;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Permissive when no origins are configured, otherwise an exact allow-list.
pub fn build_cors(origins: &[String]) -> Result<CorsLayer, StartupError> {
    if origins.is_empty() {
        return Ok(CorsLayer::very_permissive());
    }
    let parsed = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).map_err(|_| StartupError::InvalidConfig(format!("bad CORS origin: {o}"))))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::very_permissive().allow_origin(AllowOrigin::list(parsed)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    info!(event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Connect, optionally migrate, then serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    if cfg.database.auto_migrate {
        Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
        info!(event = "migrations_applied", "database schema is up to date");
    }

    let cors = build_cors(&cfg.server.cors_origins)?;
    let state = AppState::new(db, cfg.environment.clone());
    let app = routes::build_router(state, cors);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(anyhow::Error::from)?;
    info!(%addr, environment = %cfg.environment, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_origins_that_are_not_header_values() {
        assert!(build_cors(&[]).is_ok());
        assert!(build_cors(&["http://localhost:5173".into()]).is_ok());
        assert!(matches!(build_cors(&["bad\norigin".into()]), Err(StartupError::InvalidConfig(_))));
    }
}
