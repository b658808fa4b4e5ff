//! HTTP server for the fleet compliance engine.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fleet_compliance_engine::api::{AppState, create_router};
use fleet_compliance_engine::config::ConfigLoader;
use fleet_compliance_engine::settings::ServiceSettings;
use fleet_compliance_engine::store::SqliteStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = ServiceSettings::load().context("failed to load service settings")?;
    tracing::info!(?settings, "Loaded service settings");

    let config = ConfigLoader::load(&settings.config_dir).with_context(|| {
        format!("failed to load engine config from {}", settings.config_dir.display())
    })?;
    tracing::info!(
        code = %config.metadata().code,
        version = %config.metadata().version,
        "Loaded engine config"
    );

    let store = SqliteStore::open(&settings.database_path).with_context(|| {
        format!("failed to open work store at {}", settings.database_path.display())
    })?;

    let app = create_router(AppState::new(config, Arc::new(store)));

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;
    tracing::info!("fleet-compliance listening on {}", settings.bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
