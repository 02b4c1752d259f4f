use std::time::{Duration, Instant};

use anyhow::Result;
use auth::{AuthState, config::AuthConfig};
use chrono::Utc;
use common::store::StoreConfig;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod config;
mod dashboard;
mod error;
mod middleware;
mod models;
mod reminders;
mod repositories;
mod routes;
mod state;

use crate::{config::LedgerConfig, repositories::LedgerRepository, state::AppState};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ledger service");

    let store = StoreConfig::from_env()?;
    if common::store::health_check(&store)? {
        info!("Data directory check successful");
    } else {
        anyhow::bail!("Data path {} is not usable", store.data_dir.display());
    }

    let auth_config = AuthConfig::from_env(&store)?;
    let auth = AuthState::from_config(&auth_config)?;
    info!(
        "Loaded credentials from {}, idle timeout {}s",
        auth_config.credentials_file.display(),
        auth_config.idle_timeout_seconds
    );

    let config = LedgerConfig::from_env()?;

    let app_state = AppState {
        auth: auth.clone(),
        ledger: LedgerRepository::new(store),
        reminder_windows: config.reminder_windows,
    };

    // Drop idle sessions and stale login throttle entries
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = auth.registry.purge_expired(&auth.sessions, Utc::now()).await;
            if purged > 0 {
                info!("Purged {} expired sessions", purged);
            }
            if let Some(throttle) = &auth.login_throttle {
                let stale = throttle.purge_stale(Instant::now()).await;
                if stale > 0 {
                    info!("Purged {} stale login throttle entries", stale);
                }
            }
        }
    });

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Ledger service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
