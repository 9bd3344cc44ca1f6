mod api;
mod middleware;

use std::sync::Arc;

use roster_analytics::{AnalyticsUpdater, UpdaterSettings};
use roster_modash::ModashClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = roster_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = roster_db::PoolConfig::from_app_config(&config);
    let pool = roster_db::connect_pool(&config.database_url, pool_config).await?;
    roster_db::run_migrations(&pool).await?;

    let modash = ModashClient::from_app_config(&config)?;
    let updater = AnalyticsUpdater::new(
        modash,
        pool.clone(),
        UpdaterSettings::from_app_config(&config),
    );

    let app = build_app(
        AppState {
            pool,
            updater: Arc::new(updater),
        },
        default_rate_limit_state(),
    );

    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "starting roster server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
