mod api;
mod middleware;

use std::sync::Arc;

use shopgate_core::{load_creators, Backend, CreatorDirectory};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, build_http_client, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(shopgate_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let creators = match &config.creators_path {
        Some(path) => {
            let directory = CreatorDirectory::from(load_creators(path)?);
            tracing::info!(path = %path.display(), count = directory.len(), "loaded creator directory");
            directory
        }
        None => {
            tracing::warn!(
                "SHOPGATE_CREATORS_PATH not set; similar-products lookups will return 404"
            );
            CreatorDirectory::default()
        }
    };

    for backend in [
        Backend::Agent,
        Backend::Merchant,
        Backend::Accounts,
        Backend::Reviews,
    ] {
        if !config.is_configured(backend) {
            tracing::warn!(%backend, "backend not configured; its routes will fail with 500");
        }
    }

    let state = AppState {
        http: build_http_client(&config.user_agent)?,
        config: Arc::clone(&config),
        creators: Arc::new(creators),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "shopgate listening");
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
