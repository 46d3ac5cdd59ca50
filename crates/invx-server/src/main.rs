mod api;
mod middleware;

use std::sync::Arc;

use invx_core::InvoiceCollection;
use invx_xtract::XtractClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RateLimitState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(invx_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::debug!(config = ?config, "configuration loaded");

    let collection = Arc::new(load_collection(&config)?);
    let client = XtractClient::with_base_url(
        &config.xtract_auth_token,
        config.xtract_request_timeout_secs,
        &config.xtract_api_url,
    )?;
    let rate_limit =
        RateLimitState::new(config.process_rate_limit, config.process_rate_window());

    if !config.documents_dir.is_dir() {
        tracing::warn!(
            documents_dir = %config.documents_dir.display(),
            "documents directory does not exist; invoice listing will fail until it is created"
        );
    }

    let app = build_app(
        AppState {
            config: Arc::clone(&config),
            client,
            collection,
        },
        rate_limit,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        xtract_api_url = %config.xtract_api_url,
        "invx-server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn load_collection(config: &invx_core::AppConfig) -> anyhow::Result<InvoiceCollection> {
    match &config.collection_path {
        Some(path) => {
            let collection = invx_core::load_collection(path)?;
            tracing::info!(
                path = %path.display(),
                collection_id = %collection.id,
                invoices = collection.invoices.len(),
                "loaded invoice collection"
            );
            Ok(collection)
        }
        None => Ok(invx_core::sample_collection()),
    }
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
