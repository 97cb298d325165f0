mod config;
mod error;
mod routes;
mod upstream;

use std::process;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::RelayConfig;
use crate::routes::{router, AppState};
use crate::upstream::GeminiClient;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match RelayConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("FATAL: {err}");
            process::exit(1);
        }
    };

    let http = match reqwest::Client::builder()
        .timeout(config.upstream_timeout)
        .build()
    {
        Ok(http) => http,
        Err(err) => {
            error!("FATAL: http client init failed: {err}");
            process::exit(1);
        }
    };

    let state = AppState {
        generator: Arc::new(GeminiClient::new(http, config.gemini_settings())),
    };
    let app = router(state, config.allowed_origin.clone());

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("FATAL: bind {} failed: {err}", config.addr);
            process::exit(1);
        }
    };

    info!(
        model = %config.model,
        origin = ?config.allowed_origin,
        "chat relay listening on http://{}",
        config.addr
    );
    if let Err(err) = axum::serve(listener, app).await {
        error!("server stopped: {err}");
        process::exit(1);
    }
}
