//! Gateway service: checkout webhooks and ads metrics proxy.
//!
//! Receives checkout notifications (Hotmart, Kiwify, Kirvano) and serves
//! Meta Ads / Google Ads performance metrics fetched with caller-supplied
//! OAuth credentials.
//!
//! # Configuration
//! Plain settings come from the environment (see `gateway::config`); the
//! platform secrets are resolved via Bitwarden Secrets Manager (when
//! `BWS_ACCESS_TOKEN` is set) or plain environment variables (see
//! `gateway::secrets`).

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use gateway::{
    config::GatewayConfig,
    secrets::{PlatformSecrets, SecretsClient},
    AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gateway=info".parse()?)
                .add_directive("ads_integrations=info".parse()?),
        )
        .json()
        .init();

    let config = GatewayConfig::load().context("failed to read gateway configuration")?;
    let secrets = PlatformSecrets::resolve(&SecretsClient::from_env()).await;

    let meta = config.meta_ads(&secrets);
    let google = config.google_ads(&secrets);
    if meta.app_id.is_empty() {
        warn!("META_APP_ID not set; Meta OAuth endpoints will reject requests");
    }
    if google.client_id.is_empty() {
        warn!("GOOGLE_CLIENT_ID not set; Google OAuth endpoints will reject requests");
    }
    info!(
        meta_api_version = %meta.api_version,
        google_api_version = %google.api_version,
        "ad platform clients configured"
    );

    let state = Arc::new(AppState::new(meta, google));
    let app = gateway::router(state);

    let listener = tokio::net::TcpListener::bind(&config.gateway_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.gateway_addr))?;
    info!(addr = %config.gateway_addr, "gateway listening");

    axum::serve(listener, app).await?;

    Ok(())
}
