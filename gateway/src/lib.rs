//! Gateway service: checkout webhooks and ad-platform metrics over HTTP.

pub mod ads;
pub mod auth;
pub mod checkout;
pub mod config;
pub mod models;
pub mod secrets;
pub mod webhooks;

use std::sync::Arc;

use ads_integrations::{
    FallbackProvider, FixtureFallback, GoogleAdsClient, GoogleAdsConfig, MetaAdsClient,
    MetaAdsConfig,
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

// ------------------------------------------------------------------ //
//  Shared application state                                           //
// ------------------------------------------------------------------ //

/// Shared state injected into every Axum handler via `State`.
pub struct AppState {
    pub meta: MetaAdsConfig,
    pub google: GoogleAdsConfig,
    /// Connection pool shared by every per-request client.
    pub http: reqwest::Client,
    /// Placeholder source for the top-level metrics endpoints.
    pub fallback: Arc<dyn FallbackProvider>,
}

impl AppState {
    pub fn new(meta: MetaAdsConfig, google: GoogleAdsConfig) -> Self {
        Self {
            meta,
            google,
            http: reqwest::Client::new(),
            fallback: Arc::new(FixtureFallback),
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn FallbackProvider>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn meta_client(&self) -> MetaAdsClient {
        MetaAdsClient::with_http_client(self.meta.clone(), self.http.clone())
    }

    pub fn google_client(&self) -> GoogleAdsClient {
        GoogleAdsClient::with_http_client(self.google.clone(), self.http.clone())
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({"status": "ok"})))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Checkout webhooks
        .route("/webhook/echo", post(webhooks::echo))
        .route("/webhook/hotmart", post(webhooks::hotmart))
        .route("/webhook/kiwify", post(webhooks::kiwify))
        .route("/webhook/kirvano", post(webhooks::kirvano))
        // Meta Ads
        .route(
            "/meta-ads/metrics",
            get(ads::meta_metrics_query).post(ads::meta_metrics_body),
        )
        .route(
            "/api/meta-ads/metrics",
            get(ads::meta_metrics_query).post(ads::meta_metrics_body),
        )
        .route("/meta-ads/campaigns/:campaign_id", get(ads::meta_campaign))
        .route("/meta-ads/accounts/:account_id", get(ads::meta_account))
        .route(
            "/meta-ads/accounts/:account_id/campaigns",
            get(ads::meta_account_campaigns),
        )
        .route(
            "/meta-ads/consolidated",
            get(ads::meta_consolidated_query).post(ads::meta_consolidated_body),
        )
        .route("/meta-ads/auth", get(auth::meta_auth))
        .route("/meta-ads/callback", get(auth::meta_callback))
        // Google Ads
        .route(
            "/google-ads/metrics",
            get(ads::google_metrics_query).post(ads::google_metrics_body),
        )
        .route(
            "/api/google-ads/metrics",
            get(ads::google_metrics_query).post(ads::google_metrics_body),
        )
        .route("/google-ads/campaigns/:campaign_id", get(ads::google_campaign))
        .route("/google-ads/accounts/:account_id", get(ads::google_account))
        .route(
            "/google-ads/accounts/:account_id/campaigns",
            get(ads::google_account_campaigns),
        )
        .route(
            "/google-ads/consolidated",
            get(ads::google_consolidated_query).post(ads::google_consolidated_body),
        )
        .route("/google-ads/auth", get(auth::google_auth))
        .route("/google-ads/callback", get(auth::google_callback))
        .route("/google-ads/test-connection", get(ads::google_test_connection))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
