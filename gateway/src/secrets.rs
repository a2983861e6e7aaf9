//! Bitwarden Secrets Manager client.
//!
//! Platform credentials (Meta app secret, Google client secret, Google Ads
//! developer token) are fetched from Bitwarden Secrets Manager with the
//! machine-account token in `BWS_ACCESS_TOKEN`, falling back to plain
//! environment variables when the token is absent or the lookup fails.
//!
//! | Secret                  | Bitwarden id env var          | Env fallback             |
//! |-------------------------|-------------------------------|--------------------------|
//! | Meta app secret         | `BWS_META_APP_SECRET_ID`      | `META_APP_SECRET`        |
//! | Google client secret    | `BWS_GOOGLE_CLIENT_SECRET_ID` | `GOOGLE_CLIENT_SECRET`   |
//! | Google developer token  | `BWS_GOOGLE_DEV_TOKEN_ID`     | `GOOGLE_DEVELOPER_TOKEN` |

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_BWS_API_URL: &str = "https://api.bitwarden.com";

pub struct SecretsClient {
    access_token: Option<String>,
    api_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct BwsSecretResponse {
    value: String,
}

impl SecretsClient {
    /// Client configured from `BWS_ACCESS_TOKEN` and `BWS_API_URL`.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("BWS_ACCESS_TOKEN").ok(),
            std::env::var("BWS_API_URL").unwrap_or_else(|_| DEFAULT_BWS_API_URL.to_string()),
            reqwest::Client::new(),
        )
    }

    pub fn new(access_token: Option<String>, api_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.is_empty()),
            api_url: api_url.into(),
            http,
        }
    }

    /// Bitwarden first (when a token is configured), then `env_fallback`.
    pub async fn get_secret(&self, secret_id: &str, env_fallback: &str) -> Result<String> {
        if let Some(token) = &self.access_token {
            match self.fetch_from_bitwarden(token, secret_id).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(secret_id, error = %e, "bitwarden lookup failed, trying env var");
                }
            }
        }

        std::env::var(env_fallback).with_context(|| {
            format!("secret '{secret_id}' not in Bitwarden and env var '{env_fallback}' is not set")
        })
    }

    async fn fetch_from_bitwarden(&self, token: &str, secret_id: &str) -> Result<String> {
        let url = format!("{}/secrets/{}", self.api_url.trim_end_matches('/'), secret_id);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("request to Bitwarden Secrets Manager failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("Bitwarden API returned status {}", resp.status()));
        }

        let body: BwsSecretResponse = resp.json().await.context("malformed Bitwarden response")?;
        Ok(body.value)
    }

    /// Like [`Self::get_secret`], but a missing secret becomes an empty string.
    /// Empty credentials surface later as validation errors on the calls that
    /// need them.
    async fn secret_or_empty(&self, id_var: &str, default_id: &str, env_fallback: &str) -> String {
        let secret_id = std::env::var(id_var).unwrap_or_else(|_| default_id.to_string());
        match self.get_secret(&secret_id, env_fallback).await {
            Ok(value) => value,
            Err(e) => {
                warn!(env_fallback, error = %e, "secret unresolved; related endpoints will reject requests");
                String::new()
            }
        }
    }
}

/// Credentials the ad-platform clients need but must not live in config.
#[derive(Clone, Default)]
pub struct PlatformSecrets {
    pub meta_app_secret: String,
    pub google_client_secret: String,
    pub google_developer_token: String,
}

impl std::fmt::Debug for PlatformSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |s: &str| if s.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("PlatformSecrets")
            .field("meta_app_secret", &mask(&self.meta_app_secret))
            .field("google_client_secret", &mask(&self.google_client_secret))
            .field("google_developer_token", &mask(&self.google_developer_token))
            .finish()
    }
}

impl PlatformSecrets {
    pub async fn resolve(client: &SecretsClient) -> Self {
        Self {
            meta_app_secret: client
                .secret_or_empty("BWS_META_APP_SECRET_ID", "meta-app-secret", "META_APP_SECRET")
                .await,
            google_client_secret: client
                .secret_or_empty("BWS_GOOGLE_CLIENT_SECRET_ID", "google-client-secret", "GOOGLE_CLIENT_SECRET")
                .await,
            google_developer_token: client
                .secret_or_empty("BWS_GOOGLE_DEV_TOKEN_ID", "google-developer-token", "GOOGLE_DEVELOPER_TOKEN")
                .await,
        }
    }
}
