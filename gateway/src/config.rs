//! Gateway settings.
//!
//! Read from the process environment (after `.env` is loaded) through the
//! `config` crate. Secrets are not part of this struct; see [`crate::secrets`].
//!
//! | Env var                      | Default                                      |
//! |------------------------------|----------------------------------------------|
//! | `GATEWAY_ADDR`               | `0.0.0.0:8080`                               |
//! | `META_APP_ID`                | (empty)                                      |
//! | `META_REDIRECT_URI`          | (empty)                                      |
//! | `META_STATE`                 | (empty)                                      |
//! | `META_API_VERSION`           | `v22.0`                                      |
//! | `META_GRAPH_BASE_URL`        | `https://graph.facebook.com`                 |
//! | `META_DIALOG_BASE_URL`       | `https://www.facebook.com`                   |
//! | `GOOGLE_CLIENT_ID`           | (empty)                                      |
//! | `GOOGLE_REDIRECT_URI`        | (empty)                                      |
//! | `GOOGLE_STATE`               | (empty)                                      |
//! | `GOOGLE_API_VERSION`         | `v17`                                        |
//! | `GOOGLE_DEFAULT_CUSTOMER_ID` | unset                                        |
//! | `GOOGLE_LOGIN_CUSTOMER_ID`   | unset                                        |
//! | `GOOGLE_AUTH_URL`            | `https://accounts.google.com/o/oauth2/v2/auth` |
//! | `GOOGLE_TOKEN_URL`           | `https://oauth2.googleapis.com/token`        |
//! | `GOOGLE_TOKEN_INFO_URL`      | `https://www.googleapis.com/oauth2/v3/tokeninfo` |
//! | `GOOGLE_ADS_BASE_URL`        | `https://googleads.googleapis.com`           |

use ads_integrations::{google_ads, meta_ads, GoogleAdsConfig, MetaAdsConfig};
use serde::Deserialize;

use crate::secrets::PlatformSecrets;

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_addr")]
    pub gateway_addr: String,

    #[serde(default)]
    pub meta_app_id: String,
    #[serde(default)]
    pub meta_redirect_uri: String,
    #[serde(default)]
    pub meta_state: String,
    #[serde(default = "default_meta_api_version")]
    pub meta_api_version: String,
    #[serde(default = "default_graph_base_url")]
    pub meta_graph_base_url: String,
    #[serde(default = "default_dialog_base_url")]
    pub meta_dialog_base_url: String,

    #[serde(default)]
    pub google_client_id: String,
    #[serde(default)]
    pub google_redirect_uri: String,
    #[serde(default)]
    pub google_state: String,
    #[serde(default = "default_google_api_version")]
    pub google_api_version: String,
    #[serde(default)]
    pub google_default_customer_id: Option<String>,
    #[serde(default)]
    pub google_login_customer_id: Option<String>,
    #[serde(default = "default_google_auth_url")]
    pub google_auth_url: String,
    #[serde(default = "default_google_token_url")]
    pub google_token_url: String,
    #[serde(default = "default_google_token_info_url")]
    pub google_token_info_url: String,
    #[serde(default = "default_google_ads_base_url")]
    pub google_ads_base_url: String,
}

fn default_addr() -> String {
    "0.0.0.0:8080".to_string()
}
fn default_meta_api_version() -> String {
    meta_ads::DEFAULT_GRAPH_API_VERSION.to_string()
}
fn default_graph_base_url() -> String {
    meta_ads::DEFAULT_GRAPH_BASE_URL.to_string()
}
fn default_dialog_base_url() -> String {
    meta_ads::DEFAULT_DIALOG_BASE_URL.to_string()
}
fn default_google_api_version() -> String {
    google_ads::DEFAULT_GOOGLE_ADS_API_VERSION.to_string()
}
fn default_google_auth_url() -> String {
    google_ads::DEFAULT_AUTH_URL.to_string()
}
fn default_google_token_url() -> String {
    google_ads::DEFAULT_TOKEN_URL.to_string()
}
fn default_google_token_info_url() -> String {
    google_ads::DEFAULT_TOKEN_INFO_URL.to_string()
}
fn default_google_ads_base_url() -> String {
    google_ads::DEFAULT_ADS_BASE_URL.to_string()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl GatewayConfig {
    /// Load from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(config::Config::builder().add_source(config::Environment::default()))
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn meta_ads(&self, secrets: &PlatformSecrets) -> MetaAdsConfig {
        MetaAdsConfig {
            app_id: self.meta_app_id.clone(),
            app_secret: secrets.meta_app_secret.clone(),
            redirect_uri: self.meta_redirect_uri.clone(),
            state: self.meta_state.clone(),
            api_version: self.meta_api_version.clone(),
            dialog_base_url: self.meta_dialog_base_url.clone(),
            graph_base_url: self.meta_graph_base_url.clone(),
        }
    }

    pub fn google_ads(&self, secrets: &PlatformSecrets) -> GoogleAdsConfig {
        GoogleAdsConfig {
            client_id: self.google_client_id.clone(),
            client_secret: secrets.google_client_secret.clone(),
            redirect_uri: self.google_redirect_uri.clone(),
            state: self.google_state.clone(),
            developer_token: secrets.google_developer_token.clone(),
            api_version: self.google_api_version.clone(),
            default_customer_id: non_blank(&self.google_default_customer_id),
            login_customer_id: non_blank(&self.google_login_customer_id),
            auth_url: self.google_auth_url.clone(),
            token_url: self.google_token_url.clone(),
            token_info_url: self.google_token_info_url.clone(),
            ads_base_url: self.google_ads_base_url.clone(),
        }
    }
}
