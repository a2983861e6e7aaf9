//! OAuth 2.0 token lifecycle shared by both ad platforms.
//!
//! The flow itself is tracked by the caller:
//! authorization URL → callback with `code` → [`OAuthProvider::exchange_code`]
//! → (on expiry) [`OAuthProvider::refresh_token`]. Nothing here stores tokens.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AdsError;

/// Token endpoint answer, common to Meta and Google.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Short platform label used in logs and messages.
    fn platform(&self) -> &'static str;

    /// Anti-CSRF state the callback must echo back.
    fn expected_state(&self) -> &str;

    /// Consent-screen URL. Pure; fails only on missing configuration.
    fn authorization_url(&self) -> Result<String, AdsError>;

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AdsError>;

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AdsError>;
}

/// Build `base` with `params` appended as an encoded query string.
pub(crate) fn url_with_query(base: &str, params: &[(&str, &str)]) -> Result<String, AdsError> {
    let mut url = url::Url::parse(base)
        .map_err(|e| AdsError::Validation(format!("invalid endpoint URL {base}: {e}")))?;
    url.query_pairs_mut().extend_pairs(params.iter());
    Ok(url.into())
}

/// Pass 2xx responses through; turn anything else into [`AdsError::RemoteApi`]
/// carrying the body verbatim.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<reqwest::Response, AdsError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(AdsError::RemoteApi {
        operation,
        status,
        body,
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &'static str,
) -> Result<T, AdsError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| AdsError::Decode { operation, source })
}
