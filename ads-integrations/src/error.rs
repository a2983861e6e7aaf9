//! Error type shared by the Meta and Google Ads clients.
//!
//! Variants are built where the failure happens (token endpoint, Graph API,
//! search endpoint, decoder) so later classification can match on the tag
//! instead of re-parsing the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error object returned by the Graph API in `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct GraphApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub error_subcode: Option<i64>,
    #[serde(default)]
    pub fbtrace_id: Option<String>,
}

impl std::fmt::Display for GraphApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph API error {} ({}): {}", self.code, self.kind, self.message)
    }
}

#[derive(Debug, Error)]
pub enum AdsError {
    /// A required credential or parameter was missing; raised before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx answer from a token or reporting endpoint. `body` is verbatim.
    #[error("{operation} failed with status {status}: {body}")]
    RemoteApi {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    Graph(GraphApiError),

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The identity check for an access token did not succeed.
    #[error("invalid or unauthorized access token: {0}")]
    InvalidToken(#[source] Box<AdsError>),

    #[error("no ad account is available for this access token")]
    NoAdAccount,
}

impl AdsError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdsError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AdsError::Validation(_))
    }

    /// HTTP status reported by the upstream service, when there was one.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            AdsError::RemoteApi { status, .. } => Some(*status),
            AdsError::InvalidToken(inner) => inner.upstream_status(),
            _ => None,
        }
    }
}

/// Fail with [`AdsError::Validation`] when `value` is blank.
pub(crate) fn require(value: &str, what: &str) -> Result<(), AdsError> {
    if value.trim().is_empty() {
        return Err(AdsError::Validation(format!("{what} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_api_display_embeds_status_and_body() {
        let err = AdsError::RemoteApi {
            operation: "token exchange",
            status: 400,
            body: r#"{"error":"invalid_grant"}"#.into(),
        };
        let text = err.to_string();
        assert!(text.contains("400"));
        assert!(text.contains(r#"{"error":"invalid_grant"}"#));
        assert_eq!(err.upstream_status(), Some(400));
    }

    #[test]
    fn require_rejects_blank_values() {
        assert!(matches!(require("  ", "client id"), Err(AdsError::Validation(m)) if m == "client id is required"));
        assert!(require("abc", "client id").is_ok());
    }

    #[test]
    fn graph_error_decodes_from_envelope_fields() {
        let err: GraphApiError = serde_json::from_value(serde_json::json!({
            "message": "Unsupported get request.",
            "type": "GraphMethodException",
            "code": 100,
            "fbtrace_id": "AbC"
        }))
        .unwrap();
        assert_eq!(err.code, 100);
        assert_eq!(err.kind, "GraphMethodException");
        assert_eq!(err.fbtrace_id.as_deref(), Some("AbC"));
        assert_eq!(err.error_subcode, None);
    }
}
