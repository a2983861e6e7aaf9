//! HTTP request/response models for the gateway's public REST API.

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------ //
//  Inbound (client → gateway)                                         //
// ------------------------------------------------------------------ //

/// Meta user access token; query string on GET, JSON body on POST.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaTokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Redirect target of the OAuth consent screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the platform when the user denied consent.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KiwifyQuery {
    pub signature: Option<String>,
}

// ------------------------------------------------------------------ //
//  Outbound (gateway → client)                                        //
// ------------------------------------------------------------------ //

/// `{status, message, data?}` envelope returned by the webhook receivers.
#[derive(Debug, Serialize)]
pub struct WebhookResponse<T> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> WebhookResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl WebhookResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: None,
        }
    }
}
