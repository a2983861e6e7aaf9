//! OAuth consent redirect and callback endpoints for both ad platforms.

use std::sync::Arc;

use ads_integrations::{AdsResponse, ErrorInfo, OAuthProvider};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{models::CallbackQuery, AppState};

fn oauth_failure(kind: &str, message: &str, detail: String) -> Response {
    warn!(kind, detail = %detail, "{}", message);
    let info = ErrorInfo::new(detail).with_kind(kind);
    (StatusCode::BAD_REQUEST, Json(AdsResponse::<Value>::failure(message, info))).into_response()
}

/// 302 to the platform consent screen.
fn begin(provider: &dyn OAuthProvider) -> Response {
    match provider.authorization_url() {
        Ok(url) => {
            info!(platform = provider.platform(), "redirecting to consent screen");
            (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
        }
        Err(e) => oauth_failure("OAuthError", "could not build authorization URL", e.to_string()),
    }
}

async fn complete(provider: &dyn OAuthProvider, query: CallbackQuery) -> Response {
    if query.state.as_deref().unwrap_or_default() != provider.expected_state() {
        return oauth_failure(
            "SecurityError",
            "invalid OAuth state",
            "the state parameter does not match the one issued with the authorization URL".to_string(),
        );
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        let detail = match query.error {
            Some(reason) => format!("authorization code not provided: {reason}"),
            None => "authorization code not provided".to_string(),
        };
        return oauth_failure("ValidationError", "missing authorization code", detail);
    };

    match provider.exchange_code(&code).await {
        Ok(token) => {
            info!(platform = provider.platform(), "oauth callback completed");
            (StatusCode::OK, Json(token)).into_response()
        }
        Err(e) => oauth_failure("OAuthError", "authorization code exchange failed", e.to_string()),
    }
}

pub async fn meta_auth(State(state): State<Arc<AppState>>) -> Response {
    begin(&state.meta_client())
}

pub async fn meta_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    complete(&state.meta_client(), query).await
}

pub async fn google_auth(State(state): State<Arc<AppState>>) -> Response {
    begin(&state.google_client())
}

pub async fn google_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    complete(&state.google_client(), query).await
}
