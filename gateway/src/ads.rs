//! Axum handlers proxying the Meta Ads and Google Ads reporting clients.
//!
//! `/…/metrics` never fails outright: upstream errors are answered with 200,
//! placeholder data and a classified error. The narrower endpoints report
//! failures directly (400 for bad input, 502 for upstream trouble).

use std::sync::Arc;

use ads_integrations::{
    classify, fallback_google, fallback_meta, AdsError, AdsResponse, GoogleAdsCredentials,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{models::MetaTokenRequest, AppState};

fn ok<T: Serialize>(message: &str, data: T) -> Response {
    (StatusCode::OK, Json(AdsResponse::ok(message, data))).into_response()
}

/// Structured failure: 400 for validation errors, 502 for everything else.
pub(crate) fn failure(message: &str, err: &AdsError) -> Response {
    let status = if err.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    };
    let mut info = classify(err);
    if err.is_validation() && info.kind.is_none() {
        info.kind = Some("ValidationError".to_string());
    }
    warn!(status = status.as_u16(), error = %err, "{}", message);
    (status, Json(AdsResponse::<Value>::failure(message, info))).into_response()
}

fn body_rejection(rejection: JsonRejection) -> Response {
    failure(
        "invalid request body",
        &AdsError::Validation(rejection.body_text()),
    )
}

// ------------------------------------------------------------------ //
//  Meta Ads                                                           //
// ------------------------------------------------------------------ //

async fn meta_metrics(state: &AppState, token: &str) -> Response {
    match state.meta_client().account_metrics(token).await {
        Ok(record) => {
            info!(account_id = %record.id, "meta metrics served");
            ok("Meta Ads metrics retrieved", record)
        }
        Err(e) => {
            warn!(error = %e, "meta metrics failed; serving placeholder");
            (StatusCode::OK, Json(fallback_meta(&e, state.fallback.as_ref()))).into_response()
        }
    }
}

/// `GET /meta-ads/metrics?token=…`
pub async fn meta_metrics_query(
    State(state): State<Arc<AppState>>,
    Query(req): Query<MetaTokenRequest>,
) -> Response {
    meta_metrics(&state, &req.token).await
}

/// `POST /meta-ads/metrics` with `{"token": "…"}`
pub async fn meta_metrics_body(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetaTokenRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(req)) => meta_metrics(&state, &req.token).await,
        Err(rejection) => body_rejection(rejection),
    }
}

pub async fn meta_campaign(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
    Query(req): Query<MetaTokenRequest>,
) -> Response {
    match state.meta_client().campaign_insights(&req.token, &campaign_id).await {
        Ok(record) => ok("Meta Ads campaign metrics retrieved", record),
        Err(e) => failure("failed to fetch Meta Ads campaign metrics", &e),
    }
}

pub async fn meta_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Query(req): Query<MetaTokenRequest>,
) -> Response {
    match state.meta_client().account_insights(&req.token, &account_id).await {
        Ok(record) => ok("Meta Ads account metrics retrieved", record),
        Err(e) => failure("failed to fetch Meta Ads account metrics", &e),
    }
}

pub async fn meta_account_campaigns(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Query(req): Query<MetaTokenRequest>,
) -> Response {
    match state.meta_client().list_campaigns(&req.token, &account_id).await {
        Ok(campaigns) => ok("Meta Ads campaigns retrieved", campaigns),
        Err(e) => failure("failed to list Meta Ads campaigns", &e),
    }
}

async fn meta_consolidated(state: &AppState, token: &str) -> Response {
    match state.meta_client().consolidated(token).await {
        Ok(records) => ok("Meta Ads consolidated metrics retrieved", records),
        Err(e) => failure("failed to fetch consolidated Meta Ads metrics", &e),
    }
}

pub async fn meta_consolidated_query(
    State(state): State<Arc<AppState>>,
    Query(req): Query<MetaTokenRequest>,
) -> Response {
    meta_consolidated(&state, &req.token).await
}

pub async fn meta_consolidated_body(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MetaTokenRequest>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(req)) => meta_consolidated(&state, &req.token).await,
        Err(rejection) => body_rejection(rejection),
    }
}

// ------------------------------------------------------------------ //
//  Google Ads                                                         //
// ------------------------------------------------------------------ //

async fn google_metrics(state: &AppState, creds: &GoogleAdsCredentials) -> Response {
    match state.google_client().account_metrics(creds).await {
        Ok(record) => {
            info!(customer_id = %record.id, "google metrics served");
            ok("Google Ads metrics retrieved", record)
        }
        Err(e) => {
            warn!(error = %e, "google metrics failed; serving placeholder");
            (StatusCode::OK, Json(fallback_google(&e, state.fallback.as_ref()))).into_response()
        }
    }
}

/// `GET /google-ads/metrics?client_id=…&client_secret=…&refresh_token=…`
pub async fn google_metrics_query(
    State(state): State<Arc<AppState>>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    google_metrics(&state, &creds).await
}

pub async fn google_metrics_body(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GoogleAdsCredentials>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(creds)) => google_metrics(&state, &creds).await,
        Err(rejection) => body_rejection(rejection),
    }
}

pub async fn google_campaign(
    State(state): State<Arc<AppState>>,
    Path(campaign_id): Path<String>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    match state.google_client().campaign_insights(&creds, &campaign_id).await {
        Ok(record) => ok("Google Ads campaign metrics retrieved", record),
        Err(e) => failure("failed to fetch Google Ads campaign metrics", &e),
    }
}

pub async fn google_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    match state.google_client().account_insights(&creds, &account_id).await {
        Ok(record) => ok("Google Ads account metrics retrieved", record),
        Err(e) => failure("failed to fetch Google Ads account metrics", &e),
    }
}

pub async fn google_account_campaigns(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    match state.google_client().list_campaigns(&creds, &account_id).await {
        Ok(campaigns) => ok("Google Ads campaigns retrieved", campaigns),
        Err(e) => failure("failed to list Google Ads campaigns", &e),
    }
}

async fn google_consolidated(state: &AppState, creds: &GoogleAdsCredentials) -> Response {
    match state.google_client().consolidated(creds).await {
        Ok(records) => ok("Google Ads consolidated metrics retrieved", records),
        Err(e) => failure("failed to fetch consolidated Google Ads metrics", &e),
    }
}

pub async fn google_consolidated_query(
    State(state): State<Arc<AppState>>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    google_consolidated(&state, &creds).await
}

pub async fn google_consolidated_body(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GoogleAdsCredentials>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(creds)) => google_consolidated(&state, &creds).await,
        Err(rejection) => body_rejection(rejection),
    }
}

pub async fn google_test_connection(
    State(state): State<Arc<AppState>>,
    Query(creds): Query<GoogleAdsCredentials>,
) -> Response {
    match state.google_client().test_connection(&creds).await {
        Ok(token_info) => ok("Google Ads connection verified", token_info),
        Err(e) => failure("Google Ads connection test failed", &e),
    }
}
