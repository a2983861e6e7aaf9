//! Error classification and placeholder substitution for the top-level
//! metrics endpoints.

use crate::error::AdsError;
use crate::models::{AdsResponse, ErrorInfo, GoogleAdsMetrics, MetaAdsMetrics};

/// Graph API code for calls made with a retired API version.
pub const DEPRECATED_API_VERSION_CODE: i64 = 2635;

pub const DEPRECATED_API_VERSION_DETAILS: &str =
    "The configured Graph API version has been retired. Set a current version (for example v22.0) and retry.";

// ------------------------------------------------------------------ //
//  Classification                                                     //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    Permission,
    RateLimit,
    DeprecatedApiVersion,
}

impl ErrorCategory {
    pub fn type_name(self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "AuthenticationError",
            ErrorCategory::Permission => "PermissionError",
            ErrorCategory::RateLimit => "RateLimitError",
            ErrorCategory::DeprecatedApiVersion => "DeprecatedAPIVersionError",
        }
    }

    pub fn code(self) -> i64 {
        match self {
            ErrorCategory::Authentication => 190,
            ErrorCategory::Permission => 200,
            ErrorCategory::RateLimit => 4,
            ErrorCategory::DeprecatedApiVersion => DEPRECATED_API_VERSION_CODE,
        }
    }

    fn details(self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "The access token is invalid or expired. Re-authorize and retry.",
            ErrorCategory::Permission => "The token lacks the permissions needed to read this account.",
            ErrorCategory::RateLimit => "The platform is throttling requests. Wait before retrying.",
            ErrorCategory::DeprecatedApiVersion => DEPRECATED_API_VERSION_DETAILS,
        }
    }

    fn describe(self, message: String) -> ErrorInfo {
        ErrorInfo::new(message)
            .with_kind(self.type_name())
            .with_code(self.code())
            .with_details(self.details())
    }
}

const AUTH_MARKERS: [&str; 6] = [
    "invalid token",
    "invalid access token",
    "expired token",
    "token expired",
    "session has expired",
    "invalid_grant",
];
const PERMISSION_MARKERS: [&str; 3] = ["insufficient permission", "permission denied", "permission_denied"];
const RATE_LIMIT_MARKERS: [&str; 3] = ["rate limit", "too many requests", "resource_exhausted"];
const DEPRECATED_MARKERS: [&str; 2] = ["deprecated version", "2635"];

/// Last-resort category from free text, checked in priority order.
pub fn category_from_text(message: &str) -> Option<ErrorCategory> {
    let text = message.to_lowercase();
    let hit = |markers: &[&str]| markers.iter().any(|m| text.contains(m));

    if hit(&AUTH_MARKERS) {
        Some(ErrorCategory::Authentication)
    } else if hit(&PERMISSION_MARKERS) {
        Some(ErrorCategory::Permission)
    } else if hit(&RATE_LIMIT_MARKERS) {
        Some(ErrorCategory::RateLimit)
    } else if hit(&DEPRECATED_MARKERS) {
        Some(ErrorCategory::DeprecatedApiVersion)
    } else {
        None
    }
}

fn category_from_status(status: u16) -> Option<ErrorCategory> {
    match status {
        401 => Some(ErrorCategory::Authentication),
        403 => Some(ErrorCategory::Permission),
        429 => Some(ErrorCategory::RateLimit),
        _ => None,
    }
}

pub fn classify(err: &AdsError) -> ErrorInfo {
    let message = err.to_string();

    let category = match err {
        AdsError::Graph(graph) => {
            let mut info = ErrorInfo::new(graph.message.clone()).with_code(graph.code);
            if !graph.kind.is_empty() {
                info = info.with_kind(graph.kind.clone());
            }
            if let Some(trace) = &graph.fbtrace_id {
                info = info.with_details(trace.clone());
            }
            if graph.code == DEPRECATED_API_VERSION_CODE {
                info = info
                    .with_kind(ErrorCategory::DeprecatedApiVersion.type_name())
                    .with_details(DEPRECATED_API_VERSION_DETAILS);
            }
            return info;
        }
        AdsError::InvalidToken(_) => Some(ErrorCategory::Authentication),
        AdsError::RemoteApi { status, .. } => category_from_status(*status),
        _ => None,
    };

    match category.or_else(|| category_from_text(&message)) {
        Some(category) => category.describe(message),
        None => ErrorInfo::new(message),
    }
}

// ------------------------------------------------------------------ //
//  Placeholder providers                                              //
// ------------------------------------------------------------------ //

/// Source of placeholder records served when an upstream call fails.
pub trait FallbackProvider: Send + Sync {
    fn meta_metrics(&self) -> MetaAdsMetrics;
    fn google_metrics(&self) -> GoogleAdsMetrics;
}

/// Fixed illustrative figures; ratios agree with the raw counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureFallback;

impl FallbackProvider for FixtureFallback {
    fn meta_metrics(&self) -> MetaAdsMetrics {
        MetaAdsMetrics {
            id: "sample_account".to_string(),
            name: "Sample Meta Ads account".to_string(),
            ctr: 2.5,
            cac: 15.75,
            total_investment: 1260.0,
            sales_count: 80,
        }
    }

    fn google_metrics(&self) -> GoogleAdsMetrics {
        GoogleAdsMetrics {
            id: "sample_account".to_string(),
            name: "Sample Google Ads account".to_string(),
            ctr: 8.5,
            cpc: 0.82,
            conversions: 120.0,
            conversion_rate: 9.41,
            cost_per_conversion: 8.75,
            total_investment: 1050.25,
            impressions: 15_000,
            clicks: 1275,
        }
    }
}

pub fn fallback_meta(err: &AdsError, provider: &dyn FallbackProvider) -> AdsResponse<MetaAdsMetrics> {
    AdsResponse::degraded(
        "Meta Ads metrics unavailable; serving placeholder data",
        provider.meta_metrics(),
        classify(err),
    )
}

pub fn fallback_google(err: &AdsError, provider: &dyn FallbackProvider) -> AdsResponse<GoogleAdsMetrics> {
    AdsResponse::degraded(
        "Google Ads metrics unavailable; serving placeholder data",
        provider.google_metrics(),
        classify(err),
    )
}
