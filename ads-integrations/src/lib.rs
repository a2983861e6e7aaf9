//! Advertising platform integrations: OAuth token handling, metric
//! aggregation for Meta Ads and Google Ads, and error classification with
//! placeholder fallback.
//!
//! | Module       | Concern                                             |
//! |--------------|-----------------------------------------------------|
//! | `oauth`      | `OAuthProvider` trait, token response, HTTP helpers  |
//! | `meta_ads`   | Graph API client (insights, campaigns, token swap)  |
//! | `google_ads` | REST search client (GAQL, token refresh)            |
//! | `derive`     | CTR / CPC / CAC / conversion ratios                 |
//! | `fallback`   | `classify`, `FallbackProvider`, placeholder records |

pub mod de;
pub mod derive;
pub mod error;
pub mod fallback;
pub mod google_ads;
pub mod meta_ads;
pub mod models;
pub mod oauth;

pub use error::{AdsError, GraphApiError};
pub use fallback::{classify, fallback_google, fallback_meta, FallbackProvider, FixtureFallback};
pub use google_ads::{GoogleAdsClient, GoogleAdsConfig, GoogleAdsCredentials};
pub use meta_ads::{MetaAdsClient, MetaAdsConfig};
pub use models::{AdsResponse, ErrorInfo, GoogleAdsMetrics, MetaAdsMetrics};
pub use oauth::{OAuthProvider, TokenResponse};
