//! Google Ads (REST search) client.
//!
//! Every reporting call trades the caller's refresh token for a fresh access
//! token, then POSTs a GAQL query to `customers/{id}:search`. Credentials are
//! passed per call and never retained.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::de::{lenient_f64, lenient_string};
use crate::derive::PerformanceTotals;
use crate::error::{require, AdsError};
use crate::models::GoogleAdsMetrics;
use crate::oauth::{ensure_success, read_json, url_with_query, OAuthProvider, TokenResponse};

pub const DEFAULT_GOOGLE_ADS_API_VERSION: &str = "v17";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_TOKEN_INFO_URL: &str = "https://www.googleapis.com/oauth2/v3/tokeninfo";
pub const DEFAULT_ADS_BASE_URL: &str = "https://googleads.googleapis.com";

const ADWORDS_SCOPE: &str = "https://www.googleapis.com/auth/adwords";

const ACCOUNT_QUERY: &str = "SELECT customer.id, customer.descriptive_name, metrics.impressions, \
     metrics.clicks, metrics.cost_micros, metrics.conversions \
     FROM customer WHERE segments.date DURING LAST_30_DAYS";

const CAMPAIGN_LIST_QUERY: &str = "SELECT campaign.id, campaign.name, metrics.impressions, \
     metrics.clicks, metrics.cost_micros, metrics.conversions \
     FROM campaign WHERE segments.date DURING LAST_30_DAYS";

fn campaign_query(campaign_id: &str) -> String {
    format!(
        "SELECT campaign.id, campaign.name, metrics.impressions, metrics.clicks, \
         metrics.cost_micros, metrics.conversions \
         FROM campaign WHERE campaign.id = {campaign_id} AND segments.date DURING LAST_30_DAYS"
    )
}

#[derive(Debug, Clone)]
pub struct GoogleAdsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub state: String,
    pub developer_token: String,
    pub api_version: String,
    /// Customer queried when the caller names no manager account.
    pub default_customer_id: Option<String>,
    /// Sent as `login-customer-id` when acting through a manager account.
    pub login_customer_id: Option<String>,
    pub auth_url: String,
    pub token_url: String,
    pub token_info_url: String,
    pub ads_base_url: String,
}

impl Default for GoogleAdsConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            state: String::new(),
            developer_token: String::new(),
            api_version: DEFAULT_GOOGLE_ADS_API_VERSION.to_string(),
            default_customer_id: None,
            login_customer_id: None,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_info_url: DEFAULT_TOKEN_INFO_URL.to_string(),
            ads_base_url: DEFAULT_ADS_BASE_URL.to_string(),
        }
    }
}

/// Per-request OAuth client credentials plus the long-lived refresh token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GoogleAdsCredentials {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
}

/// Per-call reporting context: a fresh access token plus the validated
/// manager header.
struct ReportingSession {
    access_token: String,
    login_customer_id: Option<String>,
}

impl GoogleAdsCredentials {
    fn validate(&self) -> Result<(), AdsError> {
        require(&self.client_id, "client_id")?;
        require(&self.client_secret, "client_secret")?;
        require(&self.refresh_token, "refresh_token")
    }
}

/// Strip dashes (`123-456-7890`) and reject anything but digits.
pub fn normalize_customer_id(customer_id: &str) -> Result<String, AdsError> {
    let id: String = customer_id.trim().chars().filter(|c| *c != '-').collect();
    if id.is_empty() {
        return Err(AdsError::validation("customer id is required"));
    }
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AdsError::Validation(format!("customer id {customer_id:?} is not numeric")));
    }
    Ok(id)
}

// ------------------------------------------------------------------ //
//  Search payloads                                                    //
// ------------------------------------------------------------------ //

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchRow {
    #[serde(default)]
    customer: Option<CustomerField>,
    #[serde(default)]
    campaign: Option<CampaignField>,
    #[serde(default)]
    metrics: MetricsField,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerField {
    #[serde(default, alias = "descriptive_name")]
    descriptive_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CampaignField {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsField {
    #[serde(default, deserialize_with = "lenient_f64")]
    impressions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    clicks: Option<f64>,
    #[serde(default, alias = "cost_micros", deserialize_with = "lenient_f64")]
    cost_micros: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    conversions: Option<f64>,
}

impl SearchRow {
    fn add_to(&self, totals: &mut PerformanceTotals) {
        let m = &self.metrics;
        totals.add(m.impressions, m.clicks, m.cost_micros, m.conversions);
    }
}

// ------------------------------------------------------------------ //
//  Client                                                             //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone)]
pub struct GoogleAdsClient {
    config: GoogleAdsConfig,
    http: reqwest::Client,
}

impl GoogleAdsClient {
    pub fn new(config: GoogleAdsConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: GoogleAdsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &GoogleAdsConfig {
        &self.config
    }

    async fn token_request(&self, form: &[(&str, &str)], operation: &'static str) -> Result<TokenResponse, AdsError> {
        let response = self.http.post(&self.config.token_url).form(form).send().await?;
        let response = ensure_success(response, operation).await?;
        read_json(response, operation).await
    }

    async fn refresh_with(&self, client_id: &str, client_secret: &str, refresh_token: &str) -> Result<TokenResponse, AdsError> {
        require(refresh_token, "refresh token")?;
        require(client_id, "client id")?;
        require(client_secret, "client secret")?;

        self.token_request(
            &[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ],
            "token refresh",
        )
        .await
    }

    /// Normalized `login-customer-id` header value, if one is configured.
    fn login_customer(&self) -> Result<Option<String>, AdsError> {
        self.config
            .login_customer_id
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(normalize_customer_id)
            .transpose()
    }

    /// Check the static reporting settings, then refresh an access token.
    /// Callers validate `creds` first.
    async fn open_session(&self, creds: &GoogleAdsCredentials) -> Result<ReportingSession, AdsError> {
        require(&self.config.developer_token, "developer token")?;
        let login_customer_id = self.login_customer()?;
        let token = self
            .refresh_with(&creds.client_id, &creds.client_secret, &creds.refresh_token)
            .await?;
        debug!(expires_in = token.expires_in, "google access token refreshed");
        Ok(ReportingSession {
            access_token: token.access_token,
            login_customer_id,
        })
    }

    async fn search(&self, session: &ReportingSession, customer_id: &str, query: &str) -> Result<Vec<SearchRow>, AdsError> {
        let url = format!(
            "{}/{}/customers/{}:search",
            self.config.ads_base_url.trim_end_matches('/'),
            self.config.api_version,
            customer_id
        );

        let mut request = self
            .http
            .post(url)
            .bearer_auth(&session.access_token)
            .header("developer-token", &self.config.developer_token)
            .json(&json!({ "query": query }));
        if let Some(login) = &session.login_customer_id {
            request = request.header("login-customer-id", login);
        }

        let response = ensure_success(request.send().await?, "search").await?;
        let body: SearchResponse = read_json(response, "search").await?;

        let total = body.results.len();
        let rows: Vec<SearchRow> = body
            .results
            .into_iter()
            .filter_map(|row| serde_json::from_value(row).ok())
            .collect();
        if rows.len() < total {
            debug!(customer_id, skipped = total - rows.len(), "malformed search rows");
        }
        Ok(rows)
    }

    fn reporting_customer(&self, creds: &GoogleAdsCredentials) -> Result<String, AdsError> {
        let candidate = creds
            .manager_id
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .or(self.config.default_customer_id.as_deref().filter(|d| !d.trim().is_empty()))
            .ok_or_else(|| AdsError::validation("no customer id: set manager_id or a default customer id"))?;
        normalize_customer_id(candidate)
    }

    async fn account_with_session(&self, session: &ReportingSession, customer_id: &str) -> Result<GoogleAdsMetrics, AdsError> {
        let rows = self.search(session, customer_id, ACCOUNT_QUERY).await?;

        let mut totals = PerformanceTotals::default();
        let mut name = None;
        for row in &rows {
            row.add_to(&mut totals);
            if let Some(n) = row
                .customer
                .as_ref()
                .and_then(|c| c.descriptive_name.as_deref())
                .filter(|n| !n.is_empty())
            {
                name = Some(n.to_string());
            }
        }

        info!(customer_id, rows = rows.len(), "google account insights fetched");
        let name = name.unwrap_or_else(|| format!("Account {customer_id}"));
        Ok(GoogleAdsMetrics::from_totals(customer_id, name, &totals))
    }

    async fn campaigns_with_session(&self, session: &ReportingSession, customer_id: &str) -> Result<Vec<GoogleAdsMetrics>, AdsError> {
        let rows = self.search(session, customer_id, CAMPAIGN_LIST_QUERY).await?;
        let total = rows.len();

        let campaigns: Vec<GoogleAdsMetrics> = rows
            .iter()
            .filter_map(|row| {
                let campaign = row.campaign.as_ref()?;
                let id = campaign.id.as_deref()?;
                let name = campaign
                    .name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Campaign {id}"));
                let mut totals = PerformanceTotals::default();
                row.add_to(&mut totals);
                Some(GoogleAdsMetrics::from_totals(id, name, &totals))
            })
            .collect();

        if campaigns.len() < total {
            debug!(customer_id, skipped = total - campaigns.len(), "rows without campaign id");
        }
        info!(customer_id, campaigns = campaigns.len(), "google campaigns listed");
        Ok(campaigns)
    }

    /// Metrics of the manager account, or the configured default customer.
    pub async fn account_metrics(&self, creds: &GoogleAdsCredentials) -> Result<GoogleAdsMetrics, AdsError> {
        creds.validate()?;
        let customer_id = self.reporting_customer(creds)?;
        let session = self.open_session(creds).await?;
        self.account_with_session(&session, &customer_id).await
    }

    pub async fn account_insights(&self, creds: &GoogleAdsCredentials, account_id: &str) -> Result<GoogleAdsMetrics, AdsError> {
        creds.validate()?;
        let customer_id = normalize_customer_id(account_id)?;
        let session = self.open_session(creds).await?;
        self.account_with_session(&session, &customer_id).await
    }

    pub async fn campaign_insights(&self, creds: &GoogleAdsCredentials, campaign_id: &str) -> Result<GoogleAdsMetrics, AdsError> {
        creds.validate()?;
        let campaign_id = campaign_id.trim();
        require(campaign_id, "campaign id")?;
        if !campaign_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AdsError::Validation(format!("campaign id {campaign_id:?} is not numeric")));
        }
        let customer_id = self.reporting_customer(creds)?;
        let session = self.open_session(creds).await?;

        let rows = self.search(&session, &customer_id, &campaign_query(campaign_id)).await?;
        let mut totals = PerformanceTotals::default();
        let mut name = None;
        for row in &rows {
            row.add_to(&mut totals);
            if let Some(n) = row.campaign.as_ref().and_then(|c| c.name.clone()).filter(|n| !n.is_empty()) {
                name = Some(n);
            }
        }

        info!(campaign_id, rows = rows.len(), "google campaign insights fetched");
        let name = name.unwrap_or_else(|| format!("Campaign {campaign_id}"));
        Ok(GoogleAdsMetrics::from_totals(campaign_id, name, &totals))
    }

    /// One record per campaign row; rows without `campaign.id` are skipped.
    pub async fn list_campaigns(&self, creds: &GoogleAdsCredentials, account_id: &str) -> Result<Vec<GoogleAdsMetrics>, AdsError> {
        creds.validate()?;
        let customer_id = normalize_customer_id(account_id)?;
        let session = self.open_session(creds).await?;
        self.campaigns_with_session(&session, &customer_id).await
    }

    /// Account record followed by its campaigns, sharing one access token.
    pub async fn consolidated(&self, creds: &GoogleAdsCredentials) -> Result<Vec<GoogleAdsMetrics>, AdsError> {
        creds.validate()?;
        let customer_id = self.reporting_customer(creds)?;
        let session = self.open_session(creds).await?;

        let mut records = vec![self.account_with_session(&session, &customer_id).await?];
        match self.campaigns_with_session(&session, &customer_id).await {
            Ok(campaigns) => records.extend(campaigns),
            Err(e) => warn!(customer_id = %customer_id, error = %e, "campaign listing failed; returning account only"),
        }
        Ok(records)
    }

    /// Refresh the token and return what the token-info endpoint says about it.
    pub async fn test_connection(&self, creds: &GoogleAdsCredentials) -> Result<Value, AdsError> {
        creds.validate()?;
        let token = self
            .refresh_with(&creds.client_id, &creds.client_secret, &creds.refresh_token)
            .await?;

        let response = self
            .http
            .get(&self.config.token_info_url)
            .query(&[("access_token", token.access_token.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, "token info").await?;
        let token_info = read_json(response, "token info").await?;
        info!("google connection verified");
        Ok(token_info)
    }
}

#[async_trait]
impl OAuthProvider for GoogleAdsClient {
    fn platform(&self) -> &'static str {
        "google-ads"
    }

    fn expected_state(&self) -> &str {
        &self.config.state
    }

    fn authorization_url(&self) -> Result<String, AdsError> {
        require(&self.config.client_id, "client id")?;
        require(&self.config.redirect_uri, "redirect uri")?;

        url_with_query(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", ADWORDS_SCOPE),
                ("state", self.config.state.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AdsError> {
        require(code, "authorization code")?;
        require(&self.config.client_id, "client id")?;
        require(&self.config.client_secret, "client secret")?;
        require(&self.config.redirect_uri, "redirect uri")?;

        let token = self
            .token_request(
                &[
                    ("code", code),
                    ("client_id", self.config.client_id.as_str()),
                    ("client_secret", self.config.client_secret.as_str()),
                    ("redirect_uri", self.config.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
                "token exchange",
            )
            .await?;
        info!(has_refresh_token = token.refresh_token.is_some(), "google authorization code exchanged");
        Ok(token)
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AdsError> {
        self.refresh_with(&self.config.client_id, &self.config.client_secret, refresh_token)
            .await
    }
}
