//! Meta Ads (Graph API) client: OAuth plus insight aggregation.
//!
//! The caller supplies the user access token on every call; it travels as the
//! `access_token` query parameter. All insight queries cover `last_30d`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::de::{lenient_f64, lenient_string};
use crate::error::{require, AdsError, GraphApiError};
use crate::models::MetaAdsMetrics;
use crate::oauth::{ensure_success, read_json, url_with_query, OAuthProvider, TokenResponse};

pub const DEFAULT_GRAPH_API_VERSION: &str = "v22.0";
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com";
pub const DEFAULT_DIALOG_BASE_URL: &str = "https://www.facebook.com";

const OAUTH_SCOPES: &str = "ads_read,business_management,public_profile,email";
const INSIGHT_FIELDS: &str = "clicks,impressions,spend,actions,cost_per_action_type";
const CAMPAIGN_LIST_FIELDS: &str =
    "campaign_id,campaign_name,clicks,impressions,spend,actions,cost_per_action_type";
const DATE_PRESET: &str = "last_30d";

/// Action types counted as sales.
const PURCHASE_ACTION_TYPES: [&str; 2] = ["purchase", "offsite_conversion.fb_pixel_purchase"];

#[derive(Debug, Clone)]
pub struct MetaAdsConfig {
    pub app_id: String,
    pub app_secret: String,
    pub redirect_uri: String,
    pub state: String,
    pub api_version: String,
    pub dialog_base_url: String,
    pub graph_base_url: String,
}

impl Default for MetaAdsConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            app_secret: String::new(),
            redirect_uri: String::new(),
            state: String::new(),
            api_version: DEFAULT_GRAPH_API_VERSION.to_string(),
            dialog_base_url: DEFAULT_DIALOG_BASE_URL.to_string(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
        }
    }
}

// ------------------------------------------------------------------ //
//  Graph payloads                                                     //
// ------------------------------------------------------------------ //

#[derive(Debug, Default, Deserialize)]
struct GraphList {
    #[serde(default)]
    data: Vec<Value>,
}

impl GraphList {
    /// Rows that decode as `T`; the rest are skipped.
    fn rows<T: DeserializeOwned>(self, what: &'static str) -> Vec<T> {
        self.data
            .into_iter()
            .filter_map(|row| match serde_json::from_value(row) {
                Ok(row) => Some(row),
                Err(e) => {
                    debug!(what, error = %e, "skipping malformed row");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphApiError,
}

#[derive(Debug, Deserialize)]
struct AdAccount {
    #[serde(default, deserialize_with = "lenient_string")]
    account_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedObject {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct InsightRow {
    #[serde(default, deserialize_with = "lenient_string")]
    campaign_id: Option<String>,
    #[serde(default)]
    campaign_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    clicks: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    impressions: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    spend: Option<f64>,
    #[serde(default)]
    actions: Vec<ActionEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionEntry {
    #[serde(default)]
    action_type: String,
    #[serde(default)]
    value: Option<Value>,
}

/// Sales implied by purchase actions. A purchase without a value counts once;
/// a value that is not a number counts zero.
fn sales_from_actions(actions: &[ActionEntry]) -> f64 {
    actions
        .iter()
        .filter(|a| PURCHASE_ACTION_TYPES.contains(&a.action_type.as_str()))
        .map(|a| match &a.value {
            None | Some(Value::Null) => 1.0,
            Some(Value::String(s)) if s.trim().is_empty() => 1.0,
            Some(v) => crate::de::numeric(v).unwrap_or(0.0),
        })
        .sum()
}

fn summarize(rows: &[InsightRow], id: &str, name: &str) -> MetaAdsMetrics {
    let (mut clicks, mut impressions, mut spend, mut sales) = (0.0, 0.0, 0.0, 0.0);
    for row in rows {
        clicks += row.clicks.unwrap_or(0.0);
        impressions += row.impressions.unwrap_or(0.0);
        spend += row.spend.unwrap_or(0.0);
        sales += sales_from_actions(&row.actions);
    }
    MetaAdsMetrics::from_sums(id, name, clicks, impressions, spend, sales)
}

fn bare_account_id(account_id: &str) -> &str {
    let trimmed = account_id.trim();
    trimmed.strip_prefix("act_").unwrap_or(trimmed)
}

/// Graph error code for an invalid or expired access token.
const INVALID_TOKEN_CODE: i64 = 190;

/// Whether a failed identity check means the token itself was refused.
fn rejects_token(err: &AdsError) -> bool {
    match err {
        AdsError::Graph(graph) => graph.code == INVALID_TOKEN_CODE,
        AdsError::RemoteApi { status, .. } => matches!(status, 401 | 403),
        _ => false,
    }
}

/// Graph object ids are numeric; anything else never reaches a URL path.
fn graph_id<'a>(id: &'a str, what: &str) -> Result<&'a str, AdsError> {
    require(id, what)?;
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AdsError::Validation(format!("{what} {id:?} is not numeric")));
    }
    Ok(id)
}

// ------------------------------------------------------------------ //
//  Client                                                             //
// ------------------------------------------------------------------ //

#[derive(Debug, Clone)]
pub struct MetaAdsClient {
    config: MetaAdsConfig,
    http: reqwest::Client,
}

impl MetaAdsClient {
    pub fn new(config: MetaAdsConfig) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(config: MetaAdsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &MetaAdsConfig {
        &self.config
    }

    fn graph_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.graph_base_url.trim_end_matches('/'),
            self.config.api_version,
            path.trim_start_matches('/')
        )
    }

    /// GET a Graph path. Non-2xx bodies carrying `{"error": {...}}` become
    /// [`AdsError::Graph`]; other failures stay [`AdsError::RemoteApi`].
    async fn graph_get<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        params: &[(&str, &str)],
        operation: &'static str,
    ) -> Result<T, AdsError> {
        let response = self
            .http
            .get(self.graph_url(path))
            .query(params)
            .query(&[("access_token", token)])
            .send()
            .await?;

        match ensure_success(response, operation).await {
            Ok(response) => read_json(response, operation).await,
            Err(AdsError::RemoteApi { operation, status, body }) => {
                match serde_json::from_str::<GraphErrorEnvelope>(&body) {
                    Ok(envelope) => {
                        warn!(operation, status, code = envelope.error.code, "Graph API error");
                        Err(AdsError::Graph(envelope.error))
                    }
                    Err(_) => Err(AdsError::RemoteApi { operation, status, body }),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn insights(&self, token: &str, object_path: &str, params: &[(&str, &str)]) -> Result<Vec<InsightRow>, AdsError> {
        let list: GraphList = self
            .graph_get(token, &format!("{object_path}/insights"), params, "insights query")
            .await?;
        Ok(list.rows("insight"))
    }

    /// Validate the token, then return the id of its first ad account.
    async fn first_ad_account(&self, token: &str) -> Result<String, AdsError> {
        require(token, "access token")?;

        self.graph_get::<Value>(token, "me", &[("fields", "id")], "token check")
            .await
            .map_err(|e| {
                if rejects_token(&e) {
                    AdsError::InvalidToken(Box::new(e))
                } else {
                    e
                }
            })?;

        let accounts: GraphList = self
            .graph_get(
                token,
                "me/adaccounts",
                &[("fields", "account_id,name"), ("limit", "1")],
                "ad account lookup",
            )
            .await?;

        accounts
            .rows::<AdAccount>("ad account")
            .into_iter()
            .find_map(|a| a.account_id)
            .map(|id| bare_account_id(&id).to_string())
            .ok_or(AdsError::NoAdAccount)
    }

    /// Metrics of the first ad account reachable with `token`.
    pub async fn account_metrics(&self, token: &str) -> Result<MetaAdsMetrics, AdsError> {
        let account_id = self.first_ad_account(token).await?;
        self.account_insights(token, &account_id).await
    }

    pub async fn account_insights(&self, token: &str, account_id: &str) -> Result<MetaAdsMetrics, AdsError> {
        require(token, "access token")?;
        let id = graph_id(bare_account_id(account_id), "account id")?;

        let rows = self
            .insights(
                token,
                &format!("act_{id}"),
                &[("fields", INSIGHT_FIELDS), ("date_preset", DATE_PRESET), ("level", "account")],
            )
            .await?;

        info!(account_id = id, rows = rows.len(), "meta account insights fetched");
        Ok(summarize(&rows, id, &format!("Account {id}")))
    }

    pub async fn campaign_insights(&self, token: &str, campaign_id: &str) -> Result<MetaAdsMetrics, AdsError> {
        require(token, "access token")?;
        let campaign_id = graph_id(campaign_id.trim(), "campaign id")?;

        let campaign: NamedObject = self
            .graph_get(token, campaign_id, &[("fields", "name")], "campaign lookup")
            .await?;
        let name = campaign
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Campaign {campaign_id}"));

        let rows = self
            .insights(
                token,
                campaign_id,
                &[("fields", INSIGHT_FIELDS), ("date_preset", DATE_PRESET), ("level", "campaign")],
            )
            .await?;

        info!(campaign_id, rows = rows.len(), "meta campaign insights fetched");
        Ok(summarize(&rows, campaign_id, &name))
    }

    /// One record per campaign of the account. Rows without a campaign id are
    /// dropped.
    pub async fn list_campaigns(&self, token: &str, account_id: &str) -> Result<Vec<MetaAdsMetrics>, AdsError> {
        require(token, "access token")?;
        let id = graph_id(bare_account_id(account_id), "account id")?;

        let rows = self
            .insights(
                token,
                &format!("act_{id}"),
                &[("fields", CAMPAIGN_LIST_FIELDS), ("date_preset", DATE_PRESET), ("level", "campaign")],
            )
            .await?;

        let total = rows.len();
        let campaigns: Vec<MetaAdsMetrics> = rows
            .into_iter()
            .filter_map(|row| {
                let campaign_id = row.campaign_id.clone()?;
                let name = row
                    .campaign_name
                    .clone()
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| format!("Campaign {campaign_id}"));
                Some(summarize(std::slice::from_ref(&row), &campaign_id, &name))
            })
            .collect();

        if campaigns.len() < total {
            debug!(account_id = id, skipped = total - campaigns.len(), "rows without campaign id");
        }
        info!(account_id = id, campaigns = campaigns.len(), "meta campaigns listed");
        Ok(campaigns)
    }

    /// Account record followed by its campaigns. A failed campaign listing
    /// leaves only the account record.
    pub async fn consolidated(&self, token: &str) -> Result<Vec<MetaAdsMetrics>, AdsError> {
        let account_id = self.first_ad_account(token).await?;
        let account = self.account_insights(token, &account_id).await?;

        let mut records = vec![account];
        match self.list_campaigns(token, &account_id).await {
            Ok(campaigns) => records.extend(campaigns),
            Err(e) => warn!(account_id = %account_id, error = %e, "campaign listing failed; returning account only"),
        }
        Ok(records)
    }
}

#[async_trait]
impl OAuthProvider for MetaAdsClient {
    fn platform(&self) -> &'static str {
        "meta-ads"
    }

    fn expected_state(&self) -> &str {
        &self.config.state
    }

    fn authorization_url(&self) -> Result<String, AdsError> {
        require(&self.config.app_id, "app id")?;
        require(&self.config.redirect_uri, "redirect uri")?;

        let base = format!(
            "{}/{}/dialog/oauth",
            self.config.dialog_base_url.trim_end_matches('/'),
            self.config.api_version
        );
        url_with_query(
            &base,
            &[
                ("client_id", self.config.app_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("state", self.config.state.as_str()),
                ("response_type", "code"),
                ("scope", OAUTH_SCOPES),
            ],
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, AdsError> {
        require(code, "authorization code")?;
        require(&self.config.app_id, "app id")?;
        require(&self.config.app_secret, "app secret")?;
        require(&self.config.redirect_uri, "redirect uri")?;

        let response = self
            .http
            .get(self.graph_url("oauth/access_token"))
            .query(&[
                ("client_id", self.config.app_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_secret", self.config.app_secret.as_str()),
                ("code", code),
            ])
            .send()
            .await?;
        let response = ensure_success(response, "token exchange").await?;
        let token = read_json(response, "token exchange").await?;
        info!("meta authorization code exchanged");
        Ok(token)
    }

    /// Trade a short-lived user token for a long-lived one.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AdsError> {
        require(refresh_token, "token")?;
        require(&self.config.app_id, "app id")?;
        require(&self.config.app_secret, "app secret")?;

        let response = self
            .http
            .get(self.graph_url("oauth/access_token"))
            .query(&[
                ("grant_type", "fb_exchange_token"),
                ("client_id", self.config.app_id.as_str()),
                ("client_secret", self.config.app_secret.as_str()),
                ("fb_exchange_token", refresh_token),
            ])
            .send()
            .await?;
        let response = ensure_success(response, "token refresh").await?;
        read_json(response, "token refresh").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(kind: &str, value: Option<Value>) -> ActionEntry {
        ActionEntry {
            action_type: kind.to_string(),
            value,
        }
    }

    #[test]
    fn purchase_without_value_counts_once() {
        let actions = vec![
            action("purchase", None),
            action("offsite_conversion.fb_pixel_purchase", Some(json!(""))),
            action("link_click", Some(json!("40"))),
        ];
        assert_eq!(sales_from_actions(&actions), 2.0);
    }

    #[test]
    fn purchase_values_accept_numbers_and_strings() {
        let actions = vec![
            action("purchase", Some(json!("3"))),
            action("offsite_conversion.fb_pixel_purchase", Some(json!(2))),
            action("purchase", Some(json!("n/a"))),
        ];
        assert_eq!(sales_from_actions(&actions), 5.0);
    }

    #[test]
    fn summarize_sums_rows_and_derives_ratios() {
        let rows: Vec<InsightRow> = serde_json::from_value(json!([
            {"clicks": "30", "impressions": "1000", "spend": "45.00",
             "actions": [{"action_type": "purchase", "value": "2"}]},
            {"clicks": 20, "impressions": 1000, "spend": 15.0,
             "actions": [{"action_type": "purchase", "value": "1"}]}
        ]))
        .unwrap();

        let record = summarize(&rows, "99", "Account 99");
        assert_eq!(record.ctr, 2.5);
        assert_eq!(record.total_investment, 60.0);
        assert_eq!(record.sales_count, 3);
        assert_eq!(record.cac, 20.0);
    }

    #[test]
    fn empty_insights_produce_zeroed_record() {
        let record = summarize(&[], "1", "Account 1");
        assert_eq!(record.ctr, 0.0);
        assert_eq!(record.cac, 0.0);
        assert_eq!(record.sales_count, 0);
    }

    #[test]
    fn authorization_url_carries_scopes_and_state() {
        let client = MetaAdsClient::new(MetaAdsConfig {
            app_id: "123".into(),
            redirect_uri: "https://app.example.com/meta-ads/callback".into(),
            state: "xyz".into(),
            ..MetaAdsConfig::default()
        });
        let url = client.authorization_url().unwrap();
        assert!(url.starts_with("https://www.facebook.com/v22.0/dialog/oauth?"));
        assert!(url.contains("client_id=123"));
        assert!(url.contains("state=xyz"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=ads_read%2Cbusiness_management%2Cpublic_profile%2Cemail"));
    }

    #[test]
    fn authorization_url_requires_app_id() {
        let client = MetaAdsClient::new(MetaAdsConfig {
            redirect_uri: "https://app.example.com/cb".into(),
            ..MetaAdsConfig::default()
        });
        assert!(matches!(client.authorization_url(), Err(AdsError::Validation(_))));
    }

    #[test]
    fn account_prefix_is_normalized() {
        assert_eq!(bare_account_id("act_123"), "123");
        assert_eq!(bare_account_id(" 123 "), "123");
    }

    #[test]
    fn non_numeric_graph_ids_are_rejected() {
        assert!(matches!(graph_id("../me", "campaign id"), Err(AdsError::Validation(_))));
        assert!(matches!(graph_id("", "campaign id"), Err(AdsError::Validation(_))));
        assert_eq!(graph_id("2385", "campaign id").unwrap(), "2385");
    }
}
