use ads_integrations::{
    classify, AdsError, GoogleAdsClient, GoogleAdsConfig, GoogleAdsCredentials, OAuthProvider,
};
use anyhow::Result;
use serde_json::json;
use wiremock::matchers::{any, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CUSTOMER: &str = "1234567890";

fn client_for(server: &MockServer) -> GoogleAdsClient {
    GoogleAdsClient::new(GoogleAdsConfig {
        client_id: "cfg-client".into(),
        client_secret: "cfg-secret".into(),
        redirect_uri: "https://app.example.com/google-ads/callback".into(),
        state: "state-1".into(),
        developer_token: "dev-token".into(),
        default_customer_id: Some("123-456-7890".into()),
        token_url: format!("{}/token", server.uri()),
        token_info_url: format!("{}/tokeninfo", server.uri()),
        ads_base_url: server.uri(),
        ..GoogleAdsConfig::default()
    })
}

fn creds() -> GoogleAdsCredentials {
    GoogleAdsCredentials {
        client_id: "req-client".into(),
        client_secret: "req-secret".into(),
        refresh_token: "1//refresh".into(),
        manager_id: None,
    }
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=req-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.fresh",
            "token_type": "Bearer",
            "expires_in": 3599
        })))
        .mount(server)
        .await;
}

fn search_path() -> String {
    format!("/v17/customers/{CUSTOMER}:search")
}

#[tokio::test]
async fn account_metrics_sums_rows_and_derives_ratios() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(header("authorization", "Bearer ya29.fresh"))
        .and(header("developer-token", "dev-token"))
        .and(body_string_contains("FROM customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "customer": {"id": CUSTOMER, "descriptiveName": "Acme Store"},
                    "metrics": {"impressions": "3000", "clicks": "500", "costMicros": "10000000", "conversions": 40.0}
                },
                {
                    "metrics": {"impressions": "2000", "clicks": "250", "costMicros": "5000000", "conversions": 20.0}
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = client_for(&server).account_metrics(&creds()).await?;

    assert_eq!(record.id, CUSTOMER);
    assert_eq!(record.name, "Acme Store");
    assert_eq!(record.impressions, 5000);
    assert_eq!(record.clicks, 750);
    assert_eq!(record.total_investment, 15.00);
    assert_eq!(record.ctr, 15.00);
    assert_eq!(record.cpc, 0.02);
    assert_eq!(record.conversion_rate, 8.00);
    assert_eq!(record.cost_per_conversion, 0.25);
    Ok(())
}

#[tokio::test]
async fn list_campaigns_skips_rows_without_campaign_id() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(body_string_contains("FROM campaign"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"campaign": {"id": "11", "name": "Brand"}, "metrics": {"impressions": "100", "clicks": "10"}},
                {"campaign": {"name": "No id"}, "metrics": {"impressions": "50", "clicks": "5"}},
                {"campaign": {"id": "12"}, "metrics": {"impressions": "0", "clicks": "0"}}
            ]
        })))
        .mount(&server)
        .await;

    let campaigns = client_for(&server).list_campaigns(&creds(), "123-456-7890").await?;

    assert_eq!(campaigns.len(), 2);
    assert!(campaigns.iter().all(|c| !c.id.is_empty()));
    assert_eq!(campaigns[0].name, "Brand");
    assert_eq!(campaigns[0].ctr, 10.0);
    assert_eq!(campaigns[1].name, "Campaign 12");
    assert_eq!(campaigns[1].ctr, 0.0);
    Ok(())
}

#[tokio::test]
async fn refresh_failure_surfaces_status_and_body() -> Result<()> {
    let server = MockServer::start().await;
    let body = r#"{"error":"invalid_grant","error_description":"Token has been expired or revoked."}"#;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(body))
        .mount(&server)
        .await;

    let err = client_for(&server).account_metrics(&creds()).await.unwrap_err();

    match &err {
        AdsError::RemoteApi { status, body: got, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(got, body);
        }
        other => panic!("expected RemoteApi, got {other:?}"),
    }
    assert_eq!(classify(&err).kind.as_deref(), Some("AuthenticationError"));
    Ok(())
}

#[tokio::test]
async fn incomplete_credentials_issue_no_request() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut missing = creds();
    missing.refresh_token.clear();

    assert!(client.account_metrics(&missing).await.unwrap_err().is_validation());
    assert!(client.test_connection(&missing).await.unwrap_err().is_validation());
    assert!(client.campaign_insights(&creds(), "12; DROP").await.unwrap_err().is_validation());
    assert!(client.campaign_insights(&creds(), "").await.unwrap_err().is_validation());
    assert!(client.exchange_code("").await.unwrap_err().is_validation());
    Ok(())
}

#[tokio::test]
async fn malformed_login_customer_id_fails_before_token_refresh() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = client_for(&server).config().clone();
    config.login_customer_id = Some("mcc-abc".into());
    let client = GoogleAdsClient::new(config);

    assert!(client.account_metrics(&creds()).await.unwrap_err().is_validation());
    assert!(client.list_campaigns(&creds(), CUSTOMER).await.unwrap_err().is_validation());
    Ok(())
}

#[tokio::test]
async fn login_customer_id_header_is_normalized() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(header("login-customer-id", "9998887777"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = client_for(&server).config().clone();
    config.login_customer_id = Some("999-888-7777".into());
    let record = GoogleAdsClient::new(config).account_insights(&creds(), CUSTOMER).await?;

    assert_eq!(record.id, CUSTOMER);
    Ok(())
}

#[tokio::test]
async fn campaign_insights_filters_by_campaign_id() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/v17/customers/999:search"))
        .and(body_string_contains("campaign.id = 42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"campaign": {"id": "42", "name": "Spring"}, "metrics": {"impressions": "1000", "clicks": "40", "costMicros": "20000000", "conversions": "4"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut with_manager = creds();
    with_manager.manager_id = Some("999".into());
    let record = client_for(&server).campaign_insights(&with_manager, "42").await?;

    assert_eq!(record.id, "42");
    assert_eq!(record.name, "Spring");
    assert_eq!(record.cpc, 0.5);
    assert_eq!(record.cost_per_conversion, 5.0);
    assert_eq!(record.conversion_rate, 10.0);
    Ok(())
}

#[tokio::test]
async fn consolidated_keeps_account_when_campaign_listing_fails() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;

    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(body_string_contains("FROM customer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(search_path()))
        .and(body_string_contains("FROM campaign"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend error"))
        .mount(&server)
        .await;

    let records = client_for(&server).consolidated(&creds()).await?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, format!("Account {CUSTOMER}"));
    Ok(())
}

#[tokio::test]
async fn exchange_code_posts_authorization_code_grant() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=4%2Fauth"))
        .and(body_string_contains("client_id=cfg-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.first",
            "token_type": "Bearer",
            "expires_in": 3599,
            "refresh_token": "1//long-lived"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = client_for(&server).exchange_code("4/auth").await?;

    assert_eq!(token.access_token, "ya29.first");
    assert_eq!(token.refresh_token.as_deref(), Some("1//long-lived"));
    assert_eq!(token.expires_in, Some(3599));
    Ok(())
}

#[tokio::test]
async fn test_connection_returns_token_info() -> Result<()> {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/tokeninfo"))
        .and(query_param("access_token", "ya29.fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scope": "https://www.googleapis.com/auth/adwords",
            "expires_in": "3599"
        })))
        .mount(&server)
        .await;

    let info = client_for(&server).test_connection(&creds()).await?;

    assert_eq!(info["scope"], "https://www.googleapis.com/auth/adwords");
    Ok(())
}
