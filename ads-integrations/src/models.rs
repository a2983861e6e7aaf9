//! Normalized metric records and the response envelope served to callers.

use serde::{Deserialize, Serialize};

use crate::derive::{self, PerformanceTotals};

// ------------------------------------------------------------------ //
//  Metric records                                                     //
// ------------------------------------------------------------------ //

/// Meta Ads performance over the reporting window.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MetaAdsMetrics {
    pub id: String,
    pub name: String,
    /// Click-through rate, percent.
    pub ctr: f64,
    /// Customer acquisition cost (spend / sales).
    pub cac: f64,
    pub total_investment: f64,
    pub sales_count: u64,
}

impl MetaAdsMetrics {
    pub fn from_sums(
        id: impl Into<String>,
        name: impl Into<String>,
        clicks: f64,
        impressions: f64,
        spend: f64,
        sales: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ctr: derive::ctr(clicks, impressions),
            cac: derive::cac(spend, sales),
            total_investment: derive::round2(spend),
            sales_count: sales.max(0.0) as u64,
        }
    }
}

/// Google Ads performance over the reporting window.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct GoogleAdsMetrics {
    pub id: String,
    pub name: String,
    pub ctr: f64,
    pub cpc: f64,
    pub conversions: f64,
    pub conversion_rate: f64,
    pub cost_per_conversion: f64,
    pub total_investment: f64,
    pub impressions: u64,
    pub clicks: u64,
}

impl GoogleAdsMetrics {
    pub fn from_totals(id: impl Into<String>, name: impl Into<String>, totals: &PerformanceTotals) -> Self {
        let cost = totals.cost();
        Self {
            id: id.into(),
            name: name.into(),
            ctr: derive::ctr(totals.clicks, totals.impressions),
            cpc: derive::cpc(cost, totals.clicks),
            conversions: derive::round2(totals.conversions),
            conversion_rate: derive::conversion_rate(totals.conversions, totals.clicks),
            cost_per_conversion: derive::cost_per_conversion(cost, totals.conversions),
            total_investment: derive::round2(cost),
            impressions: totals.impressions.max(0.0) as u64,
            clicks: totals.clicks.max(0.0) as u64,
        }
    }
}

// ------------------------------------------------------------------ //
//  Envelope                                                           //
// ------------------------------------------------------------------ //

/// Caller-facing description of a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct ErrorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// `{success, message, data, error?}` wrapper used by every ads endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AdsResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl<T> AdsResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Placeholder data served in place of a failed upstream call.
    pub fn degraded(message: impl Into<String>, data: T, error: ErrorInfo) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: Some(data),
            error: Some(error),
        }
    }

    pub fn failure(message: impl Into<String>, error: ErrorInfo) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_info_serializes_kind_as_type_and_omits_empty_fields() {
        let info = ErrorInfo::new("boom").with_kind("RateLimitError").with_code(4);
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({"code": 4, "message": "boom", "type": "RateLimitError"})
        );
    }

    #[test]
    fn google_record_from_totals_uses_currency_units() {
        let totals = PerformanceTotals {
            impressions: 5000.0,
            clicks: 750.0,
            cost_micros: 15_000_000.0,
            conversions: 60.0,
        };
        let record = GoogleAdsMetrics::from_totals("123", "Account 123", &totals);
        assert_eq!(record.total_investment, 15.0);
        assert_eq!(record.ctr, 15.0);
        assert_eq!(record.cpc, 0.02);
        assert_eq!(record.conversion_rate, 8.0);
        assert_eq!(record.cost_per_conversion, 0.25);
        assert_eq!(record.impressions, 5000);
        assert_eq!(record.clicks, 750);
    }

    #[test]
    fn meta_record_without_sales_has_zero_cac() {
        let record = MetaAdsMetrics::from_sums("1", "Account 1", 10.0, 1000.0, 50.0, 0.0);
        assert_eq!(record.cac, 0.0);
        assert_eq!(record.ctr, 1.0);
        assert_eq!(record.total_investment, 50.0);
        assert_eq!(record.sales_count, 0);
    }

    #[test]
    fn failure_envelope_has_no_data_key() {
        let response: AdsResponse<MetaAdsMetrics> = AdsResponse::failure("nope", ErrorInfo::new("x"));
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("data").is_none());
        assert_eq!(value["success"], json!(false));
    }
}
