//! Lenient field decoders for upstream reporting payloads.
//!
//! Both ad platforms serialize counters as JSON numbers in some places and as
//! decimal strings in others (Graph insights return `"clicks": "750"`, the
//! Google Ads REST surface encodes int64 as strings). Fields decoded through
//! these helpers accept either form; anything else becomes `None`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Numeric value of a JSON number or decimal string.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(numeric))
}

/// Identifier that may arrive as a string or a bare number. Blank strings
/// decode to `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
