//! Lenient counter deserialization for provider payloads.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an engagement counter that may arrive as a JSON number or a
/// numeric string.
///
/// Fractional values truncate. Negative, non-finite or non-numeric values
/// read as absent so the extractor falls back to 0.
pub(crate) fn counter<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(counter_from_value))
}

pub(crate) fn counter_from_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(from_float))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_float(f: f64) -> Option<u64> {
    if f.is_finite() && f >= 0.0 {
        Some(f.trunc() as u64)
    } else {
        None
    }
}
