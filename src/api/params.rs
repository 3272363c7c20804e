//! Query-string encoding for API method parameters.
//!
//! Parameter structs serialize to a JSON object which is flattened into
//! `key=value` pairs: lists become comma-separated (`invoice_ids=1,2,3`),
//! `null` entries are dropped and nested objects are sent as JSON text.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::error::{ApiError, ApiResult};

/// Serialize `params` into a URL-encoded query string (without the leading `?`).
pub fn to_query<P: Serialize + ?Sized>(params: &P) -> ApiResult<String> {
    let pairs = to_pairs(&to_object(params)?);
    serde_urlencoded::to_string(&pairs)
        .map_err(|e| ApiError::InvalidParameter(format!("Failed to encode parameters: {}", e)))
}

/// Serialize `params` into a JSON object. `()` and `None` yield an empty object.
pub fn to_object<P: Serialize + ?Sized>(params: &P) -> ApiResult<Map<String, Value>> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(ApiError::InvalidParameter(format!(
            "Parameters must serialize to an object, got {}",
            other
        ))),
    }
}

/// Merge several parameter sets; later keys override earlier ones.
pub fn merge<I>(parts: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    parts.into_iter().fold(Map::new(), |mut acc, part| {
        acc.extend(part);
        acc
    })
}

fn to_pairs(object: &Map<String, Value>) -> Vec<(String, String)> {
    object
        .iter()
        .filter_map(|(key, value)| encode_value(value).map(|v| (key.clone(), v)))
        .collect()
}

fn encode_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(encode_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(encode_scalar(other)),
    }
}

fn encode_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            // 3.0 goes out as "3"
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_params() {
        assert_eq!(to_query(&()).unwrap(), "");
        assert_eq!(to_query(&json!({})).unwrap(), "");
        assert_eq!(to_query(&None::<Value>).unwrap(), "");
    }

    #[test]
    fn test_scalars() {
        let query = to_query(&json!({
            "asset": "TON",
            "amount": 1.5,
            "allow_comments": false,
            "user_id": 42,
        }))
        .unwrap();
        assert!(query.contains("asset=TON"));
        assert!(query.contains("amount=1.5"));
        assert!(query.contains("allow_comments=false"));
        assert!(query.contains("user_id=42"));
    }

    #[test]
    fn test_integral_float_has_no_fraction() {
        assert_eq!(to_query(&json!({"amount": 3.0})).unwrap(), "amount=3");
    }

    #[test]
    fn test_lists_are_comma_joined() {
        let query = to_query(&json!({"invoice_ids": [1, 2, 3]})).unwrap();
        assert_eq!(query, "invoice_ids=1%2C2%2C3");
    }

    #[test]
    fn test_nulls_dropped_and_text_escaped() {
        let query = to_query(&json!({"comment": "thanks & bye", "payload": null})).unwrap();
        assert_eq!(query, "comment=thanks+%26+bye");
    }

    #[test]
    fn test_nested_object_as_json() {
        let query = to_query(&json!({"meta": {"a": 1}})).unwrap();
        assert_eq!(query, "meta=%7B%22a%22%3A1%7D");
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            to_query(&json!([1, 2])),
            Err(ApiError::InvalidParameter(_))
        ));
        assert!(to_query(&"text").is_err());
    }

    #[test]
    fn test_merge_later_wins() {
        let merged = merge([
            to_object(&json!({"a": 1, "b": 1})).unwrap(),
            to_object(&json!({"b": 2})).unwrap(),
        ]);
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 2}));
    }
}
