//! Response normalization for the Crypto Pay API.
//!
//! The API sends amounts as decimal strings ("3.5") and dates as ISO 8601
//! strings. [`normalize`] walks a decoded response and rewrites a fixed set of
//! well-known keys: amounts become JSON numbers, dates become epoch
//! milliseconds. Every other key is left as it was.
//!
//! Only present and truthy fields are coerced. `0`, `""`, `false` and `null`
//! are skipped, so a date field literally equal to epoch `0` is never touched.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};

/// How a recognized field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Decimal string → JSON number.
    Numeric,
    /// Date/time string → epoch milliseconds.
    EpochMillis,
}

/// Recognized keys and their coercion.
pub const FIELD_KINDS: &[(&str, FieldKind)] = &[
    ("amount", FieldKind::Numeric),
    ("available", FieldKind::Numeric),
    ("fee_amount", FieldKind::Numeric),
    ("fee_in_usd", FieldKind::Numeric),
    ("onhold", FieldKind::Numeric),
    ("paid_amount", FieldKind::Numeric),
    ("paid_fiat_rate", FieldKind::Numeric),
    ("paid_usd_rate", FieldKind::Numeric),
    ("rate", FieldKind::Numeric),
    ("start_at", FieldKind::EpochMillis),
    ("end_at", FieldKind::EpochMillis),
    ("completed_at", FieldKind::EpochMillis),
    ("created_at", FieldKind::EpochMillis),
    ("expiration_date", FieldKind::EpochMillis),
    ("paid_at", FieldKind::EpochMillis),
    ("request_date", FieldKind::EpochMillis),
];

/// Look up the coercion for a key, if it is recognized.
pub fn field_kind(key: &str) -> Option<FieldKind> {
    FIELD_KINDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
}

/// Normalize a decoded response, returning the rewritten value.
pub fn normalize(mut value: Value) -> Value {
    normalize_in_place(&mut value);
    value
}

/// Normalize a decoded response in place.
///
/// Arrays are mapped element by element. Objects have their recognized keys
/// coerced; nested objects are not descended into.
pub fn normalize_in_place(value: &mut Value) {
    match value {
        Value::Array(items) => items.iter_mut().for_each(normalize_in_place),
        Value::Object(map) => {
            for (key, kind) in FIELD_KINDS {
                let Some(field) = map.get_mut(*key) else {
                    continue;
                };
                if !is_truthy(field) {
                    continue;
                }
                let coerced = match kind {
                    FieldKind::Numeric => to_number(field),
                    FieldKind::EpochMillis => to_epoch_millis(field),
                };
                if let Some(number) = coerced {
                    *field = Value::Number(number);
                }
            }
        }
        _ => {}
    }
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a date/time string into epoch milliseconds.
///
/// Accepts RFC 3339, `YYYY-MM-DD[T ]HH:MM:SS[.fff]` (read as UTC) and a bare
/// `YYYY-MM-DD` (UTC midnight).
pub fn parse_datetime_millis(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

// Numbers are already numeric; unparseable values stay as they are.
fn to_number(value: &Value) -> Option<Number> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok().and_then(number_from_f64),
        Value::Bool(true) => Some(Number::from(1)),
        _ => None,
    }
}

// Numbers are taken to be epoch milliseconds already.
fn to_epoch_millis(value: &Value) -> Option<Number> {
    match value {
        Value::String(s) => parse_datetime_millis(s).map(Number::from),
        _ => None,
    }
}

/// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

fn number_from_f64(f: f64) -> Option<Number> {
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Some(Number::from(f as i64))
    } else {
        Number::from_f64(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_string_becomes_number() {
        let out = normalize(json!({"amount": "3.5", "created_at": 1_700_000_000_000i64}));
        assert_eq!(out, json!({"amount": 3.5, "created_at": 1_700_000_000_000i64}));
    }

    #[test]
    fn test_integral_amount_stays_integer() {
        let out = normalize(json!({"available": "10", "onhold": "0.25"}));
        assert_eq!(out["available"], json!(10));
        assert!(out["available"].is_i64());
        assert_eq!(out["onhold"], json!(0.25));
    }

    #[test]
    fn test_falsy_fields_are_skipped() {
        assert_eq!(normalize(json!({"amount": 0})), json!({"amount": 0}));
        assert_eq!(normalize(json!({"amount": ""})), json!({"amount": ""}));
        assert_eq!(normalize(json!({"paid_at": null})), json!({"paid_at": null}));
        assert_eq!(normalize(json!({"created_at": 0})), json!({"created_at": 0}));
    }

    #[test]
    fn test_zero_string_is_truthy() {
        assert_eq!(normalize(json!({"amount": "0"})), json!({"amount": 0}));
    }

    #[test]
    fn test_dates_become_epoch_millis() {
        let out = normalize(json!({
            "created_at": "2024-01-15T10:30:00.000Z",
            "paid_at": "2024-01-15T12:30:00+02:00",
            "expiration_date": "2024-01-16",
        }));
        assert_eq!(out["created_at"], json!(1_705_314_600_000i64));
        assert_eq!(out["paid_at"], json!(1_705_314_600_000i64));
        assert_eq!(out["expiration_date"], json!(1_705_363_200_000i64));
    }

    #[test]
    fn test_naive_datetime_is_utc() {
        assert_eq!(
            parse_datetime_millis("2024-01-15 10:30:00"),
            Some(1_705_314_600_000)
        );
        assert_eq!(
            parse_datetime_millis("2024-01-15T10:30:00.250"),
            Some(1_705_314_600_250)
        );
    }

    #[test]
    fn test_unrecognized_keys_untouched() {
        let input = json!({
            "invoice_id": 1,
            "hash": "IVabc",
            "usd_rate": "2.5",
            "activated_at": "2024-01-15T10:30:00Z",
        });
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn test_nested_objects_not_descended() {
        let input = json!({"amount": "1", "inner": {"amount": "2"}});
        let out = normalize(input);
        assert_eq!(out["amount"], json!(1));
        assert_eq!(out["inner"]["amount"], json!("2"));
    }

    #[test]
    fn test_arrays_mapped_elementwise() {
        let out = normalize(json!([
            {"currency_code": "TON", "available": "1.5", "onhold": "0"},
            {"currency_code": "BTC", "available": "", "onhold": "0.001"},
            [{"rate": "3.1"}],
        ]));
        assert_eq!(out[0]["available"], json!(1.5));
        assert_eq!(out[0]["onhold"], json!(0));
        assert_eq!(out[1]["available"], json!(""));
        assert_eq!(out[1]["onhold"], json!(0.001));
        assert_eq!(out[2][0]["rate"], json!(3.1));
    }

    #[test]
    fn test_unparseable_values_left_alone() {
        let input = json!({"amount": "abc", "created_at": "yesterday", "rate": "NaN"});
        assert_eq!(normalize(input.clone()), input);
    }

    #[test]
    fn test_null_and_scalars_pass_through() {
        assert_eq!(normalize(Value::Null), Value::Null);
        assert_eq!(normalize(json!("3.5")), json!("3.5"));
        assert_eq!(normalize(json!(true)), json!(true));
    }

    #[test]
    fn test_idempotent() {
        let input = json!({
            "items": [],
            "amount": "12.75",
            "fee_amount": "0.1",
            "paid_usd_rate": "2.31",
            "created_at": "2024-01-15T10:30:00Z",
            "paid_at": "2024-01-15T11:00:00Z",
            "status": "paid",
        });
        let once = normalize(input);
        let twice = normalize(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_field_kind_lookup() {
        assert_eq!(field_kind("rate"), Some(FieldKind::Numeric));
        assert_eq!(field_kind("request_date"), Some(FieldKind::EpochMillis));
        assert_eq!(field_kind("status"), None);
        assert_eq!(FIELD_KINDS.len(), 16);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }
}
