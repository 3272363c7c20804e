//! Custom serde helpers for API wire formats.

/// Deserializes an optional `f64` sent either as a JSON number or as a
/// decimal string.
///
/// Used for vendor fields outside the normalized key set (e.g. the
/// deprecated `usd_rate`), which still arrive as strings.
pub mod lenient_f64 {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom(format!("Invalid number: {}", s))),
            Some(other) => Err(serde::de::Error::custom(format!(
                "Expected number or numeric string, got {}",
                other
            ))),
        }
    }
}
