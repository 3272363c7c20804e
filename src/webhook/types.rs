//! Webhook update types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::types::Invoice;
use crate::shared::normalize::normalize;
use crate::webhook::error::{WebhookError, WebhookResult};

/// Kind of webhook update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UpdateType {
    /// An invoice was paid
    InvoicePaid,
    /// An update type this library does not know yet
    Other(String),
}

impl UpdateType {
    pub fn as_str(&self) -> &str {
        match self {
            UpdateType::InvoicePaid => "invoice_paid",
            UpdateType::Other(name) => name,
        }
    }
}

impl From<&str> for UpdateType {
    fn from(s: &str) -> Self {
        match s {
            "invoice_paid" => Self::InvoicePaid,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for UpdateType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<UpdateType> for String {
    fn from(update_type: UpdateType) -> Self {
        update_type.as_str().to_string()
    }
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Update as delivered on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUpdate {
    pub update_id: i64,
    pub update_type: UpdateType,
    pub request_date: Value,
    #[serde(default)]
    pub payload: Value,
}

/// A verified, normalized webhook update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    /// Unique update ID
    pub update_id: i64,
    /// Update kind
    pub update_type: UpdateType,
    /// When the request was sent (milliseconds since epoch)
    pub request_date: i64,
    /// Normalized payload; an invoice for [`UpdateType::InvoicePaid`]
    pub payload: Value,
}

impl Update {
    /// Parse and normalize a raw request body.
    pub fn parse(body: &[u8]) -> WebhookResult<Self> {
        let raw: RawUpdate = serde_json::from_slice(body)?;
        Self::try_from(raw)
    }

    /// Decode the payload as an invoice.
    pub fn invoice(&self) -> Result<Invoice, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// `update_id` and `request_date` merged with the payload fields.
    ///
    /// Payload fields win on key collisions; `update_type` is not included.
    pub fn flatten(&self) -> Value {
        let mut flat = Map::new();
        flat.insert("update_id".to_string(), Value::from(self.update_id));
        flat.insert("request_date".to_string(), Value::from(self.request_date));
        if let Value::Object(fields) = &self.payload {
            flat.extend(fields.clone());
        }
        Value::Object(flat)
    }
}

impl TryFrom<RawUpdate> for Update {
    type Error = WebhookError;

    fn try_from(raw: RawUpdate) -> Result<Self, Self::Error> {
        let mut envelope = Map::new();
        envelope.insert("request_date".to_string(), raw.request_date);
        let request_date = match normalize(Value::Object(envelope)).get("request_date") {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| WebhookError::MalformedBody(format!("request_date out of range: {}", n)))?,
            other => {
                return Err(WebhookError::MalformedBody(format!(
                    "request_date is not a date: {}",
                    other.unwrap_or(&Value::Null)
                )))
            }
        };

        Ok(Update {
            update_id: raw.update_id,
            update_type: raw.update_type,
            request_date,
            payload: normalize(raw.payload),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_body() -> Vec<u8> {
        serde_json::to_vec(&json!({
            "update_id": 7,
            "update_type": "invoice_paid",
            "request_date": "2024-01-15T10:30:00.000Z",
            "payload": {
                "invoice_id": 42,
                "hash": "IVabc",
                "currency_type": "crypto",
                "asset": "TON",
                "amount": "3.5",
                "bot_invoice_url": "https://t.me/CryptoBot?start=IVabc",
                "status": "paid",
                "created_at": "2024-01-15T10:00:00.000Z",
                "paid_at": "2024-01-15T10:30:00.000Z",
                "allow_comments": true,
                "allow_anonymous": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_update_type_from_str() {
        assert_eq!(UpdateType::from("invoice_paid"), UpdateType::InvoicePaid);
        assert_eq!(
            UpdateType::from("check_activated"),
            UpdateType::Other("check_activated".to_string())
        );
        assert_eq!(UpdateType::InvoicePaid.to_string(), "invoice_paid");
    }

    #[test]
    fn test_parse_normalizes() {
        let update = Update::parse(&sample_body()).unwrap();
        assert_eq!(update.update_id, 7);
        assert_eq!(update.update_type, UpdateType::InvoicePaid);
        assert_eq!(update.request_date, 1705314600000);
        assert_eq!(update.payload["amount"], json!(3.5));
        assert_eq!(update.payload["paid_at"], json!(1705314600000i64));
    }

    #[test]
    fn test_invoice_payload() {
        let update = Update::parse(&sample_body()).unwrap();
        let invoice = update.invoice().unwrap();
        assert_eq!(invoice.invoice_id, 42);
        assert_eq!(invoice.amount, 3.5);
        assert!(invoice.is_paid());
    }

    #[test]
    fn test_flatten() {
        let update = Update::parse(&sample_body()).unwrap();
        let flat = update.flatten();
        assert_eq!(flat["update_id"], json!(7));
        assert_eq!(flat["request_date"], json!(1705314600000i64));
        assert_eq!(flat["invoice_id"], json!(42));
        assert!(flat.get("update_type").is_none());
    }

    #[test]
    fn test_flatten_payload_wins() {
        let update = Update {
            update_id: 1,
            update_type: UpdateType::InvoicePaid,
            request_date: 1705314600000,
            payload: json!({"update_id": 99, "amount": 2}),
        };
        let flat = update.flatten();
        assert_eq!(flat["update_id"], json!(99));
        assert_eq!(flat["request_date"], json!(1705314600000i64));
        assert_eq!(flat["amount"], json!(2));
    }

    #[test]
    fn test_numeric_request_date_kept() {
        let body = br#"{"update_id":1,"update_type":"invoice_paid","request_date":1705314600000,"payload":{}}"#;
        assert_eq!(Update::parse(body).unwrap().request_date, 1705314600000);
    }

    #[test]
    fn test_malformed_bodies() {
        assert!(matches!(
            Update::parse(b"not json"),
            Err(WebhookError::MalformedBody(_))
        ));
        assert!(matches!(
            Update::parse(br#"{"update_type":"invoice_paid"}"#),
            Err(WebhookError::MalformedBody(_))
        ));
        assert!(matches!(
            Update::parse(br#"{"update_id":1,"update_type":"invoice_paid","request_date":"yesterday"}"#),
            Err(WebhookError::MalformedBody(_))
        ));
    }
}
