//! App-related types for the Crypto Pay API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::serde_util::lenient_f64;

/// Basic information about an app (`getMe`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppInfo {
    /// Application ID
    pub app_id: i64,
    /// Application name
    pub name: String,
    /// Bot processing requests ("CryptoBot" or "CryptoTestnetBot")
    pub payment_processing_bot_username: String,
}

/// App statistics for a period (`getStats`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStats {
    /// Total volume of paid invoices in USD
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub volume: Option<f64>,
    /// Conversion of all created invoices
    #[serde(default, deserialize_with = "lenient_f64::deserialize")]
    pub conversion: Option<f64>,
    /// Number of unique users who paid the invoices
    #[serde(default)]
    pub unique_users_count: i64,
    /// Number of created invoices
    #[serde(default)]
    pub created_invoice_count: i64,
    /// Number of paid invoices
    #[serde(default)]
    pub paid_invoice_count: i64,
    /// Start of the period (milliseconds since epoch)
    pub start_at: Option<i64>,
    /// End of the period (milliseconds since epoch)
    pub end_at: Option<i64>,
}

/// Query parameters for `getStats`.
///
/// The API defaults to the last 24 hours when both bounds are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsParams {
    /// Start of the period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    /// End of the period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

impl StatsParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set time range.
    pub fn with_time_range(mut self, start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self.end_at = Some(end_at);
        self
    }

    /// Set the start of the period.
    pub fn with_start(mut self, start_at: DateTime<Utc>) -> Self {
        self.start_at = Some(start_at);
        self
    }

    /// Set the end of the period.
    pub fn with_end(mut self, end_at: DateTime<Utc>) -> Self {
        self.end_at = Some(end_at);
        self
    }
}
