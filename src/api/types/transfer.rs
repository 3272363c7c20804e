//! Transfer-related types for the Crypto Pay API.

use serde::{Deserialize, Serialize};

/// Transfer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    Completed,
    #[serde(other)]
    Unknown,
}

/// Direct payout from the app balance to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique ID for this transfer
    pub transfer_id: i64,
    /// Idempotency token the transfer was sent with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_id: Option<String>,
    /// Telegram user ID the transfer was sent to
    pub user_id: i64,
    /// Cryptocurrency code
    pub asset: String,
    /// Amount of the transfer
    pub amount: f64,
    /// Status of the transfer
    pub status: TransferStatus,
    /// Completion timestamp (milliseconds)
    pub completed_at: i64,
    /// Comment for this transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Optional parameters for `transfer`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransferOptions {
    /// Shown to the user in the transfer notification (up to 1024 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Suppress the notification to the user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_send_notification: Option<bool>,
}

impl TransferOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Do not notify the user.
    pub fn silent(mut self) -> Self {
        self.disable_send_notification = Some(true);
        self
    }
}

/// Query parameters for `getTransfers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetTransfersParams {
    /// Filter by cryptocurrency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Filter by transfer IDs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transfer_ids: Vec<i64>,
    /// Filter by idempotency token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spend_id: Option<String>,
    /// Pagination offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Max results (1-1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl GetTransfersParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by cryptocurrency.
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Filter by transfer IDs.
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.transfer_ids = ids.into_iter().collect();
        self
    }

    /// Filter by idempotency token.
    pub fn with_spend_id(mut self, spend_id: impl Into<String>) -> Self {
        self.spend_id = Some(spend_id.into());
        self
    }

    /// Set pagination window.
    pub fn with_page(mut self, offset: u32, count: u32) -> Self {
        self.offset = Some(offset);
        self.count = Some(count);
        self
    }
}
