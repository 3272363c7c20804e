//! Check-related types for the Crypto Pay API.

use serde::{Deserialize, Serialize};

/// Check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Not activated yet
    Active,
    /// Redeemed by a user
    Activated,
    #[serde(other)]
    Unknown,
}

/// Pre-funded voucher redeemable by whichever user activates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    /// Unique ID for this check
    pub check_id: i64,
    /// Hash of the check
    pub hash: String,
    /// Cryptocurrency code
    pub asset: String,
    /// Amount of the check
    pub amount: f64,
    /// URL to activate the check
    pub bot_check_url: String,
    /// Status of the check
    pub status: CheckStatus,
    /// Creation timestamp (milliseconds)
    pub created_at: i64,
    /// Activation date as sent by the API (not normalized)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<String>,
}

/// Optional parameters for `createCheck`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateCheckOptions {
    /// Only this Telegram user can activate the check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_to_user_id: Option<i64>,
    /// Only this Telegram username can activate the check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_to_username: Option<String>,
}

impl CreateCheckOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the check to a Telegram user ID.
    pub fn pin_to_user(mut self, user_id: i64) -> Self {
        self.pin_to_user_id = Some(user_id);
        self
    }

    /// Pin the check to a Telegram username.
    pub fn pin_to_username(mut self, username: impl Into<String>) -> Self {
        self.pin_to_username = Some(username.into());
        self
    }
}

/// Query parameters for `getChecks`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetChecksParams {
    /// Filter by cryptocurrency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Filter by check IDs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_ids: Vec<i64>,
    /// Filter by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    /// Pagination offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Max results (1-1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl GetChecksParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by cryptocurrency.
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Filter by check IDs.
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.check_ids = ids.into_iter().collect();
        self
    }

    /// Filter by status.
    pub fn with_status(mut self, status: CheckStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set pagination window.
    pub fn with_page(mut self, offset: u32, count: u32) -> Self {
        self.offset = Some(offset);
        self.count = Some(count);
        self
    }
}
