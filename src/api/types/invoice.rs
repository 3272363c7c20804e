//! Invoice-related types for the Crypto Pay API.

use serde::{Deserialize, Serialize};

use crate::shared::serde_util::lenient_f64;

/// Invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Waiting for payment
    Active,
    /// Paid by a user
    Paid,
    /// Payment time limit passed
    Expired,
    /// Status added by the API after this SDK was written
    #[serde(other)]
    Unknown,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paid => "paid",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        }
    }
}

/// Type of the invoice price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyType {
    #[default]
    Crypto,
    Fiat,
    #[serde(other)]
    Unknown,
}

/// Label of the button shown after an invoice is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaidButtonName {
    /// "View Item"
    ViewItem,
    /// "Open Channel"
    OpenChannel,
    /// "Open Bot"
    #[serde(alias = "openBots")]
    OpenBot,
    /// "Return"
    Callback,
}

/// Invoice created by the app.
///
/// Amounts are numbers and dates are milliseconds since epoch once the
/// response has been normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique ID for this invoice
    pub invoice_id: i64,
    /// Hash of the invoice
    pub hash: String,
    /// Type of the price
    #[serde(default)]
    pub currency_type: CurrencyType,
    /// Cryptocurrency code (crypto invoices)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Fiat currency code (fiat invoices)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiat: Option<String>,
    /// Amount of the invoice
    pub amount: f64,
    /// Assets which can be used to pay a fiat invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_assets: Option<Vec<String>>,
    /// Asset the invoice was paid with (fiat invoices)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_asset: Option<String>,
    /// Amount paid in `paid_asset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<f64>,
    /// Rate of `paid_asset` in the invoice fiat
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_fiat_rate: Option<f64>,
    /// Asset of charged service fees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset: Option<String>,
    /// Amount of charged service fees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<f64>,
    /// Service fees in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_in_usd: Option<f64>,
    /// Deprecated fee field
    #[serde(default, deserialize_with = "lenient_f64::deserialize", skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    /// URL to pay the invoice in the bot
    pub bot_invoice_url: String,
    /// URL to pay the invoice in the mini app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_app_invoice_url: Option<String>,
    /// URL to pay the invoice in the web app
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app_invoice_url: Option<String>,
    /// Deprecated payment URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pay_url: Option<String>,
    /// Description for this invoice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Status of the invoice
    pub status: InvoiceStatus,
    /// Creation timestamp (milliseconds)
    pub created_at: i64,
    /// Price of the paid asset in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_usd_rate: Option<f64>,
    /// Deprecated USD rate
    #[serde(default, deserialize_with = "lenient_f64::deserialize", skip_serializing_if = "Option::is_none")]
    pub usd_rate: Option<f64>,
    /// Whether the user can add a comment to the payment
    #[serde(default)]
    pub allow_comments: bool,
    /// Whether the user can pay anonymously
    #[serde(default)]
    pub allow_anonymous: bool,
    /// Expiration timestamp (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<i64>,
    /// Payment timestamp (milliseconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    /// Whether the invoice was paid anonymously
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_anonymously: Option<bool>,
    /// Comment from the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Hidden message shown after payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_message: Option<String>,
    /// Previously attached payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Label of the button shown after payment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_name: Option<PaidButtonName>,
    /// URL opened by the button
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_url: Option<String>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

/// Price of a new invoice: a cryptocurrency amount or a fiat amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "currency_type", rename_all = "snake_case")]
pub enum InvoiceCurrency {
    Crypto {
        /// Cryptocurrency code
        asset: String,
        /// Amount in `asset`
        amount: f64,
    },
    Fiat {
        /// Fiat currency code
        fiat: String,
        /// Amount in `fiat`
        amount: f64,
        /// Assets accepted for payment (all supported assets when empty)
        #[serde(skip_serializing_if = "Vec::is_empty")]
        accepted_assets: Vec<String>,
    },
}

impl InvoiceCurrency {
    /// Price in a cryptocurrency.
    pub fn crypto(asset: impl Into<String>, amount: f64) -> Self {
        Self::Crypto {
            asset: asset.into(),
            amount,
        }
    }

    /// Price in a fiat currency.
    pub fn fiat(fiat: impl Into<String>, amount: f64) -> Self {
        Self::Fiat {
            fiat: fiat.into(),
            amount,
            accepted_assets: Vec::new(),
        }
    }

    /// Restrict the assets a fiat invoice can be paid with. No-op on crypto prices.
    pub fn with_accepted_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Self::Fiat {
            accepted_assets, ..
        } = &mut self
        {
            *accepted_assets = assets.into_iter().map(Into::into).collect();
        }
        self
    }

    pub fn amount(&self) -> f64 {
        match self {
            Self::Crypto { amount, .. } | Self::Fiat { amount, .. } => *amount,
        }
    }
}

/// Optional parameters for `createInvoice`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateInvoiceOptions {
    /// Shown to the user when paying (up to 1024 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Shown to the user after payment (up to 2048 characters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_message: Option<String>,
    /// Button shown after payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_btn_name: Option<PaidButtonName>,
    /// URL opened by the button (required with `paid_btn_name`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_btn_url: Option<String>,
    /// Any data to attach to the invoice (up to 4 KB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Allow a comment to the payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_comments: Option<bool>,
    /// Allow anonymous payment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_anonymous: Option<bool>,
    /// Payment time limit in seconds (1-2678400)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
}

impl CreateInvoiceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set hidden message.
    pub fn with_hidden_message(mut self, message: impl Into<String>) -> Self {
        self.hidden_message = Some(message.into());
        self
    }

    /// Set the button shown after payment.
    pub fn with_paid_button(mut self, name: PaidButtonName, url: impl Into<String>) -> Self {
        self.paid_btn_name = Some(name);
        self.paid_btn_url = Some(url.into());
        self
    }

    /// Set payload.
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Allow or forbid comments.
    pub fn with_comments(mut self, allow: bool) -> Self {
        self.allow_comments = Some(allow);
        self
    }

    /// Allow or forbid anonymous payment.
    pub fn with_anonymous(mut self, allow: bool) -> Self {
        self.allow_anonymous = Some(allow);
        self
    }

    /// Set payment time limit in seconds.
    pub fn with_expires_in(mut self, seconds: u32) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

/// Query parameters for `getInvoices`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GetInvoicesParams {
    /// Filter by cryptocurrency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,
    /// Filter by fiat currency code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat: Option<String>,
    /// Filter by invoice IDs
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invoice_ids: Vec<i64>,
    /// Filter by status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    /// Pagination offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Max results (1-1000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl GetInvoicesParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by cryptocurrency.
    pub fn with_asset(mut self, asset: impl Into<String>) -> Self {
        self.asset = Some(asset.into());
        self
    }

    /// Filter by fiat currency.
    pub fn with_fiat(mut self, fiat: impl Into<String>) -> Self {
        self.fiat = Some(fiat.into());
        self
    }

    /// Filter by invoice IDs.
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.invoice_ids = ids.into_iter().collect();
        self
    }

    /// Filter by status.
    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
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
