//! # Crypto Pay Rust SDK
//!
//! A Rust client for the Crypto Pay API: accept payments in crypto and fiat,
//! send coins to users and receive paid-invoice notifications.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for every API method
//! - [`webhook`]: signed update listener (feature `webhook`, on by default)
//! - [`network`]: hostnames and protocol selection
//! - [`shared`]: response normalization and `spend_id` helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use payment_crypto::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptoPayClient::builder("12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC")
//!         .network(Network::Testnet)
//!         .build()?;
//!
//!     let invoice = client
//!         .create_invoice(
//!             InvoiceCurrency::fiat("USD", 10.0).with_accepted_assets(["USDT", "TON"]),
//!             CreateInvoiceOptions::new().with_description("Subscription"),
//!         )
//!         .await?;
//!     println!("Pay here: {}", invoice.bot_invoice_url);
//!
//!     for balance in client.get_balances().await? {
//!         println!("{}: {}", balance.currency_code, balance.available);
//!     }
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Hostnames, protocol and header constants.
pub mod network;

/// Shared utilities used by the API client and the webhook listener.
pub mod shared;

/// HTTP client for the Crypto Pay API.
pub mod api;

/// Webhook listener for signed updates.
#[cfg(feature = "webhook")]
pub mod webhook;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use payment_crypto::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        ApiError, ApiResult, CryptoPayClient, CryptoPayClientBuilder, ErrorResponse,
        // App
        AppInfo, AppStats, StatsParams,
        // Invoices
        CreateInvoiceOptions, CurrencyType, GetInvoicesParams, Invoice, InvoiceCurrency,
        InvoiceStatus, PaidButtonName,
        // Checks
        Check, CheckStatus, CreateCheckOptions, GetChecksParams,
        // Transfers
        GetTransfersParams, Transfer, TransferOptions, TransferStatus,
        // Balances, rates and currencies
        Balance, Currency, CurrencyFilter, ExchangeRate,
    };

    pub use crate::network::{Network, Protocol};

    pub use crate::shared::{generate_spend_id, normalize};

    #[cfg(feature = "webhook")]
    pub use crate::webhook::{
        Update, UpdateType, WebhookConfig, WebhookError, WebhookResult, WebhookServer,
    };
}
