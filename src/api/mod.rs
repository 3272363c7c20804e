//! Crypto Pay API client module.
//!
//! This module provides a type-safe HTTP client for the Crypto Pay API:
//! invoices, checks, transfers, balances, exchange rates and currencies.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use payment_crypto::api::{CryptoPayClient, GetInvoicesParams, InvoiceStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptoPayClient::new("12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC")?;
//!
//!     // Check the token
//!     let app = client.get_me().await?;
//!     println!("App: {}", app.name);
//!
//!     // Recently paid invoices
//!     let paid = client
//!         .get_invoices(GetInvoicesParams::new().with_status(InvoiceStatus::Paid))
//!         .await?;
//!     println!("Found {} paid invoices", paid.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Client Configuration
//!
//! Use the builder pattern for custom configuration:
//!
//! ```rust,ignore
//! use payment_crypto::api::CryptoPayClient;
//! use payment_crypto::network::Network;
//! use std::time::Duration;
//!
//! let client = CryptoPayClient::builder("12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC")
//!     .network(Network::Testnet)
//!     .timeout(Duration::from_secs(30))
//!     .build()?;
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>` which is an alias for `Result<T, ApiError>`.
//! Errors reported by the API keep their code and name:
//!
//! ```rust,ignore
//! use payment_crypto::api::ApiError;
//!
//! match client.delete_invoice(42).await {
//!     Ok(_) => println!("Deleted"),
//!     Err(ApiError::Api(err)) => println!("API refused: {}", err.get_message()),
//!     Err(e) if e.is_transport() => println!("Network problem, safe to retry: {}", e),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```
//!
//! # Transfers
//!
//! Every transfer carries a `spend_id`; reuse the same one when repeating a
//! request after a network failure so the coins are sent at most once:
//!
//! ```rust,ignore
//! use payment_crypto::api::{CryptoPayClient, TransferOptions};
//!
//! let spend_id = CryptoPayClient::generate_spend_id();
//! let transfer = client
//!     .transfer(1234567, "USDT", 5.0, &spend_id, TransferOptions::new().with_comment("Prize"))
//!     .await?;
//! println!("Transfer {} completed", transfer.transfer_id);
//! ```

pub mod client;
pub mod error;
pub mod params;
pub mod types;

// Re-export main types for convenience
pub use client::{CryptoPayClient, CryptoPayClientBuilder};
pub use error::{ApiError, ApiResult, ErrorResponse};
pub use types::*;
