//! Webhook listener for Crypto Pay updates.
//!
//! The API notifies the app about paid invoices by POSTing signed updates
//! to a URL configured in the bot. This module verifies the signature,
//! normalizes the update and hands it to registered callbacks.
//!
//! # Example
//!
//! ```rust,ignore
//! use payment_crypto::api::CryptoPayClient;
//! use payment_crypto::webhook::{UpdateType, WebhookConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptoPayClient::builder("12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC")
//!         .webhook(WebhookConfig::new().with_port(8080))
//!         .build()?;
//!
//!     client.on(UpdateType::InvoicePaid, |update| {
//!         if let Ok(invoice) = update.invoice() {
//!             println!("Invoice {} paid", invoice.invoice_id);
//!         }
//!     });
//!
//!     let server = client.start_webhook().await?;
//!     println!("Listening on {}{}", server.local_addr(), client.webhook_path());
//!     tokio::signal::ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! To mount the endpoint in an existing axum application use
//! [`CryptoPayClient::webhook_router`](crate::api::CryptoPayClient::webhook_router).

pub mod config;
pub mod error;
pub mod handlers;
pub mod listener;
pub mod signature;
pub mod types;

pub use config::WebhookConfig;
pub use error::{WebhookError, WebhookResult};
pub use handlers::{UpdateCallback, UpdateHandlers};
pub use listener::{WebhookListener, WebhookServer};
pub use signature::{sign_body, verify_signature, SignatureVerifier};
pub use types::{RawUpdate, Update, UpdateType};
