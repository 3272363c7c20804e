//! Crypto Pay API client implementation.
//!
//! The [`CryptoPayClient`] provides a type-safe interface for interacting with
//! the Crypto Pay API.
//!
//! # Example
//!
//! ```rust,ignore
//! use payment_crypto::api::{CryptoPayClient, InvoiceCurrency, CreateInvoiceOptions};
//! use payment_crypto::network::Network;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CryptoPayClient::builder("12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC")
//!         .network(Network::Testnet)
//!         .build()?;
//!
//!     let app = client.get_me().await?;
//!     println!("Hello from {}", app.name);
//!
//!     let invoice = client
//!         .create_invoice(InvoiceCurrency::crypto("TON", 3.0), CreateInvoiceOptions::new())
//!         .await?;
//!     println!("Payment link: {}", invoice.bot_invoice_url);
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::error::{ApiEnvelope, ApiError, ApiResult};
use crate::api::params;
use crate::api::types::*;
use crate::network::{Network, Protocol, API_TOKEN_HEADER};
use crate::shared::normalize::normalize;
use crate::shared::spend_id::{generate_spend_id, is_valid_spend_id, DEFAULT_SPEND_ID_LEN, MAX_SPEND_ID_LEN};

#[cfg(feature = "webhook")]
use crate::webhook::{UpdateHandlers, WebhookConfig};

/// Maximum `count` accepted by list endpoints.
const MAX_PAGE_COUNT: u32 = 1000;

/// Maximum invoice lifetime in seconds (31 days).
const MAX_EXPIRES_IN: u32 = 2_678_400;

const MAX_DESCRIPTION_LEN: usize = 1024;
const MAX_HIDDEN_MESSAGE_LEN: usize = 2048;
const MAX_PAYLOAD_BYTES: usize = 4096;
const MAX_COMMENT_LEN: usize = 1024;

/// Environment variable holding the app token.
pub const ENV_TOKEN: &str = "CRYPTO_PAY_TOKEN";
/// Environment variable selecting `mainnet` or `testnet`.
pub const ENV_NETWORK: &str = "CRYPTO_PAY_NETWORK";
/// Environment variable overriding the webhook path.
pub const ENV_WEBHOOK_PATH: &str = "CRYPTO_PAY_WEBHOOK_PATH";
/// Environment variable setting the webhook port.
pub const ENV_WEBHOOK_PORT: &str = "CRYPTO_PAY_WEBHOOK_PORT";

/// Builder for configuring [`CryptoPayClient`].
#[derive(Clone)]
pub struct CryptoPayClientBuilder {
    token: String,
    network: Network,
    protocol: Protocol,
    base_url: Option<String>,
    timeout: Option<Duration>,
    default_headers: Vec<(String, String)>,
    #[cfg(feature = "webhook")]
    webhook: Option<WebhookConfig>,
}

impl std::fmt::Debug for CryptoPayClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoPayClientBuilder")
            .field("token", &"<redacted>")
            .field("network", &self.network)
            .field("protocol", &self.protocol)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl CryptoPayClientBuilder {
    /// Create a new builder for the given app token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            network: Network::default(),
            protocol: Protocol::default(),
            base_url: None,
            timeout: None,
            default_headers: Vec::new(),
            #[cfg(feature = "webhook")]
            webhook: None,
        }
    }

    /// Create a builder from `CRYPTO_PAY_*` environment variables.
    ///
    /// `CRYPTO_PAY_TOKEN` is required. `CRYPTO_PAY_NETWORK` selects the network;
    /// `CRYPTO_PAY_WEBHOOK_PATH` / `CRYPTO_PAY_WEBHOOK_PORT` enable the webhook.
    pub fn from_env() -> ApiResult<Self> {
        let token = std::env::var(ENV_TOKEN)
            .map_err(|_| ApiError::InvalidParameter(format!("{} is not set", ENV_TOKEN)))?;
        let mut builder = Self::new(token);

        if let Ok(network) = std::env::var(ENV_NETWORK) {
            builder.network = network.parse().map_err(ApiError::InvalidParameter)?;
        }

        #[cfg(feature = "webhook")]
        {
            let path = std::env::var(ENV_WEBHOOK_PATH).ok();
            let port = match std::env::var(ENV_WEBHOOK_PORT) {
                Ok(port) => Some(port.trim().parse::<u16>().map_err(|e| {
                    ApiError::InvalidParameter(format!("{} is not a valid port: {}", ENV_WEBHOOK_PORT, e))
                })?),
                Err(_) => None,
            };
            if path.is_some() || port.is_some() {
                let mut config = WebhookConfig::new();
                if let Some(path) = path {
                    config = config.with_path(path);
                }
                if let Some(port) = port {
                    config = config.with_port(port);
                }
                builder.webhook = Some(config);
            }
        }

        Ok(builder)
    }

    /// Select mainnet or testnet.
    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Select the request protocol.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Override `protocol://hostname` entirely (proxies, mock servers).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set a request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Enable the webhook listener.
    #[cfg(feature = "webhook")]
    pub fn webhook(mut self, config: WebhookConfig) -> Self {
        self.webhook = Some(config);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<CryptoPayClient> {
        if self.token.trim().is_empty() {
            return Err(ApiError::InvalidParameter("token cannot be empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let mut token_value = HeaderValue::from_str(&self.token)
            .map_err(|_| ApiError::InvalidParameter("token contains invalid characters".to_string()))?;
        token_value.set_sensitive(true);
        let token_header = HeaderName::from_bytes(API_TOKEN_HEADER.as_bytes())
            .map_err(|e| ApiError::InvalidParameter(format!("Invalid header name: {}", e)))?;
        headers.insert(token_header, token_value);

        for (name, value) in self.default_headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(&value)
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(10);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let base_url = self.base_url.unwrap_or_else(|| {
            format!("{}://{}", self.protocol.as_str(), self.network.hostname())
        });

        #[cfg(feature = "webhook")]
        if let Some(config) = &self.webhook {
            config.validate().map_err(|e| ApiError::InvalidParameter(e.to_string()))?;
        }

        Ok(CryptoPayClient {
            http_client,
            base_url,
            token: self.token,
            network: self.network,
            #[cfg(feature = "webhook")]
            webhook: self.webhook,
            #[cfg(feature = "webhook")]
            handlers: UpdateHandlers::new(),
        })
    }
}

/// Crypto Pay API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the update
/// callback registry.
#[derive(Clone)]
pub struct CryptoPayClient {
    http_client: Client,
    base_url: String,
    pub(crate) token: String,
    network: Network,
    #[cfg(feature = "webhook")]
    pub(crate) webhook: Option<WebhookConfig>,
    #[cfg(feature = "webhook")]
    pub(crate) handlers: UpdateHandlers,
}

impl std::fmt::Debug for CryptoPayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoPayClient")
            .field("base_url", &self.base_url)
            .field("network", &self.network)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl CryptoPayClient {
    /// Create a mainnet client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the HTTP client cannot be initialized.
    pub fn new(token: impl Into<String>) -> ApiResult<Self> {
        CryptoPayClientBuilder::new(token).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(token: impl Into<String>) -> CryptoPayClientBuilder {
        CryptoPayClientBuilder::new(token)
    }

    /// Get the base URL (`protocol://hostname`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the selected network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Generate a random 64-character `spend_id` for [`transfer`](Self::transfer).
    pub fn generate_spend_id() -> String {
        generate_spend_id(DEFAULT_SPEND_ID_LEN)
    }

    /// Build the full request URL for an API method.
    pub fn request_url<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> ApiResult<String> {
        if method.is_empty() {
            return Err(ApiError::InvalidParameter("method cannot be empty".to_string()));
        }
        let query = params::to_query(params)?;
        let mut url = format!("{}/api/{}", self.base_url, method);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Call an API method and unwrap the response envelope.
    ///
    /// The result is returned as sent by the API, without normalization.
    /// The request is made once; failures are never retried.
    pub async fn call_api<P: Serialize + ?Sized>(&self, method: &str, params: &P) -> ApiResult<Value> {
        let url = self.request_url(method, params)?;
        tracing::debug!(method, "Calling Crypto Pay API");

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiEnvelope>(&body) {
            Ok(envelope) => envelope.into_result().inspect_err(|e| {
                tracing::debug!(method, status = status.as_u16(), error = %e, "API returned an error");
            }),
            Err(e) if status.is_success() => Err(ApiError::Deserialize(format!(
                "Failed to deserialize response: {}",
                e
            ))),
            Err(_) => Err(ApiError::UnexpectedStatus(status.as_u16(), body)),
        }
    }

    /// Call a method, normalize the result and decode it.
    async fn call<T, P>(&self, method: &str, params: &P) -> ApiResult<T>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let result = self.call_api(method, params).await?;
        Self::decode(normalize(result))
    }

    /// Call a paginated method and decode `result.items`.
    async fn call_items<T, P>(&self, method: &str, params: &P) -> ApiResult<Vec<T>>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let result = self.call_api(method, params).await?;
        let items = match result {
            Value::Object(mut page) => page.remove("items").unwrap_or(Value::Array(Vec::new())),
            Value::Array(items) => Value::Array(items),
            Value::Null => Value::Array(Vec::new()),
            other => {
                return Err(ApiError::Deserialize(format!(
                    "Expected a list of items from {}, got {}",
                    method, other
                )))
            }
        };
        Self::decode(normalize(items))
    }

    fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
        serde_json::from_value(value)
            .map_err(|e| ApiError::Deserialize(format!("Failed to deserialize response: {}", e)))
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn validate_count(count: Option<u32>) -> ApiResult<()> {
        match count {
            Some(c) if c == 0 || c > MAX_PAGE_COUNT => Err(ApiError::InvalidParameter(format!(
                "count must be 1-{}",
                MAX_PAGE_COUNT
            ))),
            _ => Ok(()),
        }
    }

    fn validate_amount(amount: f64) -> ApiResult<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ApiError::InvalidParameter(format!(
                "amount must be a positive number, got {}",
                amount
            )));
        }
        Ok(())
    }

    fn validate_len(value: Option<&str>, max: usize, field_name: &str) -> ApiResult<()> {
        match value {
            Some(v) if v.chars().count() > max => Err(ApiError::InvalidParameter(format!(
                "{} must be at most {} characters",
                field_name, max
            ))),
            _ => Ok(()),
        }
    }

    fn validate_not_empty(value: &str, field_name: &str) -> ApiResult<()> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidParameter(format!("{} cannot be empty", field_name)));
        }
        Ok(())
    }

    fn validate_invoice_options(options: &CreateInvoiceOptions) -> ApiResult<()> {
        Self::validate_len(options.description.as_deref(), MAX_DESCRIPTION_LEN, "description")?;
        Self::validate_len(options.hidden_message.as_deref(), MAX_HIDDEN_MESSAGE_LEN, "hidden_message")?;
        if let Some(payload) = &options.payload {
            if payload.len() > MAX_PAYLOAD_BYTES {
                return Err(ApiError::InvalidParameter(format!(
                    "payload must be at most {} bytes",
                    MAX_PAYLOAD_BYTES
                )));
            }
        }
        if options.paid_btn_name.is_some() && options.paid_btn_url.is_none() {
            return Err(ApiError::InvalidParameter(
                "paid_btn_url is required when paid_btn_name is set".to_string(),
            ));
        }
        if let Some(expires_in) = options.expires_in {
            if expires_in == 0 || expires_in > MAX_EXPIRES_IN {
                return Err(ApiError::InvalidParameter(format!(
                    "expires_in must be 1-{}",
                    MAX_EXPIRES_IN
                )));
            }
        }
        Ok(())
    }

    // =========================================================================
    // App endpoints
    // =========================================================================

    /// Test the app token and get basic information about the app.
    pub async fn get_me(&self) -> ApiResult<AppInfo> {
        self.call("getMe", &()).await
    }

    /// Get app statistics for a period (last 24 hours by default).
    pub async fn get_stats(&self, params: StatsParams) -> ApiResult<AppStats> {
        if let (Some(start), Some(end)) = (params.start_at, params.end_at) {
            if start > end {
                return Err(ApiError::InvalidParameter(
                    "start_at must not be after end_at".to_string(),
                ));
            }
        }
        self.call("getStats", &params).await
    }

    // =========================================================================
    // Invoice endpoints
    // =========================================================================

    /// Create a new invoice.
    pub async fn create_invoice(
        &self,
        currency: InvoiceCurrency,
        options: CreateInvoiceOptions,
    ) -> ApiResult<Invoice> {
        Self::validate_amount(currency.amount())?;
        Self::validate_invoice_options(&options)?;

        let request = params::merge([params::to_object(&currency)?, params::to_object(&options)?]);
        self.call("createInvoice", &request).await
    }

    /// Delete an invoice created by the app.
    pub async fn delete_invoice(&self, invoice_id: i64) -> ApiResult<bool> {
        self.call("deleteInvoice", &json!({ "invoice_id": invoice_id })).await
    }

    /// Get invoices created by the app.
    pub async fn get_invoices(&self, params: GetInvoicesParams) -> ApiResult<Vec<Invoice>> {
        Self::validate_count(params.count)?;
        self.call_items("getInvoices", &params).await
    }

    /// Get a single invoice. Returns `Ok(None)` when the API does not know it.
    pub async fn get_invoice(&self, invoice_id: i64) -> ApiResult<Option<Invoice>> {
        let invoices = self
            .get_invoices(GetInvoicesParams::new().with_ids([invoice_id]))
            .await?;
        Ok(invoices.into_iter().find(|i| i.invoice_id == invoice_id))
    }

    // =========================================================================
    // Check endpoints
    // =========================================================================

    /// Create a new check.
    pub async fn create_check(
        &self,
        asset: &str,
        amount: f64,
        options: CreateCheckOptions,
    ) -> ApiResult<Check> {
        Self::validate_not_empty(asset, "asset")?;
        Self::validate_amount(amount)?;

        let request = params::merge([
            params::to_object(&json!({ "asset": asset, "amount": amount }))?,
            params::to_object(&options)?,
        ]);
        self.call("createCheck", &request).await
    }

    /// Delete a check created by the app.
    pub async fn delete_check(&self, check_id: i64) -> ApiResult<bool> {
        self.call("deleteCheck", &json!({ "check_id": check_id })).await
    }

    /// Get checks created by the app.
    pub async fn get_checks(&self, params: GetChecksParams) -> ApiResult<Vec<Check>> {
        Self::validate_count(params.count)?;
        self.call_items("getChecks", &params).await
    }

    /// Get a single check. Returns `Ok(None)` when the API does not know it.
    pub async fn get_check(&self, check_id: i64) -> ApiResult<Option<Check>> {
        let checks = self
            .get_checks(GetChecksParams::new().with_ids([check_id]))
            .await?;
        Ok(checks.into_iter().find(|c| c.check_id == check_id))
    }

    // =========================================================================
    // Transfer endpoints
    // =========================================================================

    /// Send coins from the app balance to a user.
    ///
    /// `spend_id` makes the request idempotent: the API accepts at most one
    /// transfer per `spend_id`, so a call that failed with a transport error
    /// can be repeated with the same `spend_id`. This method never retries on
    /// its own. See [`generate_spend_id`](Self::generate_spend_id).
    pub async fn transfer(
        &self,
        user_id: i64,
        asset: &str,
        amount: f64,
        spend_id: &str,
        options: TransferOptions,
    ) -> ApiResult<Transfer> {
        Self::validate_not_empty(asset, "asset")?;
        Self::validate_amount(amount)?;
        if !is_valid_spend_id(spend_id) {
            return Err(ApiError::InvalidParameter(format!(
                "spend_id must be 1-{} characters",
                MAX_SPEND_ID_LEN
            )));
        }
        Self::validate_len(options.comment.as_deref(), MAX_COMMENT_LEN, "comment")?;

        let request = params::merge([
            params::to_object(&json!({
                "user_id": user_id,
                "asset": asset,
                "amount": amount,
                "spend_id": spend_id,
            }))?,
            params::to_object(&options)?,
        ]);
        self.call("transfer", &request).await
    }

    /// Get transfers created by the app.
    pub async fn get_transfers(&self, params: GetTransfersParams) -> ApiResult<Vec<Transfer>> {
        Self::validate_count(params.count)?;
        self.call_items("getTransfers", &params).await
    }

    /// Get a single transfer. Returns `Ok(None)` when the API does not know it.
    pub async fn get_transfer(&self, transfer_id: i64) -> ApiResult<Option<Transfer>> {
        let transfers = self
            .get_transfers(GetTransfersParams::new().with_ids([transfer_id]))
            .await?;
        Ok(transfers.into_iter().find(|t| t.transfer_id == transfer_id))
    }

    // =========================================================================
    // Balance and rate endpoints
    // =========================================================================

    /// Get the app balance in every currency.
    pub async fn get_balances(&self) -> ApiResult<Vec<Balance>> {
        self.call("getBalance", &()).await
    }

    /// Get the app balance in one currency.
    pub async fn get_balance(&self, currency_code: &str) -> ApiResult<Option<Balance>> {
        let balances = self.get_balances().await?;
        Ok(balances.into_iter().find(|b| b.currency_code == currency_code))
    }

    /// Get exchange rates of supported currencies.
    pub async fn get_exchange_rates(&self) -> ApiResult<Vec<ExchangeRate>> {
        self.call("getExchangeRates", &()).await
    }

    /// Get the rate of `source` valued in `target`.
    pub async fn get_exchange_rate(&self, source: &str, target: &str) -> ApiResult<Option<ExchangeRate>> {
        let rates = self.get_exchange_rates().await?;
        Ok(rates
            .into_iter()
            .find(|r| r.source == source && r.target == target))
    }

    // =========================================================================
    // Currency endpoints
    // =========================================================================

    /// Get supported currencies matching `filter`.
    pub async fn get_currencies(&self, filter: CurrencyFilter) -> ApiResult<Vec<Currency>> {
        let currencies: Vec<Currency> = self.call("getCurrencies", &()).await?;
        Ok(currencies.into_iter().filter(|c| filter.matches(c)).collect())
    }

    /// Get a supported currency by code.
    pub async fn get_currency(&self, code: &str) -> ApiResult<Option<Currency>> {
        let currencies = self.get_currencies(CurrencyFilter::default()).await?;
        Ok(currencies.into_iter().find(|c| c.code == code))
    }
}
