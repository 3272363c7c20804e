//! Balance and exchange-rate types for the Crypto Pay API.

use serde::{Deserialize, Serialize};

/// App balance in one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code
    pub currency_code: String,
    /// Total available amount
    pub available: f64,
    /// Amount currently on hold
    pub onhold: f64,
}

/// Exchange rate of a source asset in a target currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Whether the rate is currently valid
    pub is_valid: bool,
    /// Whether `source` is a cryptocurrency
    #[serde(default)]
    pub is_crypto: bool,
    /// Whether `source` is a fiat currency
    #[serde(default)]
    pub is_fiat: bool,
    /// Source currency code
    pub source: String,
    /// Target currency code
    pub target: String,
    /// Rate of `source` valued in `target`
    pub rate: f64,
}
