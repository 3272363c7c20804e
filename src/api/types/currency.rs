//! Currency types for the Crypto Pay API.

use serde::{Deserialize, Serialize};

/// Currency supported by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    /// Operates on a blockchain
    pub is_blockchain: bool,
    /// Is a stablecoin
    pub is_stablecoin: bool,
    /// Is a fiat currency
    pub is_fiat: bool,
    /// Currency name
    pub name: String,
    /// Currency code
    pub code: String,
    /// Information URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Decimal places for fractional amounts
    pub decimals: u32,
}

/// Local filter applied to the `getCurrencies` list.
///
/// Every set flag must equal the currency's flag for it to match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyFilter {
    pub is_blockchain: Option<bool>,
    pub is_stablecoin: Option<bool>,
    pub is_fiat: Option<bool>,
}

impl CurrencyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blockchain(mut self, value: bool) -> Self {
        self.is_blockchain = Some(value);
        self
    }

    pub fn stablecoin(mut self, value: bool) -> Self {
        self.is_stablecoin = Some(value);
        self
    }

    pub fn fiat(mut self, value: bool) -> Self {
        self.is_fiat = Some(value);
        self
    }

    pub fn matches(&self, currency: &Currency) -> bool {
        self.is_blockchain.map_or(true, |v| v == currency.is_blockchain)
            && self.is_stablecoin.map_or(true, |v| v == currency.is_stablecoin)
            && self.is_fiat.map_or(true, |v| v == currency.is_fiat)
    }
}
