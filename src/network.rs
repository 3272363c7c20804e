//! Network and protocol selection for the Crypto Pay API.

use serde::{Deserialize, Serialize};

/// Mainnet API hostname.
pub const MAINNET_HOST: &str = "pay.crypt.bot";

/// Testnet API hostname.
pub const TESTNET_HOST: &str = "testnet-pay.crypt.bot";

/// Header carrying the app token on outgoing requests.
pub const API_TOKEN_HEADER: &str = "Crypto-Pay-API-Token";

/// Header carrying the HMAC signature on incoming webhook requests.
pub const SIGNATURE_HEADER: &str = "crypto-pay-api-signature";

/// Default port for the webhook listener.
pub const DEFAULT_WEBHOOK_PORT: u16 = 3000;

/// Blockchain network mode. Selects the API hostname.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// API hostname for this network.
    pub fn hostname(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_HOST,
            Self::Testnet => TESTNET_HOST,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network '{}' (expected mainnet or testnet)", other)),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Protocol of sent requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
