//! Networks the deployer can target. Three fixed networks, each with its own
//! RPC endpoint, address prefix and currency symbol.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    #[default]
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Mainnet, Network::Testnet, Network::Regtest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "bitcoin" => Some(Network::Mainnet),
            "testnet" => Some(Network::Testnet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Default OP_NET JSON-RPC endpoint.
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.opnet.org",
            Network::Testnet => "https://testnet.opnet.org",
            Network::Regtest => "https://regtest.opnet.org",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Network::Mainnet => "BTC",
            Network::Testnet => "tBTC",
            Network::Regtest => "rBTC",
        }
    }

    /// Human-readable part of protocol (p2op) addresses.
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "op",
            Network::Testnet => "opt",
            Network::Regtest => "opr",
        }
    }

    pub fn address_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => "op1...",
            Network::Testnet => "opt1...",
            Network::Regtest => "opr1...",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Network::Mainnet => "Mainnet (op1...)",
            Network::Testnet => "Testnet (opt1...)",
            Network::Regtest => "Regtest (opr1...)",
        }
    }

    pub fn to_bitcoin(&self) -> bitcoin::Network {
        match self {
            Network::Mainnet => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Regtest => bitcoin::Network::Regtest,
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render satoshis as a fixed 8-decimal coin amount.
pub fn format_btc(sats: u64) -> String {
    format!("{}.{:08}", sats / 100_000_000, sats % 100_000_000)
}

/// Group an integer string with thousands separators.
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("{}{}", sign, out)
}
