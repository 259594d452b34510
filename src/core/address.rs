//! Protocol addresses: 32-byte account identifiers.
//!
//! A wallet hands us either the 32-byte hashed key directly (hex) or the full
//! MLDSA public key, which is reduced to its SHA-256 digest.

use bitcoin::bech32::{segwit, Fe32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::network::Network;

pub const ADDRESS_LEN: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty public key")]
    Empty,
    #[error("invalid hex: {0}")]
    Hex(String),
    #[error("bech32 encoding failed: {0}")]
    Encoding(String),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn zero() -> Self {
        Self([0u8; ADDRESS_LEN])
    }

    /// Parse a hex key (with or without `0x`). 32 bytes are taken verbatim,
    /// anything longer is treated as a raw public key and hashed.
    pub fn from_hex(value: &str) -> Result<Self, AddressError> {
        let trimmed = value.trim();
        let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if raw.is_empty() {
            return Err(AddressError::Empty);
        }
        let bytes = hex::decode(raw).map_err(|e| AddressError::Hex(e.to_string()))?;
        Ok(Self::from_public_key(&bytes))
    }

    pub fn from_public_key(bytes: &[u8]) -> Self {
        if bytes.len() == ADDRESS_LEN {
            let mut out = [0u8; ADDRESS_LEN];
            out.copy_from_slice(bytes);
            return Self(out);
        }
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; ADDRESS_LEN];
        out.copy_from_slice(&digest);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Witness-v16 bech32m rendering with the network's `op`/`opt`/`opr` prefix.
    pub fn p2op(&self, network: Network) -> Result<String, AddressError> {
        let hrp = Hrp::parse(network.hrp()).map_err(|e| AddressError::Encoding(e.to_string()))?;
        segwit::encode(hrp, Fe32::S, &self.0).map_err(|e| AddressError::Encoding(e.to_string()))
    }

    /// Shortened display form: first 8 and last 6 characters.
    pub fn abbreviate(value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() <= 14 {
            return value.to_string();
        }
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
