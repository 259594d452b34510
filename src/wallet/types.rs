//! Values exchanged with the wallet extension.

use serde::{Deserialize, Serialize};

use crate::core::{Address, Network};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The user declined the request in the extension.
    #[error("{0}")]
    Rejected(String),
    #[error("{0} is not supported by this wallet")]
    Unsupported(&'static str),
    #[error("{0}")]
    Other(String),
}

pub type WalletResult<T> = Result<T, WalletError>;

/// Balance as reported by the extension: a bare amount or a breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WalletBalance {
    Sats(u64),
    Detailed {
        total: Option<u64>,
        confirmed: Option<u64>,
        confirmed_satoshi: Option<u64>,
    },
}

impl WalletBalance {
    /// First non-zero of total, confirmed, confirmed_satoshi.
    pub fn sats(&self) -> u64 {
        match self {
            WalletBalance::Sats(v) => *v,
            WalletBalance::Detailed { total, confirmed, confirmed_satoshi } => [total, confirmed, confirmed_satoshi]
                .into_iter()
                .flatten()
                .copied()
                .find(|v| *v != 0)
                .unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utxo {
    #[serde(alias = "txid")]
    pub transaction_id: String,
    #[serde(alias = "vout")]
    pub output_index: u32,
    pub value: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_pub_key: Option<String>,
}

/// Extra output attached to a deployment (platform fee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentOutput {
    pub address: String,
    pub value: u64,
}

/// Direct bytecode deployment handed to the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContractRequest {
    pub bytecode: Vec<u8>,
    pub calldata: Vec<u8>,
    pub fee_rate: u64,
    pub priority_fee: u64,
    pub gas_sat_fee: u64,
    #[serde(rename = "revealMLDSAPublicKey")]
    pub reveal_mldsa_public_key: bool,
    #[serde(rename = "linkMLDSAPublicKeyToAddress")]
    pub link_mldsa_public_key_to_address: bool,
    pub network: Network,
    pub maximum_allowed_sat_to_spend: u64,
    pub optional_outputs: Vec<PaymentOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utxos: Option<Vec<Utxo>>,
}

/// Funding and reveal transactions produced by a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContractResponse {
    pub contract_address: Option<String>,
    pub funding_transaction: Option<String>,
    pub reveal_transaction: Option<String>,
}

/// Contract interaction (factory `deployToken`) to sign and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRequest {
    pub to: String,
    pub calldata: Vec<u8>,
    pub from: Address,
    pub refund_to: String,
    pub fee_rate: u64,
    pub maximum_allowed_sat_to_spend: u64,
    pub optional_outputs: Vec<PaymentOutput>,
    pub network: Network,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionReceipt {
    pub transaction_id: Option<String>,
}
