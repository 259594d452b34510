//! Deployment errors and the messages shown for them.

use serde::Serialize;

use crate::core::{format_btc, CodecError, Network};
use crate::rpc::RpcError;
use crate::wallet::WalletError;

use super::params::ValidationError;

/// Coarse classification for surfaces that style errors differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CapabilityMissing,
    Validation,
    NetworkState,
    SimulationRevert,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeployError {
    #[error("OP_WALLET not found! Please install the extension.")]
    WalletNotFound,
    #[error("Failed to connect wallet: {0}")]
    ConnectFailed(String),
    #[error("Wallet not connected. Please connect OP_WALLET first.")]
    NotConnected,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("OP_WALLET Web3 provider not found.")]
    Web3Unavailable,
    #[error(
        "Could not resolve your wallet's public key (MLDSA). Please ensure you have funded your account and at least one transaction has confirmed."
    )]
    PublicKeyUnresolved,
    #[error(
        "Wallet network mismatch! Your wallet is currently on **{}**, but you selected **{}**. Please switch your wallet settings to **{}** (which uses {} addresses).",
        .wallet.to_uppercase(),
        .selected.as_str().to_uppercase(),
        .selected.as_str().to_uppercase(),
        .selected.address_prefix()
    )]
    NetworkMismatch { wallet: String, selected: Network },
    #[error(
        "Insufficient funds. Your wallet shows **0 balance** on **{}**. Please ensure you have {} in your **{}** address to pay for gas.",
        .network.as_str().to_uppercase(),
        .network.symbol(),
        .network.address_prefix()
    )]
    InsufficientFunds { network: Network },
    #[error("Simulation failed: {0}")]
    SimulationReverted(String),
    #[error("Could not find compiled contract WASM. Run \"npm run build\" first.")]
    ArtifactMissing,
    #[error("Please upload a valid .wasm file.")]
    InvalidUpload,
    #[error("Deployment rejected or failed.")]
    Rejected,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::WalletNotFound | DeployError::Web3Unavailable | DeployError::ArtifactMissing => {
                ErrorKind::CapabilityMissing
            }
            DeployError::NotConnected | DeployError::Validation(_) | DeployError::InvalidUpload => {
                ErrorKind::Validation
            }
            DeployError::ConnectFailed(_)
            | DeployError::PublicKeyUnresolved
            | DeployError::NetworkMismatch { .. }
            | DeployError::InsufficientFunds { .. } => ErrorKind::NetworkState,
            DeployError::SimulationReverted(_) => ErrorKind::SimulationRevert,
            DeployError::Rejected | DeployError::Codec(_) | DeployError::Rpc(_) | DeployError::Wallet(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Raised before an attempt starts; shown without the failure prefix.
    fn is_precondition(&self) -> bool {
        matches!(
            self,
            DeployError::WalletNotFound
                | DeployError::ConnectFailed(_)
                | DeployError::NotConnected
                | DeployError::Validation(_)
                | DeployError::InvalidUpload
        )
    }
}

/// What the user sees when an action fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl DeployFailure {
    /// Build the displayed failure. `balance_sats` and `network` feed the
    /// UTXO guidance when the wallet reports it has nothing spendable.
    pub fn from_error(error: &DeployError, balance_sats: u64, network: Network) -> Self {
        let raw = error.to_string();
        let (kind, body) = if mentions_missing_utxos(&raw) {
            (ErrorKind::NetworkState, utxo_troubleshooting(balance_sats, network))
        } else {
            (error.kind(), raw)
        };
        let message = if error.is_precondition() { body } else { format!("Deployment failed: {}", body) };
        Self { kind, message }
    }

    pub fn html(&self) -> String {
        crate::core::markup::render_markup(&self.message)
    }
}

impl std::fmt::Display for DeployFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

pub fn mentions_missing_utxos(message: &str) -> bool {
    message.to_lowercase().contains("no utxos")
}

/// Guidance for a funded wallet whose outputs the signer cannot use.
pub fn utxo_troubleshooting(balance_sats: u64, network: Network) -> String {
    let symbol = network.symbol();
    let prefix = network.address_prefix();
    format!(
        "**UTXO Sync Issue Detected:**\n\
         You have **{} {}**, but the wallet cannot \"see\" them for deployment. This is common when:\n\
         1. **Confirmations**: Your faucet funds are still in the mempool (0/1 confirmations). Wait ~10 minutes for a block.\n\
         2. **Address Type**: Ensure you sent faucet funds to your **Taproot / OPNet ({})** address, not Segwit (bc1q...).\n\
         3. **Dust**: If you have many tiny UTXOs, the wallet might fail to group them. Try sending your total balance to yourself in one transaction to \"consolidate\" them.",
        format_btc(balance_sats),
        symbol,
        prefix
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_networks() {
        let err = DeployError::NetworkMismatch { wallet: "testnet".into(), selected: Network::Regtest };
        let msg = err.to_string();
        assert!(msg.contains("**TESTNET**"));
        assert!(msg.contains("**REGTEST**"));
        assert!(msg.contains("opr1..."));
        assert_eq!(err.kind(), ErrorKind::NetworkState);
    }

    #[test]
    fn insufficient_funds_names_symbol_and_prefix() {
        let msg = DeployError::InsufficientFunds { network: Network::Testnet }.to_string();
        assert!(msg.contains("**TESTNET**"));
        assert!(msg.contains("tBTC"));
        assert!(msg.contains("**opt1...**"));
    }

    #[test]
    fn failure_prefix_only_for_attempt_errors() {
        let f = DeployFailure::from_error(&DeployError::NotConnected, 0, Network::Regtest);
        assert_eq!(f.message, "Wallet not connected. Please connect OP_WALLET first.");
        let f = DeployFailure::from_error(&DeployError::Rejected, 0, Network::Regtest);
        assert_eq!(f.message, "Deployment failed: Deployment rejected or failed.");
        assert_eq!(f.kind, ErrorKind::Unexpected);
    }

    #[test]
    fn no_utxos_any_case_becomes_guidance() {
        let err = DeployError::Wallet(WalletError::Other("Error: No UTXOs available".into()));
        let f = DeployFailure::from_error(&err, 150_000, Network::Regtest);
        assert_eq!(f.kind, ErrorKind::NetworkState);
        assert!(f.message.starts_with("Deployment failed: **UTXO Sync Issue Detected:**"));
        assert!(f.message.contains("0.00150000 rBTC"));
        assert!(f.message.contains("opr1..."));
    }

    #[test]
    fn html_renders_bold() {
        let f = DeployFailure::from_error(&DeployError::InsufficientFunds { network: Network::Mainnet }, 0, Network::Mainnet);
        assert!(f.html().contains("<strong>0 balance</strong>"));
    }
}
