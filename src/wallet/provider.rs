//! Wallet capability traits.
//!
//! The extension is opaque to us: only the call sequence and field names
//! matter. Tests substitute deterministic fakes.

use async_trait::async_trait;

use super::types::*;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait WalletProvider {
    /// Prompt for account access; first entry is the active Bitcoin address.
    async fn request_accounts(&self) -> WalletResult<Vec<String>>;

    /// Network name the extension is currently on (`mainnet`, `testnet`, `regtest`).
    async fn get_network(&self) -> WalletResult<String>;

    async fn get_balance(&self) -> WalletResult<WalletBalance>;

    /// Spendable outputs for an address. Wallets without UTXO access return
    /// `WalletError::Unsupported`.
    async fn get_utxos(&self, address: &str) -> WalletResult<Vec<Utxo>>;

    /// Key retrieval and signing sub-capability, when the extension exposes it.
    fn web3(&self) -> Option<&dyn Web3Provider>;
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Web3Provider {
    /// Hex MLDSA public key (or its 32-byte hash) of the active account.
    async fn get_mldsa_public_key(&self) -> WalletResult<String>;

    /// Sign and publish the funding + reveal pair for a bytecode deployment.
    async fn deploy_contract(&self, request: DeployContractRequest) -> WalletResult<DeployContractResponse>;

    /// Sign and publish a contract interaction.
    async fn send_interaction(&self, request: InteractionRequest) -> WalletResult<InteractionReceipt>;
}
