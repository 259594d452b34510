//! Wallet module - OP_WALLET extension capability
//!
//! The deployer never holds keys. Everything that touches funds goes through
//! the extension: account access, balance, UTXOs and the `web3` signer.
//!
//! # Architecture
//!
//! ```text
//! WalletProvider
//!     │
//!     ├── request_accounts, get_network, get_balance, get_utxos
//!     │
//!     └── web3() → Web3Provider
//!                     │
//!                     ├── get_mldsa_public_key
//!                     ├── deploy_contract  → funding tx + reveal tx
//!                     └── send_interaction → factory deployToken
//! ```
//!
//! Browser builds bind these to `window.opnet` (see `wasm::OpWallet`).

mod provider;
mod types;

pub use provider::{WalletProvider, Web3Provider};
pub use types::{
    DeployContractRequest, DeployContractResponse, InteractionReceipt, InteractionRequest, PaymentOutput, Utxo,
    WalletBalance, WalletError, WalletResult,
};
