//! Tokenlaunch: OP-20 token deployer for OP_NET on Bitcoin L1.
//!
//! Keys, signing and UTXO selection stay in the OP_WALLET extension; the
//! OP_NET node answers key lookups and simulations. This crate drives the
//! deployment between them and owns the calldata.
//!
//! # Architecture
//!
//! ```text
//! Launcher (entry point, holds WalletSession + WorkflowState)
//!   │
//!   ├── Workflow
//!   │     ├── WalletProvider ──web3()──▶ Web3Provider (sign + broadcast)
//!   │     ├── RpcConnector ──▶ RpcProvider (btc_publicKeyInfo, btc_call)
//!   │     └── Pacer (step display delays)
//!   │
//!   ├── abi (deployToken / TokenDeployed / mint / burn)
//!   │     └── core::codec (BinaryWriter, BinaryReader)
//!   │
//!   └── contract::MintableToken (template state model)
//! ```
//!
//! # Deployment routes
//!
//! | Route | When | Wallet call |
//! |-------|------|-------------|
//! | Factory | factory configured and sender resolved | `send_interaction(deployToken)` |
//! | Direct | otherwise | `deploy_contract(bytecode, calldata)` |
//!
//! # Features
//!
//! - `native` - CLI, reqwest JSON-RPC, tokio pacing, tracing subscriber
//! - `wasm` - Browser bindings over `window.opnet` and `fetch`
//!
//! # Usage
//!
//! ```ignore
//! use tokenlaunch::{DeployForm, JsonRpcConnector, Launcher, LauncherConfig, Network, TokioPacer};
//!
//! let mut launcher = Launcher::new(Some(wallet), JsonRpcConnector, TokioPacer, LauncherConfig::from_env());
//! launcher.connect().await?;
//! let result = launcher.deploy(&DeployForm::new("Moon", "MOON", "21000000"), Network::Regtest).await?;
//! println!("{}", result.explorer_url());
//! ```

// =============================================================================
// Shared modules (compile everywhere)
// =============================================================================
pub mod abi;
pub mod contract;
pub mod core;
pub mod deploy;
pub mod launcher;
pub mod rpc;
pub mod wallet;

// =============================================================================
// Native-only modules (CLI, tokio)
// =============================================================================
#[cfg(feature = "native")]
pub mod logging;

// =============================================================================
// WASM-only modules (browser, wasm-bindgen)
// =============================================================================
#[cfg(feature = "wasm")]
pub mod wasm;

// =============================================================================
// Re-exports: Shared
// =============================================================================
pub use abi::{AbiError, DeployTokenArgs, TokenCall, TokenDeployed, TokenInit};
pub use contract::{MintableToken, TokenError};
pub use core::{Address, BinaryReader, BinaryWriter, CodecError, Network, U256};
pub use deploy::{
    CostEstimate, DeployError, DeployFailure, DeployForm, DeployObserver, DeployStep, DeploymentResult, ErrorKind,
    NoPacing, Pacer, Pacing, TokenPreview, WalletSession, WorkflowState,
};
pub use launcher::{Launcher, LauncherConfig};
pub use rpc::{RpcConnector, RpcError, RpcProvider};
pub use wallet::{WalletError, WalletProvider, Web3Provider};

// =============================================================================
// Re-exports: Native
// =============================================================================
#[cfg(feature = "native")]
pub use deploy::TokioPacer;
#[cfg(feature = "native")]
pub use rpc::{JsonRpcConnector, JsonRpcProvider};

// =============================================================================
// Re-exports: WASM
// =============================================================================
#[cfg(feature = "wasm")]
pub use wasm::{OpWallet, TokenLauncher};
