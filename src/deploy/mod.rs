//! Deploy module - the token deployment workflow
//!
//! # State machine
//!
//! ```text
//! Disconnected ──connect──▶ Connected ──deploy──▶ Preparing ──▶ Simulating
//!                                                                 │
//!        Done ◀── Confirming ◀── Submitting ◀────────────────────┘
//!
//!   any non-terminal state ──▶ Error(DeployFailure)
//! ```
//!
//! Preparing validates input, resolves the sender and picks the
//! [`DeploymentRoute`]. Simulating checks network, balance and (factory
//! route) dry-runs `deployToken`; the direct route loads its bytecode only
//! after those checks. Submitting hands the request to the wallet
//! signer. Confirming only advances the progress display.

mod error;
mod params;
mod preview;
mod progress;
mod route;
mod session;
mod workflow;

pub use error::{mentions_missing_utxos, utxo_troubleshooting, DeployError, DeployFailure, ErrorKind};
pub use params::{DeployForm, DeployParams, ValidationError, DEFAULT_DECIMALS};
pub use preview::{CostEstimate, TokenPreview};
#[cfg(feature = "native")]
pub use progress::TokioPacer;
pub use progress::{
    DeployObserver, DeployStep, NoPacing, NullObserver, Pacer, Pacing, RecordingObserver, StepStatus, WorkflowState,
};
pub use route::{ArtifactLocation, Bytecode, DeploymentResult, DeploymentRoute, RouteKind, EXPLORER_TX_URL, PENDING_ADDRESS};
pub use session::WalletSession;
pub use workflow::{Workflow, DEFAULT_WALLET_NETWORK};
