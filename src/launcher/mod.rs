//! Launcher - stateful controller behind every surface
//!
//! Owns the wallet handle, the session and the current [`WorkflowState`].
//! Actions take `&mut self`, so a second deployment cannot start while one
//! is in flight.

mod config;

pub use config::*;

use tracing::info;

use crate::core::markup::strip_markup;
use crate::core::Network;
use crate::deploy::{
    Bytecode, CostEstimate, DeployError, DeployFailure, DeployForm, DeployObserver, DeployStep, DeploymentResult,
    NullObserver, Pacer, StepStatus, TokenPreview, WalletSession, Workflow, WorkflowState,
};
use crate::rpc::RpcConnector;
use crate::wallet::WalletProvider;

pub struct Launcher<W, C, P> {
    wallet: Option<W>,
    workflow: Workflow<C, P>,
    session: Option<WalletSession>,
    state: WorkflowState,
    upload: Option<Bytecode>,
    last_result: Option<DeploymentResult>,
    observer: Box<dyn DeployObserver>,
}

impl<W, C, P> Launcher<W, C, P>
where
    W: WalletProvider,
    C: RpcConnector,
    P: Pacer,
{
    /// `wallet` is `None` when no extension was detected.
    pub fn new(wallet: Option<W>, rpc: C, pacer: P, config: LauncherConfig) -> Self {
        Self {
            wallet,
            workflow: Workflow::new(config, rpc, pacer),
            session: None,
            state: WorkflowState::Disconnected,
            upload: None,
            last_result: None,
            observer: Box::new(NullObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn DeployObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn set_observer(&mut self, observer: Box<dyn DeployObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &LauncherConfig {
        self.workflow.config()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn last_result(&self) -> Option<&DeploymentResult> {
        self.last_result.as_ref()
    }

    pub fn upload(&self) -> Option<&Bytecode> {
        self.upload.as_ref()
    }

    pub async fn connect(&mut self) -> Result<&WalletSession, DeployFailure> {
        match self.workflow.connect(self.wallet.as_ref()).await {
            Ok(session) => {
                self.set_state(WorkflowState::Connected);
                Ok(self.session.insert(session))
            }
            Err(e) => Err(self.fail(&e, Network::default())),
        }
    }

    /// Drop the session. The next connect resolves everything again.
    pub fn disconnect(&mut self) {
        if self.session.take().is_some() {
            info!("Wallet disconnected");
        }
        self.set_state(WorkflowState::Disconnected);
    }

    /// Connect when disconnected, disconnect otherwise. Returns whether a
    /// session exists afterwards.
    pub async fn toggle_wallet(&mut self) -> Result<bool, DeployFailure> {
        if self.is_connected() {
            self.disconnect();
            Ok(false)
        } else {
            self.connect().await.map(|_| true)
        }
    }

    /// Re-read the wallet balance; `None` when not connected.
    pub async fn refresh_balance(&mut self) -> Option<u64> {
        let (Some(wallet), Some(session)) = (self.wallet.as_ref(), self.session.as_mut()) else {
            return None;
        };
        Some(self.workflow.refresh_balance(wallet, session).await)
    }

    /// Use uploaded bytecode instead of the default artifact.
    pub fn set_upload(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<usize, DeployFailure> {
        match Bytecode::from_upload(file_name, bytes) {
            Ok(bytecode) => {
                let len = bytecode.len();
                info!("Custom bytecode loaded: {} ({} bytes)", file_name, len);
                self.upload = Some(bytecode);
                Ok(len)
            }
            Err(e) => {
                self.upload = None;
                Err(self.fail(&e, Network::default()))
            }
        }
    }

    pub fn clear_upload(&mut self) {
        self.upload = None;
    }

    pub fn preview(&self, form: &DeployForm) -> TokenPreview {
        TokenPreview::from_form(form)
    }

    pub fn estimate(&self, network: Network, mintable: bool, pausable: bool) -> CostEstimate {
        let config = self.config();
        CostEstimate::new(network, mintable, pausable, config.platform_fee_sats, config.max_spend_sats)
    }

    pub async fn deploy(&mut self, form: &DeployForm, network: Network) -> Result<DeploymentResult, DeployFailure> {
        let (Some(wallet), Some(session)) = (self.wallet.as_ref(), self.session.as_mut()) else {
            return Err(self.fail(&DeployError::NotConnected, network));
        };

        let mut tracked = Tracked { state: &mut self.state, inner: self.observer.as_mut() };
        let outcome = self
            .workflow
            .deploy(wallet, session, form, network, self.upload.as_ref(), &mut tracked)
            .await;

        match outcome {
            Ok(result) => {
                self.last_result = Some(result.clone());
                Ok(result)
            }
            Err(e) => Err(self.fail(&e, network)),
        }
    }

    fn fail(&mut self, error: &DeployError, network: Network) -> DeployFailure {
        let balance = self.session.as_ref().map(|s| s.balance_sats).unwrap_or(0);
        let failure = DeployFailure::from_error(error, balance, network);
        tracing::error!("{}", strip_markup(&failure.message));
        self.set_state(WorkflowState::Error(failure.clone()));
        failure
    }

    fn set_state(&mut self, state: WorkflowState) {
        self.observer.on_state(&state);
        self.state = state;
    }
}

/// Forwards progress while keeping the launcher's state current.
struct Tracked<'a> {
    state: &'a mut WorkflowState,
    inner: &'a mut dyn DeployObserver,
}

impl DeployObserver for Tracked<'_> {
    fn on_state(&mut self, state: &WorkflowState) {
        *self.state = state.clone();
        self.inner.on_state(state);
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        self.inner.on_step(step, status);
    }

    fn on_reset(&mut self) {
        self.inner.on_reset();
    }
}
