//! Connection and deployment sequences.
//!
//! Stateless over the session: the caller owns the [`WalletSession`] and
//! hands it in. Every collaborator call is awaited in order; nothing is
//! retried.

use tracing::{debug, info, warn};

use crate::core::{Address, Network};
use crate::launcher::LauncherConfig;
use crate::rpc::{ContractCall, RpcConnector, RpcProvider};
use crate::wallet::{
    DeployContractRequest, InteractionRequest, PaymentOutput, Utxo, WalletProvider, Web3Provider,
};

use super::error::DeployError;
use super::params::{DeployForm, DeployParams};
use super::progress::{DeployObserver, DeployStep, Pacer, StepStatus, WorkflowState};
use super::route::{Bytecode, DeploymentResult, DeploymentRoute, RouteKind};
use super::session::WalletSession;

/// Network assumed until the wallet says otherwise.
pub const DEFAULT_WALLET_NETWORK: &str = "regtest";

pub struct Workflow<C, P> {
    config: LauncherConfig,
    rpc: C,
    pacer: P,
}

impl<C: RpcConnector, P: Pacer> Workflow<C, P> {
    pub fn new(config: LauncherConfig, rpc: C, pacer: P) -> Self {
        Self { config, rpc, pacer }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    fn provider(&self, network: Network) -> Result<C::Provider, DeployError> {
        Ok(self.rpc.connect(network, &self.config.rpc_url_for(network))?)
    }

    /// Connect and resolve the account's protocol address.
    ///
    /// Resolution order: wallet MLDSA key, then the node's public-key record,
    /// then the raw Bitcoin address for display only.
    pub async fn connect<W>(&self, wallet: Option<&W>) -> Result<WalletSession, DeployError>
    where
        W: WalletProvider + ?Sized,
    {
        let wallet = wallet.ok_or(DeployError::WalletNotFound)?;

        let accounts = wallet.request_accounts().await.map_err(|e| DeployError::ConnectFailed(e.to_string()))?;
        let bitcoin_address = accounts
            .into_iter()
            .next()
            .ok_or_else(|| DeployError::ConnectFailed("no accounts returned".to_string()))?;

        let wallet_network = match wallet.get_network().await {
            Ok(network) => network,
            Err(e) => {
                warn!("Could not fetch network: {}", e);
                DEFAULT_WALLET_NETWORK.to_string()
            }
        };

        let mut session = WalletSession::new(bitcoin_address, wallet_network);
        if let Some(web3) = wallet.web3() {
            match wallet_key(web3).await {
                Ok(sender) => {
                    session.resolve(sender);
                    info!("Resolved MLDSA key from wallet: {}", session.protocol_address);
                }
                Err(e) => {
                    warn!("Could not get MLDSA public key from wallet, trying RPC: {}", e);
                    self.resolve_via_rpc(&mut session).await;
                }
            }
        }

        self.refresh_balance(wallet, &mut session).await;
        info!("Wallet connected: {} on {}", session.short_address(), session.wallet_network);
        Ok(session)
    }

    async fn resolve_via_rpc(&self, session: &mut WalletSession) {
        let lookup = match self.provider(session.network()) {
            Ok(provider) => provider.get_public_key_info(&session.bitcoin_address).await.map_err(DeployError::from),
            Err(e) => Err(e),
        };
        match lookup {
            Ok(Some(sender)) => session.resolve(sender),
            Ok(None) => debug!("No public key record for {}", session.bitcoin_address),
            Err(e) => warn!("RPC resolution failed as well: {}", e),
        }
    }

    /// Update the session balance. Failures keep the previous value.
    pub async fn refresh_balance<W>(&self, wallet: &W, session: &mut WalletSession) -> u64
    where
        W: WalletProvider + ?Sized,
    {
        match wallet.get_balance().await {
            Ok(balance) => session.balance_sats = balance.sats(),
            Err(e) => warn!("Could not fetch balance: {}", e),
        }
        session.balance_sats
    }

    /// Run one deployment attempt.
    pub async fn deploy<W>(
        &self,
        wallet: &W,
        session: &mut WalletSession,
        form: &DeployForm,
        network: Network,
        upload: Option<&Bytecode>,
        observer: &mut dyn DeployObserver,
    ) -> Result<DeploymentResult, DeployError>
    where
        W: WalletProvider + ?Sized,
    {
        let params = form.validate()?;
        observer.on_reset();

        observer.on_state(&WorkflowState::Preparing);
        self.step(DeployStep::PrepareCalldata, observer).await;
        let sender = self.resolve_sender(wallet, session).await?;
        let calldata = params.token_init(sender).encode()?;
        debug!("Calldata prepared (hex): {}", hex::encode(&calldata));
        let route = self.select_route(session, upload);
        info!("Deploying {} ({}) via {:?} route", params.name, params.symbol, route.kind());

        observer.on_state(&WorkflowState::Simulating);
        self.step(DeployStep::SignAndSimulate, observer).await;
        let web3 = wallet.web3().ok_or(DeployError::Web3Unavailable)?;
        if Network::from_name(&session.wallet_network) != Some(network) {
            return Err(DeployError::NetworkMismatch { wallet: session.wallet_network.clone(), selected: network });
        }
        if self.refresh_balance(wallet, session).await == 0 {
            return Err(DeployError::InsufficientFunds { network });
        }
        let utxos = detected_utxos(wallet, &session.bitcoin_address).await;
        let fee_output: Vec<PaymentOutput> = self.config.platform_fee_output(network).into_iter().collect();

        let result = match route {
            DeploymentRoute::Factory { factory, sender } => {
                let token_address = self.simulate_factory(&factory, sender, &params, network).await?;
                let calldata = params.factory_args(sender).encode()?;
                observer.on_state(&WorkflowState::Submitting);
                let receipt = web3
                    .send_interaction(InteractionRequest {
                        to: factory,
                        calldata,
                        from: sender,
                        refund_to: session.bitcoin_address.clone(),
                        fee_rate: self.config.fee_rate,
                        maximum_allowed_sat_to_spend: self.config.max_spend_sats,
                        optional_outputs: fee_output,
                        network,
                    })
                    .await?;
                DeploymentResult {
                    contract_address: token_address,
                    funding_txid: None,
                    reveal_txid: non_empty_txid(receipt.transaction_id)?,
                    route: RouteKind::Factory,
                }
            }
            DeploymentRoute::Direct { upload } => {
                let bytecode = self.load_bytecode(upload).await?;
                observer.on_state(&WorkflowState::Submitting);
                let response = web3
                    .deploy_contract(DeployContractRequest {
                        bytecode: bytecode.as_bytes().to_vec(),
                        calldata,
                        fee_rate: self.config.fee_rate,
                        priority_fee: self.config.priority_fee,
                        gas_sat_fee: self.config.gas_sat_fee,
                        reveal_mldsa_public_key: true,
                        link_mldsa_public_key_to_address: true,
                        network,
                        maximum_allowed_sat_to_spend: self.config.max_spend_sats,
                        optional_outputs: fee_output,
                        utxos,
                    })
                    .await?;
                DeploymentResult {
                    contract_address: response.contract_address.filter(|a| !a.is_empty()),
                    funding_txid: response.funding_transaction.filter(|t| !t.is_empty()),
                    reveal_txid: non_empty_txid(response.reveal_transaction)?,
                    route: RouteKind::Direct,
                }
            }
        };

        observer.on_state(&WorkflowState::Confirming);
        self.step(DeployStep::Broadcast, observer).await;
        self.step(DeployStep::Confirm, observer).await;
        observer.on_state(&WorkflowState::Done);
        info!("Deployment broadcast: {} ({})", result.reveal_txid, result.contract_display());
        Ok(result)
    }

    async fn step(&self, step: DeployStep, observer: &mut dyn DeployObserver) {
        observer.on_step(step, StepStatus::Active);
        self.pacer.pause(self.config.pacing.delay(step)).await;
        observer.on_step(step, StepStatus::Done);
    }

    /// Sender from the session, asking the wallet again when it was not
    /// resolved at connect time. A key found here is kept in the session.
    async fn resolve_sender<W>(&self, wallet: &W, session: &mut WalletSession) -> Result<Address, DeployError>
    where
        W: WalletProvider + ?Sized,
    {
        if let Some(sender) = session.sender {
            return Ok(sender);
        }
        let web3 = wallet.web3().ok_or(DeployError::PublicKeyUnresolved)?;
        match wallet_key(web3).await {
            Ok(sender) => {
                session.resolve(sender);
                Ok(sender)
            }
            Err(e) => {
                warn!("MLDSA key retry failed: {}", e);
                Err(DeployError::PublicKeyUnresolved)
            }
        }
    }

    fn select_route(&self, session: &WalletSession, upload: Option<&Bytecode>) -> DeploymentRoute {
        match (self.config.factory.as_ref(), session.sender) {
            (Some(factory), Some(sender)) => DeploymentRoute::Factory { factory: factory.clone(), sender },
            _ => DeploymentRoute::Direct { upload: upload.cloned() },
        }
    }

    async fn load_bytecode(&self, upload: Option<Bytecode>) -> Result<Bytecode, DeployError> {
        if let Some(bytecode) = upload {
            return Ok(bytecode);
        }
        let location = self.config.default_artifact.as_ref().ok_or(DeployError::ArtifactMissing)?;
        let bytecode = location.load().await?;
        debug!("Loaded default artifact ({} bytes)", bytecode.len());
        Ok(bytecode)
    }

    /// Dry-run `deployToken`; returns the announced token address, if any.
    async fn simulate_factory(
        &self,
        factory: &str,
        sender: Address,
        params: &DeployParams,
        network: Network,
    ) -> Result<Option<String>, DeployError> {
        let call = ContractCall { to: factory.to_string(), calldata: params.factory_args(sender).encode()?, from: Some(sender) };
        let simulation = self.provider(network)?.simulate(&call).await?;
        if let Some(reason) = simulation.revert {
            return Err(DeployError::SimulationReverted(reason));
        }
        let announced = simulation.token_deployed().map(|event| match event.token_address.p2op(network) {
            Ok(p2op) => p2op,
            Err(_) => event.token_address.to_hex(),
        });
        if announced.is_none() {
            debug!("Simulation announced no TokenDeployed event; address pending");
        }
        Ok(announced)
    }
}

async fn wallet_key(web3: &dyn Web3Provider) -> Result<Address, String> {
    let key = web3.get_mldsa_public_key().await.map_err(|e| e.to_string())?;
    Address::from_hex(&key).map_err(|e| e.to_string())
}

async fn detected_utxos<W>(wallet: &W, address: &str) -> Option<Vec<Utxo>>
where
    W: WalletProvider + ?Sized,
{
    match wallet.get_utxos(address).await {
        Ok(utxos) if !utxos.is_empty() => Some(utxos),
        Ok(_) => None,
        Err(e) => {
            debug!("UTXO listing unavailable: {}", e);
            None
        }
    }
}

fn non_empty_txid(txid: Option<String>) -> Result<String, DeployError> {
    txid.filter(|t| !t.is_empty()).ok_or(DeployError::Rejected)
}
