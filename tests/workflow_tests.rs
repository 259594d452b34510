//! Launcher workflow against scripted wallet and node fakes.
//!
//! Run with: cargo test --test workflow_tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use tokenlaunch::abi::TokenDeployed;
use tokenlaunch::deploy::{
    DeployForm, DeployObserver, DeployStep, ErrorKind, NoPacing, RecordingObserver, RouteKind, StepStatus,
    WorkflowState, PENDING_ADDRESS,
};
use tokenlaunch::launcher::{Launcher, LauncherConfig};
use tokenlaunch::rpc::{
    ContractCall, RpcConnector, RpcProvider, RpcResult, SimulationEvent, SimulationResult,
};
use tokenlaunch::wallet::{
    DeployContractRequest, DeployContractResponse, InteractionReceipt, InteractionRequest, Utxo, WalletBalance,
    WalletError, WalletProvider, WalletResult, Web3Provider,
};
use tokenlaunch::{Address, Network};

const BTC_ADDRESS: &str = "bcrt1qzyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3lgth6c";
const FEE_ADDRESS: &str = "bcrt1qzyg3zyg3zyg3zyg3zyg3zyg3zyg3zyg3lgth6c";
const FACTORY: &str = "opr1factory";
const REVEAL_TXID: &str = "a1b2c3d4e5f60718293a4b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f90";
const FUNDING_TXID: &str = "ffeeddccbbaa99887766554433221100ffeeddccbbaa99887766554433221100";

fn sender_key() -> String {
    format!("0x{}", "ab".repeat(32))
}

fn sender() -> Address {
    Address::new([0xab; 32])
}

// ============================================================================
// Wallet fake
// ============================================================================

#[derive(Default)]
struct Calls {
    request_accounts: AtomicUsize,
    get_balance: AtomicUsize,
    get_utxos: AtomicUsize,
    get_key: AtomicUsize,
    deploy_contract: AtomicUsize,
    send_interaction: AtomicUsize,
    deploy_requests: Mutex<Vec<DeployContractRequest>>,
    interactions: Mutex<Vec<InteractionRequest>>,
}

impl Calls {
    fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    fn total(&self) -> usize {
        [
            &self.request_accounts,
            &self.get_balance,
            &self.get_utxos,
            &self.get_key,
            &self.deploy_contract,
            &self.send_interaction,
        ]
        .iter()
        .map(|c| Self::count(c))
        .sum()
    }
}

struct FakeWeb3 {
    calls: Arc<Calls>,
    /// Key lookups that fail before the key is returned.
    key_failures: AtomicUsize,
    key: Option<String>,
    deploy_response: WalletResult<DeployContractResponse>,
    receipt: WalletResult<InteractionReceipt>,
}

#[async_trait]
impl Web3Provider for FakeWeb3 {
    async fn get_mldsa_public_key(&self) -> WalletResult<String> {
        self.calls.get_key.fetch_add(1, Ordering::SeqCst);
        if self.key_failures.load(Ordering::SeqCst) > 0 {
            self.key_failures.fetch_sub(1, Ordering::SeqCst);
            return Err(WalletError::Other("MLDSA key not available".into()));
        }
        self.key.clone().ok_or_else(|| WalletError::Other("MLDSA key not available".into()))
    }

    async fn deploy_contract(&self, request: DeployContractRequest) -> WalletResult<DeployContractResponse> {
        self.calls.deploy_contract.fetch_add(1, Ordering::SeqCst);
        self.calls.deploy_requests.lock().unwrap().push(request);
        self.deploy_response.clone()
    }

    async fn send_interaction(&self, request: InteractionRequest) -> WalletResult<InteractionReceipt> {
        self.calls.send_interaction.fetch_add(1, Ordering::SeqCst);
        self.calls.interactions.lock().unwrap().push(request);
        self.receipt.clone()
    }
}

struct FakeWallet {
    calls: Arc<Calls>,
    network: String,
    balance: u64,
    utxos: WalletResult<Vec<Utxo>>,
    web3: Option<FakeWeb3>,
}

impl FakeWallet {
    fn new(network: &str, balance: u64) -> Self {
        let calls = Arc::new(Calls::default());
        let web3 = FakeWeb3 {
            calls: calls.clone(),
            key_failures: AtomicUsize::new(0),
            key: Some(sender_key()),
            deploy_response: Ok(DeployContractResponse {
                contract_address: Some("opr1contract".into()),
                funding_transaction: Some(FUNDING_TXID.into()),
                reveal_transaction: Some(REVEAL_TXID.into()),
            }),
            receipt: Ok(InteractionReceipt { transaction_id: Some(REVEAL_TXID.into()) }),
        };
        Self { calls, network: network.to_string(), balance, utxos: Ok(vec![]), web3: Some(web3) }
    }

    fn web3_mut(&mut self) -> &mut FakeWeb3 {
        self.web3.as_mut().unwrap()
    }

    fn without_key(mut self) -> Self {
        self.web3_mut().key = None;
        self
    }

    fn key_failing_once(self) -> Self {
        self.web3.as_ref().unwrap().key_failures.store(1, Ordering::SeqCst);
        self
    }

    fn with_deploy_response(mut self, response: WalletResult<DeployContractResponse>) -> Self {
        self.web3_mut().deploy_response = response;
        self
    }

    fn with_receipt(mut self, receipt: WalletResult<InteractionReceipt>) -> Self {
        self.web3_mut().receipt = receipt;
        self
    }

    fn with_utxos(mut self, utxos: Vec<Utxo>) -> Self {
        self.utxos = Ok(utxos);
        self
    }
}

#[async_trait]
impl WalletProvider for FakeWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        self.calls.request_accounts.fetch_add(1, Ordering::SeqCst);
        Ok(vec![BTC_ADDRESS.to_string()])
    }

    async fn get_network(&self) -> WalletResult<String> {
        Ok(self.network.clone())
    }

    async fn get_balance(&self) -> WalletResult<WalletBalance> {
        self.calls.get_balance.fetch_add(1, Ordering::SeqCst);
        Ok(WalletBalance::Sats(self.balance))
    }

    async fn get_utxos(&self, _address: &str) -> WalletResult<Vec<Utxo>> {
        self.calls.get_utxos.fetch_add(1, Ordering::SeqCst);
        self.utxos.clone()
    }

    fn web3(&self) -> Option<&dyn Web3Provider> {
        self.web3.as_ref().map(|w| w as &dyn Web3Provider)
    }
}

// ============================================================================
// Node fake
// ============================================================================

#[derive(Default)]
struct NodeState {
    lookups: AtomicUsize,
    simulations: AtomicUsize,
    key: Option<Address>,
    simulation: Mutex<SimulationResult>,
    urls: Mutex<Vec<String>>,
}

#[derive(Clone, Default)]
struct FakeNode(Arc<NodeState>);

impl FakeNode {
    fn with_key(key: Address) -> Self {
        Self(Arc::new(NodeState { key: Some(key), ..Default::default() }))
    }

    fn with_simulation(simulation: SimulationResult) -> Self {
        Self(Arc::new(NodeState { simulation: Mutex::new(simulation), ..Default::default() }))
    }

    fn lookups(&self) -> usize {
        self.0.lookups.load(Ordering::SeqCst)
    }

    fn simulations(&self) -> usize {
        self.0.simulations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RpcProvider for FakeNode {
    async fn get_public_key_info(&self, _address: &str) -> RpcResult<Option<Address>> {
        self.0.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.key)
    }

    async fn simulate(&self, _call: &ContractCall) -> RpcResult<SimulationResult> {
        self.0.simulations.fetch_add(1, Ordering::SeqCst);
        Ok(self.0.simulation.lock().unwrap().clone())
    }
}

impl RpcConnector for FakeNode {
    type Provider = FakeNode;

    fn connect(&self, _network: Network, url: &str) -> RpcResult<FakeNode> {
        self.0.urls.lock().unwrap().push(url.to_string());
        Ok(self.clone())
    }
}

/// Observer the test can read back after handing it to the launcher.
#[derive(Clone, Default)]
struct Shared(Arc<Mutex<RecordingObserver>>);

impl DeployObserver for Shared {
    fn on_state(&mut self, state: &WorkflowState) {
        self.0.lock().unwrap().on_state(state);
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        self.0.lock().unwrap().on_step(step, status);
    }

    fn on_reset(&mut self) {
        self.0.lock().unwrap().on_reset();
    }
}

type TestLauncher = Launcher<FakeWallet, FakeNode, NoPacing>;

fn launcher(wallet: FakeWallet, node: FakeNode, config: LauncherConfig) -> TestLauncher {
    Launcher::new(Some(wallet), node, NoPacing, config)
}

fn direct_config() -> LauncherConfig {
    LauncherConfig::new().with_default_artifact(tokenlaunch::deploy::ArtifactLocation::Bytes(vec![0x00, 0x61, 0x73, 0x6d]))
}

fn form() -> DeployForm {
    DeployForm::new("Moon", "MOON", "21000000")
}

fn token_deployed_event(token: Address) -> SimulationEvent {
    let data = TokenDeployed { deployer: sender(), token_address: token, name: "Moon".into(), symbol: "MOON".into() }
        .encode()
        .unwrap();
    SimulationEvent { event_type: "TokenDeployed".into(), contract: Some(FACTORY.into()), data }
}

// ============================================================================
// Connection
// ============================================================================

#[tokio::test]
async fn connect_without_extension_reports_missing_wallet() {
    let mut launcher: TestLauncher = Launcher::new(None, FakeNode::default(), NoPacing, LauncherConfig::new());
    let failure = launcher.connect().await.unwrap_err();
    assert_eq!(failure.message, "OP_WALLET not found! Please install the extension.");
    assert_eq!(failure.kind, ErrorKind::CapabilityMissing);
    assert!(!launcher.is_connected());
}

#[tokio::test]
async fn connect_resolves_wallet_key_first() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let node = FakeNode::default();
    let mut launcher = launcher(wallet, node.clone(), LauncherConfig::new());

    let session = launcher.connect().await.unwrap();
    assert_eq!(session.sender, Some(sender()));
    assert_eq!(session.protocol_address, sender().p2op(Network::Regtest).unwrap());
    assert!(session.protocol_address.starts_with("opr1"));
    assert_eq!(session.balance_sats, 50_000);
    assert_eq!(node.lookups(), 0);
    assert_eq!(launcher.state(), &WorkflowState::Connected);
}

#[tokio::test]
async fn connect_falls_back_to_node_record() {
    let wallet = FakeWallet::new("regtest", 50_000).without_key();
    let record = Address::new([0x42; 32]);
    let node = FakeNode::with_key(record);
    let mut launcher = launcher(wallet, node.clone(), LauncherConfig::new());

    let session = launcher.connect().await.unwrap();
    assert_eq!(session.sender, Some(record));
    assert_eq!(node.lookups(), 1);
    assert_eq!(*node.0.urls.lock().unwrap(), vec![Network::Regtest.rpc_url().to_string()]);
}

#[tokio::test]
async fn connect_keeps_bitcoin_address_when_nothing_resolves() {
    let wallet = FakeWallet::new("regtest", 50_000).without_key();
    let mut launcher = launcher(wallet, FakeNode::default(), LauncherConfig::new());

    let session = launcher.connect().await.unwrap();
    assert!(!session.is_resolved());
    assert_eq!(session.protocol_address, BTC_ADDRESS);
}

#[tokio::test]
async fn reconnect_resolves_again() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), LauncherConfig::new());

    assert!(launcher.toggle_wallet().await.unwrap());
    assert!(!launcher.toggle_wallet().await.unwrap());
    assert!(launcher.session().is_none());
    assert_eq!(launcher.state(), &WorkflowState::Disconnected);
    assert!(launcher.toggle_wallet().await.unwrap());

    assert_eq!(Calls::count(&calls.request_accounts), 2);
    assert_eq!(Calls::count(&calls.get_key), 2);
}

// ============================================================================
// Preconditions
// ============================================================================

#[tokio::test]
async fn deploy_requires_connection() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Wallet not connected. Please connect OP_WALLET first.");
    assert_eq!(calls.total(), 0);
}

#[tokio::test]
async fn invalid_form_makes_no_wallet_calls() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();
    let before = calls.total();

    let failure = launcher.deploy(&DeployForm::new("Moon", "", "1000"), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Please fill in all required fields.");
    assert_eq!(failure.kind, ErrorKind::Validation);
    assert_eq!(calls.total(), before);
    assert!(matches!(launcher.state(), WorkflowState::Error(_)));
}

#[tokio::test]
async fn network_mismatch_names_both_networks() {
    let wallet = FakeWallet::new("testnet", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.starts_with("Deployment failed: Wallet network mismatch!"));
    assert!(failure.message.contains("**TESTNET**"));
    assert!(failure.message.contains("**REGTEST**"));
    assert!(failure.message.contains("opr1"));
    assert!(failure.html().contains("<strong>TESTNET</strong>"));
    assert_eq!(Calls::count(&calls.deploy_contract), 0);
}

#[tokio::test]
async fn zero_balance_is_reported_before_signing() {
    let wallet = FakeWallet::new("regtest", 0);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.contains("**0 balance**"));
    assert!(failure.message.contains("rBTC"));
    assert_eq!(failure.kind, ErrorKind::NetworkState);
    assert_eq!(Calls::count(&calls.deploy_contract), 0);
}

#[tokio::test]
async fn missing_artifact_without_factory() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), LauncherConfig::new());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.contains("Could not find compiled contract WASM"));
    assert_eq!(failure.kind, ErrorKind::CapabilityMissing);
    // Wallet checks ran before the artifact lookup.
    assert_eq!(Calls::count(&calls.get_utxos), 1);
}

#[tokio::test]
async fn network_mismatch_reported_before_artifact_load() {
    let wallet = FakeWallet::new("testnet", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), LauncherConfig::new());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.starts_with("Deployment failed: Wallet network mismatch!"));
    assert!(failure.message.contains("**TESTNET**"));
    assert!(failure.message.contains("**REGTEST**"));
    assert_eq!(Calls::count(&calls.deploy_contract), 0);
}

#[tokio::test]
async fn zero_balance_reported_before_artifact_load() {
    let wallet = FakeWallet::new("regtest", 0);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), LauncherConfig::new());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.contains("**0 balance**"));
    assert_eq!(failure.kind, ErrorKind::NetworkState);
    assert_eq!(Calls::count(&calls.deploy_contract), 0);
}

#[tokio::test]
async fn unresolved_key_is_retried_at_deploy() {
    let wallet = FakeWallet::new("regtest", 50_000).key_failing_once();
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());

    assert!(!launcher.connect().await.unwrap().is_resolved());
    launcher.deploy(&form(), Network::Regtest).await.unwrap();

    assert_eq!(Calls::count(&calls.get_key), 2);
    assert_eq!(launcher.session().unwrap().sender, Some(sender()));
}

#[tokio::test]
async fn unresolvable_key_stops_deploy() {
    let wallet = FakeWallet::new("regtest", 50_000).without_key();
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.contains("Could not resolve your wallet's public key (MLDSA)"));
    assert_eq!(Calls::count(&calls.deploy_contract), 0);
}

// ============================================================================
// Direct route
// ============================================================================

#[tokio::test]
async fn direct_deploy_reports_both_transactions() {
    let utxo = Utxo { transaction_id: "ab".into(), output_index: 0, value: 50_000, script_pub_key: None };
    let wallet = FakeWallet::new("regtest", 50_000).with_utxos(vec![utxo.clone()]);
    let calls = wallet.calls.clone();
    let observer = Shared::default();
    let config = direct_config().with_platform_fee(FEE_ADDRESS);
    let mut launcher = launcher(wallet, FakeNode::default(), config).with_observer(Box::new(observer.clone()));
    launcher.connect().await.unwrap();

    let result = launcher.deploy(&form(), Network::Regtest).await.unwrap();
    assert_eq!(result.route, RouteKind::Direct);
    assert_eq!(result.contract_display(), "opr1contract");
    assert_eq!(result.funding_txid.as_deref(), Some(FUNDING_TXID));
    assert_eq!(result.tx_display(), "a1b2c3d4e5...6d7e8f90");
    assert_eq!(launcher.state(), &WorkflowState::Done);
    assert_eq!(launcher.last_result(), Some(&result));

    let requests = calls.deploy_requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.bytecode, vec![0x00, 0x61, 0x73, 0x6d]);
    assert_eq!(request.calldata.len(), 105 + "Moon".len() + "MOON".len());
    assert_eq!(request.network, Network::Regtest);
    assert_eq!(request.maximum_allowed_sat_to_spend, 100_000);
    assert_eq!(request.optional_outputs.len(), 1);
    assert_eq!(request.optional_outputs[0].value, 10_000);
    assert_eq!(request.utxos.as_deref(), Some(&[utxo][..]));

    let recorded = observer.0.lock().unwrap();
    assert_eq!(recorded.resets, 1);
    assert_eq!(
        recorded.states,
        vec![
            WorkflowState::Connected,
            WorkflowState::Preparing,
            WorkflowState::Simulating,
            WorkflowState::Submitting,
            WorkflowState::Confirming,
            WorkflowState::Done,
        ]
    );
    let expected: Vec<(DeployStep, StepStatus)> =
        DeployStep::ALL.iter().flat_map(|s| [(*s, StepStatus::Active), (*s, StepStatus::Done)]).collect();
    assert_eq!(recorded.steps, expected);
}

#[tokio::test]
async fn uploaded_bytecode_overrides_default_artifact() {
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    assert!(launcher.set_upload("token.txt", vec![1, 2, 3]).is_err());
    assert_eq!(launcher.set_upload("token.wasm", vec![9, 9, 9]).unwrap(), 3);
    launcher.deploy(&form(), Network::Regtest).await.unwrap();

    assert_eq!(calls.deploy_requests.lock().unwrap()[0].bytecode, vec![9, 9, 9]);
}

#[tokio::test]
async fn fee_output_skipped_for_foreign_address() {
    let wallet = FakeWallet::new("testnet", 50_000);
    let calls = wallet.calls.clone();
    let config = direct_config().with_platform_fee(FEE_ADDRESS);
    let mut launcher = launcher(wallet, FakeNode::default(), config);
    launcher.connect().await.unwrap();

    launcher.deploy(&form(), Network::Testnet).await.unwrap();
    assert!(calls.deploy_requests.lock().unwrap()[0].optional_outputs.is_empty());
}

#[tokio::test]
async fn missing_reveal_transaction_is_a_rejection() {
    let response = DeployContractResponse {
        contract_address: Some("opr1contract".into()),
        funding_transaction: Some(FUNDING_TXID.into()),
        reveal_transaction: None,
    };
    let wallet = FakeWallet::new("regtest", 50_000).with_deploy_response(Ok(response));
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Deployment failed: Deployment rejected or failed.");
    assert!(launcher.last_result().is_none());
}

#[tokio::test]
async fn no_utxos_error_becomes_guidance() {
    let wallet = FakeWallet::new("regtest", 250_000)
        .with_deploy_response(Err(WalletError::Other("No UTXOs found for address".into())));
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert!(failure.message.contains("UTXO Sync Issue Detected"));
    assert!(failure.message.contains("0.00250000 rBTC"));
    assert!(failure.message.contains("opr1"));
    assert_eq!(failure.kind, ErrorKind::NetworkState);
}

#[tokio::test]
async fn rejected_signature_surfaces_wallet_message() {
    let wallet = FakeWallet::new("regtest", 50_000)
        .with_deploy_response(Err(WalletError::Rejected("User rejected the request".into())));
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config());
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Deployment failed: User rejected the request");
}

// ============================================================================
// Factory route
// ============================================================================

#[tokio::test]
async fn factory_deploy_uses_announced_address() {
    let token = Address::new([0x07; 32]);
    let simulation = SimulationResult { events: vec![token_deployed_event(token)], ..Default::default() };
    let node = FakeNode::with_simulation(simulation);
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, node.clone(), LauncherConfig::new().with_factory(FACTORY));
    launcher.connect().await.unwrap();

    let form = form().with_initial_mint("1000");
    let result = launcher.deploy(&form, Network::Regtest).await.unwrap();
    assert_eq!(result.route, RouteKind::Factory);
    assert_eq!(result.contract_address, Some(token.p2op(Network::Regtest).unwrap()));
    assert_eq!(result.reveal_txid, REVEAL_TXID);
    assert_eq!(node.simulations(), 1);
    assert_eq!(Calls::count(&calls.deploy_contract), 0);

    let interactions = calls.interactions.lock().unwrap();
    assert_eq!(interactions.len(), 1);
    assert_eq!(interactions[0].to, FACTORY);
    assert_eq!(interactions[0].from, sender());
    assert_eq!(interactions[0].refund_to, BTC_ADDRESS);
    let args = tokenlaunch::abi::DeployTokenArgs::decode(&interactions[0].calldata).unwrap();
    assert_eq!(args.token_owner, sender());
    assert_eq!(args.initial_mint_to, sender());
}

#[tokio::test]
async fn factory_deploy_without_event_is_pending() {
    let node = FakeNode::with_simulation(SimulationResult::default());
    let wallet = FakeWallet::new("regtest", 50_000);
    let mut launcher = launcher(wallet, node, LauncherConfig::new().with_factory(FACTORY));
    launcher.connect().await.unwrap();

    let result = launcher.deploy(&form(), Network::Regtest).await.unwrap();
    assert_eq!(result.contract_display(), PENDING_ADDRESS);
}

#[tokio::test]
async fn reverted_simulation_stops_before_signing() {
    let simulation = SimulationResult { revert: Some("Symbol taken".into()), ..Default::default() };
    let wallet = FakeWallet::new("regtest", 50_000);
    let calls = wallet.calls.clone();
    let mut launcher =
        launcher(wallet, FakeNode::with_simulation(simulation), LauncherConfig::new().with_factory(FACTORY));
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Deployment failed: Simulation failed: Symbol taken");
    assert_eq!(failure.kind, ErrorKind::SimulationRevert);
    assert_eq!(Calls::count(&calls.send_interaction), 0);
}

#[tokio::test]
async fn factory_needs_resolved_sender() {
    // No key anywhere: the attempt stops before a route is chosen.
    let wallet = FakeWallet::new("regtest", 50_000).without_key();
    let calls = wallet.calls.clone();
    let mut launcher = launcher(wallet, FakeNode::default(), direct_config().with_factory(FACTORY));
    launcher.connect().await.unwrap();

    assert!(launcher.deploy(&form(), Network::Regtest).await.is_err());
    assert_eq!(Calls::count(&calls.send_interaction), 0);
}

#[tokio::test]
async fn empty_interaction_receipt_is_a_rejection() {
    let node = FakeNode::with_simulation(SimulationResult::default());
    let wallet = FakeWallet::new("regtest", 50_000).with_receipt(Ok(InteractionReceipt { transaction_id: None }));
    let mut launcher = launcher(wallet, node, LauncherConfig::new().with_factory(FACTORY));
    launcher.connect().await.unwrap();

    let failure = launcher.deploy(&form(), Network::Regtest).await.unwrap_err();
    assert_eq!(failure.message, "Deployment failed: Deployment rejected or failed.");
}
