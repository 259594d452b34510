//! TokenLauncher: the deployer exposed to JavaScript
//!
//! One instance per page. Progress is pushed to the callback registered with
//! `onProgress`; every action resolves to plain JSON.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::prelude::*;

use super::fetch::{fetch_bytes, FetchRpcConnector};
use super::opwallet::OpWallet;
use super::pacer::WasmPacer;
use super::{from_js, js_error, log, to_js};
use crate::core::Network;
use crate::deploy::{
    ArtifactLocation, DeployFailure, DeployForm, DeployObserver, DeployStep, Pacing, StepStatus, WorkflowState,
};
use crate::launcher::{Launcher, LauncherConfig};

type BrowserLauncher = Launcher<OpWallet, FetchRpcConnector, WasmPacer>;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct JsConfig {
    factory: Option<String>,
    platform_fee_address: Option<String>,
    rpc_url: Option<String>,
    artifact_url: Option<String>,
    fast: bool,
}

impl JsConfig {
    fn into_config(self) -> LauncherConfig {
        let mut config = LauncherConfig::new();
        if let Some(factory) = self.factory.filter(|f| !f.is_empty()) {
            config = config.with_factory(factory);
        }
        if let Some(address) = self.platform_fee_address.filter(|a| !a.is_empty()) {
            config = config.with_platform_fee(address);
        }
        if let Some(url) = self.rpc_url.filter(|u| !u.is_empty()) {
            config = config.with_rpc_url(url);
        }
        if self.fast {
            config = config.with_pacing(Pacing::instant());
        }
        config
    }
}

#[derive(Serialize)]
struct JsFailure<'a> {
    #[serde(flatten)]
    failure: &'a DeployFailure,
    html: String,
}

fn failure_to_js(failure: &DeployFailure) -> JsValue {
    to_js(&JsFailure { failure, html: failure.html() }).unwrap_or_else(|_| js_error(&failure.message))
}

fn busy() -> JsValue {
    js_error("A deployment is already in progress.")
}

fn parse_network(value: &str) -> Result<Network, JsValue> {
    Network::from_name(value).ok_or_else(|| js_error(format!("Unknown network: {}", value)))
}

/// Pushes `{kind: "state" | "step" | "reset", ...}` to a JS callback.
struct JsObserver {
    callback: js_sys::Function,
}

impl JsObserver {
    fn emit(&self, event: serde_json::Value) {
        if let Ok(value) = to_js(&event) {
            let _ = self.callback.call1(&JsValue::NULL, &value);
        }
    }
}

impl DeployObserver for JsObserver {
    fn on_state(&mut self, state: &WorkflowState) {
        self.emit(json!({"kind": "state", "state": state}));
    }

    fn on_step(&mut self, step: DeployStep, status: StepStatus) {
        self.emit(json!({
            "kind": "step",
            "step": step,
            "number": step.number(),
            "label": step.label(),
            "status": status,
        }));
    }

    fn on_reset(&mut self) {
        self.emit(json!({"kind": "reset"}));
    }
}

#[wasm_bindgen]
pub struct TokenLauncher {
    inner: RefCell<BrowserLauncher>,
}

impl TokenLauncher {
    fn build(config: LauncherConfig) -> Self {
        let wallet = OpWallet::detect();
        if wallet.is_none() {
            log!("OP_WALLET not detected");
        }
        Self { inner: RefCell::new(Launcher::new(wallet, FetchRpcConnector, WasmPacer, config)) }
    }
}

#[wasm_bindgen]
impl TokenLauncher {
    /// Build with `{factory?, platformFeeAddress?, rpcUrl?, fast?}`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<TokenLauncher, JsValue> {
        let config: JsConfig = if config.is_undefined() || config.is_null() { JsConfig::default() } else { from_js(config)? };
        Ok(Self::build(config.into_config()))
    }

    /// Like the constructor, also fetching `artifactUrl` as the default
    /// contract bytecode.
    #[wasm_bindgen(js_name = "create")]
    pub async fn create(config: JsValue) -> Result<TokenLauncher, JsValue> {
        let js_config: JsConfig =
            if config.is_undefined() || config.is_null() { JsConfig::default() } else { from_js(config)? };
        let artifact_url = js_config.artifact_url.clone().filter(|u| !u.is_empty());
        let mut config = js_config.into_config();
        if let Some(url) = artifact_url {
            match fetch_bytes(&url).await {
                Ok(bytes) if !bytes.is_empty() => {
                    log!("Loaded contract artifact {} ({} bytes)", url, bytes.len());
                    config = config.with_default_artifact(ArtifactLocation::Bytes(bytes));
                }
                Ok(_) => log!("Contract artifact {} is empty", url),
                Err(e) => log!("Could not load contract artifact {}: {}", url, e),
            }
        }
        Ok(Self::build(config))
    }

    #[wasm_bindgen(js_name = "onProgress")]
    pub fn on_progress(&self, callback: js_sys::Function) -> Result<(), JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        launcher.set_observer(Box::new(JsObserver { callback }));
        Ok(())
    }

    #[wasm_bindgen(js_name = "hasWallet")]
    pub fn has_wallet(&self) -> bool {
        self.inner.try_borrow().map(|l| l.has_wallet()).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = "isConnected")]
    pub fn is_connected(&self) -> bool {
        self.inner.try_borrow().map(|l| l.is_connected()).unwrap_or(false)
    }

    /// Current workflow state as `{state, ...}`.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        let launcher = self.inner.try_borrow().map_err(|_| busy())?;
        to_js(launcher.state())
    }

    /// Session JSON, or `null` when disconnected.
    #[wasm_bindgen]
    pub fn session(&self) -> Result<JsValue, JsValue> {
        let launcher = self.inner.try_borrow().map_err(|_| busy())?;
        match launcher.session() {
            Some(session) => to_js(&json!({
                "bitcoinAddress": session.bitcoin_address,
                "protocolAddress": session.protocol_address,
                "shortAddress": session.short_address(),
                "resolved": session.is_resolved(),
                "balanceSats": session.balance_sats,
                "balance": session.balance_display(),
                "walletNetwork": session.wallet_network,
                "badge": session.network().badge(),
            })),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen]
    pub async fn connect(&self) -> Result<JsValue, JsValue> {
        {
            let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
            launcher.connect().await.map_err(|f| failure_to_js(&f))?;
        }
        self.session()
    }

    #[wasm_bindgen]
    pub fn disconnect(&self) -> Result<(), JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        launcher.disconnect();
        Ok(())
    }

    /// Resolves to whether the wallet is connected afterwards.
    #[wasm_bindgen(js_name = "toggleWallet")]
    pub async fn toggle_wallet(&self) -> Result<bool, JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        launcher.toggle_wallet().await.map_err(|f| failure_to_js(&f))
    }

    #[wasm_bindgen(js_name = "refreshBalance")]
    pub async fn refresh_balance(&self) -> Result<JsValue, JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        Ok(match launcher.refresh_balance().await {
            Some(sats) => JsValue::from_f64(sats as f64),
            None => JsValue::NULL,
        })
    }

    /// Use an uploaded `.wasm` file instead of the default artifact.
    #[wasm_bindgen(js_name = "setUpload")]
    pub fn set_upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<usize, JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        launcher.set_upload(file_name, bytes).map_err(|f| failure_to_js(&f))
    }

    #[wasm_bindgen(js_name = "clearUpload")]
    pub fn clear_upload(&self) -> Result<(), JsValue> {
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        launcher.clear_upload();
        Ok(())
    }

    #[wasm_bindgen]
    pub fn preview(&self, form: JsValue) -> Result<JsValue, JsValue> {
        let form: DeployForm = from_js(form)?;
        let launcher = self.inner.try_borrow().map_err(|_| busy())?;
        to_js(&launcher.preview(&form))
    }

    #[wasm_bindgen]
    pub fn estimate(&self, network: &str, mintable: bool, pausable: bool) -> Result<JsValue, JsValue> {
        let network = parse_network(network)?;
        let launcher = self.inner.try_borrow().map_err(|_| busy())?;
        let estimate = launcher.estimate(network, mintable, pausable);
        to_js(&json!({
            "estimate": estimate,
            "totalDisplay": estimate.total_display(),
            "lines": estimate.lines(),
        }))
    }

    /// Run a deployment. Rejects with `{kind, message, html}`.
    #[wasm_bindgen]
    pub async fn deploy(&self, form: JsValue, network: &str) -> Result<JsValue, JsValue> {
        let form: DeployForm = from_js(form)?;
        let network = parse_network(network)?;
        let mut launcher = self.inner.try_borrow_mut().map_err(|_| busy())?;
        let result = launcher.deploy(&form, network).await.map_err(|f| failure_to_js(&f))?;
        to_js(&json!({
            "result": result,
            "contractAddress": result.contract_display(),
            "txDisplay": result.tx_display(),
            "explorerUrl": result.explorer_url(),
        }))
    }
}
