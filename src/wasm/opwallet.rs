//! `window.opnet` as a [`WalletProvider`].

use async_trait::async_trait;
use js_sys::{Array, BigInt, Function, Object, Promise, Reflect, Uint8Array};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::js_message;
use crate::wallet::{
    DeployContractRequest, DeployContractResponse, InteractionReceipt, InteractionRequest, PaymentOutput, Utxo,
    WalletBalance, WalletError, WalletProvider, WalletResult, Web3Provider,
};

/// The injected OP_WALLET object.
pub struct OpWallet {
    opnet: JsValue,
    web3: Option<OpWeb3>,
}

struct OpWeb3 {
    inner: JsValue,
}

impl OpWallet {
    /// `None` when the extension is not installed.
    pub fn detect() -> Option<Self> {
        let window = web_sys::window()?;
        let opnet = Reflect::get(&window, &JsValue::from_str("opnet")).ok()?;
        Self::from_js(opnet)
    }

    pub fn from_js(opnet: JsValue) -> Option<Self> {
        if opnet.is_undefined() || opnet.is_null() {
            return None;
        }
        let web3 = Reflect::get(&opnet, &JsValue::from_str("web3"))
            .ok()
            .filter(|w| !w.is_undefined() && !w.is_null())
            .map(|inner| OpWeb3 { inner });
        Some(Self { opnet, web3 })
    }
}

/// Call `target[name](...args)` and await the result if it is a promise.
async fn invoke(target: &JsValue, name: &'static str, args: &[JsValue]) -> WalletResult<JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name)).map_err(to_wallet_error)?;
    let method: Function = method.dyn_into().map_err(|_| WalletError::Unsupported(name))?;
    let js_args: Array = args.iter().collect();
    let returned = method.apply(target, &js_args).map_err(to_wallet_error)?;
    JsFuture::from(Promise::resolve(&returned)).await.map_err(to_wallet_error)
}

fn to_wallet_error(value: JsValue) -> WalletError {
    let message = js_message(&value);
    let lowered = message.to_lowercase();
    if lowered.contains("reject") || lowered.contains("denied") || lowered.contains("cancel") {
        WalletError::Rejected(message)
    } else {
        WalletError::Other(message)
    }
}

/// Number, bigint or numeric string as satoshis.
fn js_u64(value: &JsValue) -> Option<u64> {
    if let Some(n) = value.as_f64() {
        return (n >= 0.0).then_some(n as u64);
    }
    if value.is_bigint() {
        let text: String = value.clone().unchecked_into::<BigInt>().to_string(10).ok()?.into();
        return text.parse().ok();
    }
    value.as_string()?.parse().ok()
}

fn field(target: &JsValue, name: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(name)).unwrap_or(JsValue::UNDEFINED)
}

fn set(target: &Object, name: &str, value: &JsValue) -> WalletResult<()> {
    Reflect::set(target, &JsValue::from_str(name), value).map(|_| ()).map_err(to_wallet_error)
}

fn outputs_to_js(outputs: &[PaymentOutput]) -> WalletResult<Array> {
    let array = Array::new();
    for output in outputs {
        let obj = Object::new();
        set(&obj, "address", &JsValue::from_str(&output.address))?;
        set(&obj, "value", &JsValue::from_f64(output.value as f64))?;
        array.push(&obj);
    }
    Ok(array)
}

#[async_trait(?Send)]
impl WalletProvider for OpWallet {
    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        let accounts = invoke(&self.opnet, "requestAccounts", &[]).await?;
        let accounts: Array = accounts
            .dyn_into()
            .map_err(|_| WalletError::Other("requestAccounts did not return a list".into()))?;
        Ok(accounts.iter().filter_map(|a| a.as_string()).collect())
    }

    async fn get_network(&self) -> WalletResult<String> {
        invoke(&self.opnet, "getNetwork", &[])
            .await?
            .as_string()
            .ok_or_else(|| WalletError::Other("getNetwork did not return a string".into()))
    }

    async fn get_balance(&self) -> WalletResult<WalletBalance> {
        let balance = invoke(&self.opnet, "getBalance", &[]).await?;
        if let Some(sats) = js_u64(&balance) {
            return Ok(WalletBalance::Sats(sats));
        }
        if balance.is_object() {
            return Ok(WalletBalance::Detailed {
                total: js_u64(&field(&balance, "total")),
                confirmed: js_u64(&field(&balance, "confirmed")),
                confirmed_satoshi: js_u64(&field(&balance, "confirmed_satoshi")),
            });
        }
        Ok(WalletBalance::Sats(0))
    }

    async fn get_utxos(&self, address: &str) -> WalletResult<Vec<Utxo>> {
        let utxos = invoke(&self.opnet, "getUtxos", &[JsValue::from_str(address)]).await?;
        if !Array::is_array(&utxos) {
            return Ok(Vec::new());
        }
        serde_wasm_bindgen::from_value(utxos).map_err(|e| WalletError::Other(e.to_string()))
    }

    fn web3(&self) -> Option<&dyn Web3Provider> {
        self.web3.as_ref().map(|w| w as &dyn Web3Provider)
    }
}

#[async_trait(?Send)]
impl Web3Provider for OpWeb3 {
    async fn get_mldsa_public_key(&self) -> WalletResult<String> {
        invoke(&self.inner, "getMLDSAPublicKey", &[])
            .await?
            .as_string()
            .ok_or_else(|| WalletError::Other("getMLDSAPublicKey did not return a string".into()))
    }

    async fn deploy_contract(&self, request: DeployContractRequest) -> WalletResult<DeployContractResponse> {
        let params = Object::new();
        set(&params, "bytecode", &Uint8Array::from(request.bytecode.as_slice()))?;
        set(&params, "calldata", &Uint8Array::from(request.calldata.as_slice()))?;
        set(&params, "feeRate", &JsValue::from_f64(request.fee_rate as f64))?;
        set(&params, "priorityFee", &BigInt::from(request.priority_fee))?;
        set(&params, "gasSatFee", &BigInt::from(request.gas_sat_fee))?;
        set(&params, "revealMLDSAPublicKey", &JsValue::from_bool(request.reveal_mldsa_public_key))?;
        set(&params, "linkMLDSAPublicKeyToAddress", &JsValue::from_bool(request.link_mldsa_public_key_to_address))?;
        set(&params, "network", &JsValue::from_str(request.network.as_str()))?;
        set(&params, "maximumAllowedSatToSpend", &BigInt::from(request.maximum_allowed_sat_to_spend))?;
        set(&params, "optionalOutputs", &outputs_to_js(&request.optional_outputs)?)?;
        if let Some(utxos) = &request.utxos {
            let utxos = serde_wasm_bindgen::to_value(utxos).map_err(|e| WalletError::Other(e.to_string()))?;
            set(&params, "utxos", &utxos)?;
        }

        let result = invoke(&self.inner, "deployContract", &[params.into()]).await?;
        if result.is_undefined() || result.is_null() {
            return Ok(DeployContractResponse::default());
        }
        let transactions = field(&result, "transaction");
        let (funding, reveal) = if Array::is_array(&transactions) {
            let transactions: Array = transactions.unchecked_into();
            (transactions.get(0).as_string(), transactions.get(1).as_string())
        } else {
            (None, None)
        };
        Ok(DeployContractResponse {
            contract_address: field(&result, "contractAddress").as_string(),
            funding_transaction: funding,
            reveal_transaction: reveal,
        })
    }

    async fn send_interaction(&self, request: InteractionRequest) -> WalletResult<InteractionReceipt> {
        let params = Object::new();
        set(&params, "to", &JsValue::from_str(&request.to))?;
        set(&params, "calldata", &Uint8Array::from(request.calldata.as_slice()))?;
        set(&params, "from", &JsValue::from_str(&request.from.to_hex()))?;
        set(&params, "refundTo", &JsValue::from_str(&request.refund_to))?;
        set(&params, "feeRate", &JsValue::from_f64(request.fee_rate as f64))?;
        set(&params, "maximumAllowedSatToSpend", &BigInt::from(request.maximum_allowed_sat_to_spend))?;
        set(&params, "optionalOutputs", &outputs_to_js(&request.optional_outputs)?)?;
        set(&params, "network", &JsValue::from_str(request.network.as_str()))?;

        let result = invoke(&self.inner, "signAndBroadcastInteraction", &[params.into()]).await?;
        if let Some(txid) = result.as_string() {
            return Ok(InteractionReceipt { transaction_id: Some(txid) });
        }
        let transaction_id = ["transactionId", "txHash", "result"]
            .iter()
            .find_map(|name| field(&result, name).as_string().filter(|t| !t.is_empty()));
        Ok(InteractionReceipt { transaction_id })
    }
}
