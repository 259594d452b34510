//! OP_NET JSON-RPC provider
//!
//! Used for two things the wallet cannot always answer itself: resolving an
//! account's public-key record, and simulating factory calls. Transports
//! (reqwest on native, fetch in the browser) share the request and response
//! handling here.

#[cfg(feature = "native")]
mod jsonrpc;

#[cfg(feature = "native")]
pub use jsonrpc::{JsonRpcConnector, JsonRpcProvider};

use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Value};

use crate::abi::factory::{TokenDeployed, TOKEN_DEPLOYED_EVENT};
use crate::core::{Address, BinaryReader, Network};

pub const METHOD_PUBLIC_KEY_INFO: &str = "btc_publicKeyInfo";
pub const METHOD_CALL: &str = "btc_call";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),
}

pub type RpcResult<T> = Result<T, RpcError>;

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RpcProvider {
    /// Public-key record for a Bitcoin address. `None` when the node has
    /// never seen the account (no on-chain history).
    async fn get_public_key_info(&self, address: &str) -> RpcResult<Option<Address>>;

    /// Dry-run a contract call.
    async fn simulate(&self, call: &ContractCall) -> RpcResult<SimulationResult>;
}

/// Builds providers for a network. Keyed by network so the URL follows the
/// wallet's chain.
pub trait RpcConnector {
    type Provider: RpcProvider;

    fn connect(&self, network: Network, url: &str) -> RpcResult<Self::Provider>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub to: String,
    pub calldata: Vec<u8>,
    pub from: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationEvent {
    pub event_type: String,
    pub contract: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationResult {
    pub revert: Option<String>,
    pub result: Vec<u8>,
    pub events: Vec<SimulationEvent>,
    pub estimated_gas: Option<u64>,
}

impl SimulationResult {
    pub fn find_event(&self, name: &str) -> Option<&SimulationEvent> {
        self.events.iter().find(|e| e.event_type == name)
    }

    /// First `TokenDeployed` record, if present and decodable.
    pub fn token_deployed(&self) -> Option<TokenDeployed> {
        let event = self.find_event(TOKEN_DEPLOYED_EVENT)?;
        match TokenDeployed::decode(&event.data) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!("Undecodable {} event: {}", TOKEN_DEPLOYED_EVENT, e);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl RpcRequest {
    pub fn new(method: &str, params: Value, id: u64) -> Self {
        Self { jsonrpc: "2.0", id, method: method.to_string(), params }
    }

    pub fn public_key_info(address: &str, id: u64) -> Self {
        Self::new(METHOD_PUBLIC_KEY_INFO, json!([[address]]), id)
    }

    pub fn call(call: &ContractCall, id: u64) -> Self {
        let from = call.from.map(|a| a.to_hex());
        Self::new(METHOD_CALL, json!([call.to, hex::encode(&call.calldata), from]), id)
    }
}

/// Unwrap a JSON-RPC envelope into its `result`.
pub fn extract_result(response: Value) -> RpcResult<Value> {
    if let Some(error) = response.get("error") {
        if !error.is_null() {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(RpcError::Rpc { code, message });
        }
    }
    match response {
        Value::Object(mut obj) if obj.contains_key("result") => Ok(obj.remove("result").unwrap_or(Value::Null)),
        other => Ok(other),
    }
}

/// Pick the account's key out of a `btc_publicKeyInfo` result.
pub fn parse_public_key_info(result: &Value, address: &str) -> Option<Address> {
    let record = match result.get(address) {
        Some(record) => record,
        None => result.as_object()?.values().next()?,
    };
    if record.get("error").is_some() {
        return None;
    }
    ["mldsaHashedPublicKey", "tweakedPubkey", "originalPubKey"]
        .iter()
        .filter_map(|field| record.get(*field).and_then(|v| v.as_str()))
        .find_map(|key| Address::from_hex(key).ok())
}

/// Parse a `btc_call` result.
pub fn parse_call_result(result: &Value) -> RpcResult<SimulationResult> {
    if let Some(error) = result.get("error").and_then(|e| e.as_str()) {
        return Ok(SimulationResult { revert: Some(error.to_string()), ..Default::default() });
    }
    let revert = result.get("revert").and_then(|r| r.as_str()).map(decode_revert);
    let output = match result.get("result").and_then(|r| r.as_str()) {
        Some(encoded) => decode_base64(encoded)?,
        None => Vec::new(),
    };
    let mut events = Vec::new();
    match result.get("events") {
        Some(Value::Object(by_contract)) => {
            for (contract, list) in by_contract {
                for event in list.as_array().into_iter().flatten() {
                    events.push(parse_event(event, Some(contract.clone()))?);
                }
            }
        }
        Some(Value::Array(list)) => {
            for event in list {
                events.push(parse_event(event, None)?);
            }
        }
        _ => {}
    }
    let estimated_gas = result.get("estimatedGas").and_then(|g| match g {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => match s.strip_prefix("0x") {
            Some(hex_digits) => u64::from_str_radix(hex_digits, 16).ok(),
            None => s.parse().ok(),
        },
        _ => None,
    });
    Ok(SimulationResult { revert, result: output, events, estimated_gas })
}

fn parse_event(event: &Value, contract: Option<String>) -> RpcResult<SimulationEvent> {
    let event_type = event
        .get("type")
        .or_else(|| event.get("name"))
        .and_then(|t| t.as_str())
        .unwrap_or_default()
        .to_string();
    let data = match event.get("data").and_then(|d| d.as_str()) {
        Some(encoded) => decode_base64(encoded)?,
        None => Vec::new(),
    };
    let contract = event.get("contractAddress").and_then(|c| c.as_str()).map(str::to_string).or(contract);
    Ok(SimulationEvent { event_type, contract, data })
}

fn decode_base64(encoded: &str) -> RpcResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| RpcError::InvalidResponse(format!("base64: {}", e)))
}

/// Revert payloads are base64; either plain UTF-8 or a selector followed by
/// a length-prefixed message. Anything else is shown as received.
fn decode_revert(raw: &str) -> String {
    let Ok(bytes) = base64::engine::general_purpose::STANDARD.decode(raw) else {
        return raw.to_string();
    };
    if bytes.len() > 4 {
        let mut reader = BinaryReader::new(&bytes[4..]);
        if let Ok(message) = reader.read_string_with_length() {
            if reader.remaining() == 0 {
                return message;
            }
        }
    }
    match String::from_utf8(bytes) {
        Ok(text) if !text.chars().any(|c| c.is_control()) => text,
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BinaryWriter;

    fn b64(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn envelope_error_becomes_rpc_error() {
        let err = extract_result(json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32000, "message": "boom"}}));
        assert_eq!(err, Err(RpcError::Rpc { code: -32000, message: "boom".into() }));
        let ok = extract_result(json!({"jsonrpc": "2.0", "id": 1, "result": {"a": 1}})).unwrap();
        assert_eq!(ok, json!({"a": 1}));
    }

    #[test]
    fn public_key_info_prefers_hashed_mldsa_key() {
        let hashed = "11".repeat(32);
        let result = json!({"bcrt1qxyz": {"mldsaHashedPublicKey": hashed, "tweakedPubkey": "22".repeat(32)}});
        let addr = parse_public_key_info(&result, "bcrt1qxyz").unwrap();
        assert_eq!(addr.as_bytes(), &[0x11; 32]);
    }

    #[test]
    fn public_key_info_unknown_account() {
        let result = json!({"bcrt1qxyz": {"error": "not found"}});
        assert_eq!(parse_public_key_info(&result, "bcrt1qxyz"), None);
        assert_eq!(parse_public_key_info(&json!({}), "bcrt1qxyz"), None);
    }

    #[test]
    fn call_result_with_events() {
        let event = TokenDeployed {
            deployer: Address::new([1; 32]),
            token_address: Address::new([2; 32]),
            name: "A".into(),
            symbol: "B".into(),
        };
        let result = json!({
            "result": b64(&[1]),
            "events": {"opr1factory": [{"type": "TokenDeployed", "data": b64(&event.encode().unwrap())}]},
            "estimatedGas": "0x2710"
        });
        let parsed = parse_call_result(&result).unwrap();
        assert_eq!(parsed.revert, None);
        assert_eq!(parsed.result, vec![1]);
        assert_eq!(parsed.estimated_gas, Some(10_000));
        assert_eq!(parsed.events[0].contract.as_deref(), Some("opr1factory"));
        assert_eq!(parsed.token_deployed(), Some(event));
    }

    #[test]
    fn call_result_revert_messages() {
        let mut w = BinaryWriter::with_selector(0x0102_0304);
        w.write_string_with_length("Name already taken").unwrap();
        let parsed = parse_call_result(&json!({"revert": b64(&w.finish())})).unwrap();
        assert_eq!(parsed.revert.as_deref(), Some("Name already taken"));

        let parsed = parse_call_result(&json!({"revert": b64(b"out of gas")})).unwrap();
        assert_eq!(parsed.revert.as_deref(), Some("out of gas"));

        let parsed = parse_call_result(&json!({"error": "execution reverted"})).unwrap();
        assert_eq!(parsed.revert.as_deref(), Some("execution reverted"));
    }

    #[test]
    fn request_shapes() {
        let req = RpcRequest::public_key_info("bcrt1qxyz", 7);
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["method"], METHOD_PUBLIC_KEY_INFO);
        assert_eq!(v["params"], json!([["bcrt1qxyz"]]));

        let call = ContractCall { to: "opr1f".into(), calldata: vec![0xab], from: None };
        let v = serde_json::to_value(RpcRequest::call(&call, 8)).unwrap();
        assert_eq!(v["params"], json!(["opr1f", "ab", null]));
    }
}
