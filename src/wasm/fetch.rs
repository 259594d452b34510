//! OP_NET JSON-RPC over the browser `fetch` API.

use std::cell::Cell;

use async_trait::async_trait;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

use super::js_message;
use crate::core::{Address, Network};
use crate::rpc::{
    extract_result, parse_call_result, parse_public_key_info, ContractCall, RpcConnector, RpcError, RpcProvider,
    RpcRequest, RpcResult, SimulationResult,
};

pub struct FetchRpcProvider {
    url: String,
    network: Network,
    next_id: Cell<u64>,
}

impl FetchRpcProvider {
    pub fn new(network: Network, url: &str) -> Self {
        Self { url: url.to_string(), network, next_id: Cell::new(1) }
    }

    pub fn network(&self) -> Network {
        self.network
    }

    fn id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    async fn call(&self, request: RpcRequest) -> RpcResult<Value> {
        let body = serde_json::to_string(&request).map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
        let network_error = |e: JsValue| RpcError::Network(js_message(&e));

        let headers = Headers::new().map_err(network_error)?;
        headers.set("Content-Type", "application/json").map_err(network_error)?;
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
        let request = Request::new_with_str_and_init(&self.url, &init).map_err(|e| RpcError::InvalidUrl(js_message(&e)))?;

        let window = web_sys::window().ok_or_else(|| RpcError::Network("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request)).await.map_err(network_error)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| RpcError::InvalidResponse("fetch did not return a Response".into()))?;
        let text = JsFuture::from(response.text().map_err(network_error)?).await.map_err(network_error)?;
        let text = text.as_string().unwrap_or_default();

        let value: Value = serde_json::from_str(&text).map_err(|e| {
            if response.ok() {
                RpcError::InvalidResponse(e.to_string())
            } else {
                RpcError::Network(format!("HTTP {}", response.status()))
            }
        })?;
        extract_result(value)
    }
}

#[async_trait(?Send)]
impl RpcProvider for FetchRpcProvider {
    async fn get_public_key_info(&self, address: &str) -> RpcResult<Option<Address>> {
        let result = self.call(RpcRequest::public_key_info(address, self.id())).await?;
        Ok(parse_public_key_info(&result, address))
    }

    async fn simulate(&self, call: &ContractCall) -> RpcResult<SimulationResult> {
        let result = self.call(RpcRequest::call(call, self.id())).await?;
        parse_call_result(&result)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchRpcConnector;

impl RpcConnector for FetchRpcConnector {
    type Provider = FetchRpcProvider;

    fn connect(&self, network: Network, url: &str) -> RpcResult<FetchRpcProvider> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RpcError::InvalidUrl(url.to_string()));
        }
        Ok(FetchRpcProvider::new(network, url))
    }
}

/// GET a binary resource (the default contract artifact).
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, RpcError> {
    let network_error = |e: JsValue| RpcError::Network(js_message(&e));
    let window = web_sys::window().ok_or_else(|| RpcError::Network("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(url)).await.map_err(network_error)?;
    let response: Response = response
        .dyn_into()
        .map_err(|_| RpcError::InvalidResponse("fetch did not return a Response".into()))?;
    if !response.ok() {
        return Err(RpcError::Network(format!("HTTP {}", response.status())));
    }
    let buffer = JsFuture::from(response.array_buffer().map_err(network_error)?).await.map_err(network_error)?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
