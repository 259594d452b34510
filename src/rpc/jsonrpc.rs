//! reqwest transport for the OP_NET JSON-RPC endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use super::*;

pub struct JsonRpcProvider {
    url: Url,
    network: Network,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcProvider {
    pub fn new(network: Network, url: &str) -> RpcResult<Self> {
        let url = Url::parse(url).map_err(|e| RpcError::InvalidUrl(format!("{}: {}", url, e)))?;
        Ok(Self { url, network, http_client: reqwest::Client::new(), next_id: AtomicU64::new(1) })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn call(&self, request: RpcRequest) -> RpcResult<Value> {
        tracing::debug!("RPC -> {} {} {}", self.url, request.method, request.params);

        let response = self
            .http_client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Network(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| RpcError::Network(e.to_string()))?;
        tracing::debug!("RPC <- {} {}", status, body);

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                RpcError::InvalidResponse(e.to_string())
            } else {
                RpcError::Network(format!("HTTP {}", status))
            }
        })?;
        extract_result(value)
    }

    fn id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl RpcProvider for JsonRpcProvider {
    async fn get_public_key_info(&self, address: &str) -> RpcResult<Option<Address>> {
        let result = self.call(RpcRequest::public_key_info(address, self.id())).await?;
        Ok(parse_public_key_info(&result, address))
    }

    async fn simulate(&self, call: &ContractCall) -> RpcResult<SimulationResult> {
        let result = self.call(RpcRequest::call(call, self.id())).await?;
        parse_call_result(&result)
    }
}

/// Opens a fresh [`JsonRpcProvider`] per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRpcConnector;

impl RpcConnector for JsonRpcConnector {
    type Provider = JsonRpcProvider;

    fn connect(&self, network: Network, url: &str) -> RpcResult<JsonRpcProvider> {
        JsonRpcProvider::new(network, url)
    }
}
