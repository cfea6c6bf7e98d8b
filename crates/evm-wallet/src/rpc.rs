//! The JSON-RPC collaborator.
//!
//! [`RpcProvider`] is the only way the wallet talks to a chain; [`Connect`]
//! turns an RPC URL into a provider. [`HttpConnector`] is the production
//! implementation (JSON-RPC 2.0 over HTTP), tests substitute their own.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy_primitives::U256;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::WalletConfig;

/// Failures of the RPC layer, passed through to callers unchanged.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc returned error {code}: {message}")]
    Response { code: i64, message: String },

    #[error("could not decode rpc result: {0}")]
    Decode(String),
}

/// A call or transaction object as accepted by `eth_call` / `eth_estimateGas`.
///
/// Quantities are serialized as 0x-prefixed hex, absent fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_bytes_opt")]
    pub data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_quantity_opt")]
    pub gas: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", with = "hex_quantity_opt")]
    pub gas_price: Option<u128>,
}

impl CallRequest {
    /// A read-only call of `data` against `to`.
    pub fn call(to: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            to: Some(to.into()),
            data: Some(data),
            ..Self::default()
        }
    }
}

/// The RPC operations the wallet consumes.
#[async_trait]
pub trait RpcProvider: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> Result<u64, RpcError>;

    /// `eth_getTransactionCount` at the latest block.
    async fn transaction_count(&self, address: &str) -> Result<u64, RpcError>;

    /// `eth_getBalance` at the latest block, in wei.
    async fn balance(&self, address: &str) -> Result<U256, RpcError>;

    /// `eth_gasPrice`
    async fn gas_price(&self) -> Result<u128, RpcError>;

    /// `eth_estimateGas`
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError>;

    /// `eth_sendRawTransaction`; returns the transaction hash.
    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, RpcError>;

    /// `eth_call` at the latest block; returns the raw return data.
    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError>;
}

/// Opens a provider for an RPC URL.
pub trait Connect: Send + Sync {
    type Provider: RpcProvider + 'static;

    fn connect(&self, rpc_url: &str) -> Result<Self::Provider, RpcError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: Value,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Builds [`HttpProvider`]s sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    pub fn new(config: &WalletConfig) -> Result<Self, RpcError> {
        let client = Client::builder()
            .timeout(config.rpc_timeout)
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Connect for HttpConnector {
    type Provider = HttpProvider;

    fn connect(&self, rpc_url: &str) -> Result<HttpProvider, RpcError> {
        let url = url::Url::parse(rpc_url)
            .map_err(|e| RpcError::Transport(format!("invalid rpc url {rpc_url}: {e}")))?;
        Ok(HttpProvider {
            url,
            client: self.client.clone(),
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }
}

/// JSON-RPC 2.0 over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    url: url::Url,
    client: Client,
    request_id: Arc<AtomicU64>,
}

impl HttpProvider {
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, url = %self.url, "rpc request");

        let request = RpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id,
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(format!("{method}: http status {status}")));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| RpcError::Decode(format!("{method}: {e}")))?;

        if let Some(error) = body.error {
            debug!(method, id, code = error.code, "rpc error response");
            return Err(RpcError::Response {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| RpcError::Decode(format!("{method}: response has no result")))
    }

    async fn request_str(&self, method: &str, params: Value) -> Result<String, RpcError> {
        match self.request(method, params).await? {
            Value::String(s) => Ok(s),
            other => Err(RpcError::Decode(format!(
                "{method}: expected a hex string, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl RpcProvider for HttpProvider {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        parse_hex_u64(&self.request_str("eth_chainId", json!([])).await?)
    }

    async fn transaction_count(&self, address: &str) -> Result<u64, RpcError> {
        let result = self
            .request_str("eth_getTransactionCount", json!([address, "latest"]))
            .await?;
        parse_hex_u64(&result)
    }

    async fn balance(&self, address: &str) -> Result<U256, RpcError> {
        let result = self
            .request_str("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_hex_u256(&result)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        parse_hex_u128(&self.request_str("eth_gasPrice", json!([])).await?)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError> {
        parse_hex_u64(&self.request_str("eth_estimateGas", json!([request])).await?)
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, RpcError> {
        let raw_hex = format!("0x{}", hex::encode(raw_tx));
        self.request_str("eth_sendRawTransaction", json!([raw_hex]))
            .await
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let result = self
            .request_str("eth_call", json!([request, "latest"]))
            .await?;
        parse_hex_bytes(&result)
    }
}

// ---------------------------------------------------------------------------
// Hex quantity helpers
// ---------------------------------------------------------------------------

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

pub(crate) fn parse_hex_u64(s: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(strip_0x(s), 16)
        .map_err(|e| RpcError::Decode(format!("invalid quantity {s}: {e}")))
}

pub(crate) fn parse_hex_u128(s: &str) -> Result<u128, RpcError> {
    u128::from_str_radix(strip_0x(s), 16)
        .map_err(|e| RpcError::Decode(format!("invalid quantity {s}: {e}")))
}

pub(crate) fn parse_hex_u256(s: &str) -> Result<U256, RpcError> {
    U256::from_str_radix(strip_0x(s), 16)
        .map_err(|e| RpcError::Decode(format!("invalid quantity {s}: {e}")))
}

pub(crate) fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, RpcError> {
    hex::decode(strip_0x(s)).map_err(|e| RpcError::Decode(format!("invalid data {s}: {e}")))
}

mod hex_quantity_opt {
    use std::fmt::LowerHex;

    use serde::Serializer;

    pub fn serialize<T, S>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error>
    where
        T: LowerHex,
        S: Serializer,
    {
        match value {
            Some(v) => s.serialize_str(&format!("0x{v:x}")),
            None => s.serialize_none(),
        }
    }
}

mod hex_bytes_opt {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_str(&format!("0x{}", hex::encode(v))),
            None => s.serialize_none(),
        }
    }
}
