//! In-memory JSON-RPC endpoints for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy_primitives::U256;
use async_trait::async_trait;
use chain_eth::erc20::{BALANCE_OF_SELECTOR, DECIMALS_SELECTOR, SYMBOL_SELECTOR};
use evm_wallet::{
    AccountIdentity, CallRequest, Connect, NetworkCatalog, NetworkInfo, RpcError, RpcProvider,
    WalletConfig,
};
use sha3::{Digest, Keccak256};

pub const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
pub const KEY_ONE_ADDRESS: &str = "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf";

pub const DEVNET_URL: &str = "http://devnet.test";
pub const OTHERNET_URL: &str = "http://othernet.test";
pub const UNPINNED_URL: &str = "http://unpinned.test";
pub const LIAR_URL: &str = "http://liar.test";

pub const DEVNET_CHAIN_ID: u64 = 1337;
pub const OTHERNET_CHAIN_ID: u64 = 9;
pub const UNPINNED_CHAIN_ID: u64 = 204;

pub const USDC: &str = "0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d";
pub const SIX_DECIMAL_TOKEN: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
pub const RECIPIENT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const SPENDER: &str = "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB";

pub const GAS_PRICE: u128 = 5_000_000_000;
pub const GAS_ESTIMATE: u64 = 51_234;

#[derive(Debug, Clone)]
pub struct Endpoint {
    pub chain_id: u64,
    pub nonce: u64,
    pub balance: U256,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256,
}

#[derive(Debug, Default)]
pub struct MockState {
    endpoints: HashMap<String, Endpoint>,
    tokens: HashMap<String, Token>,
    calls: Vec<String>,
    sent: Vec<Vec<u8>>,
    fail_sends: bool,
    estimates: Vec<CallRequest>,
}

/// Hands out [`MockProvider`]s for the registered URLs and records every
/// request made through them.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    state: Arc<Mutex<MockState>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devnet, Othernet, Unpinned and Liar endpoints plus two tokens.
    pub fn standard() -> Self {
        let connector = Self::new()
            .with_endpoint(DEVNET_URL, DEVNET_CHAIN_ID, 7)
            .with_endpoint(OTHERNET_URL, OTHERNET_CHAIN_ID, 42)
            .with_endpoint(UNPINNED_URL, UNPINNED_CHAIN_ID, 0)
            .with_endpoint(LIAR_URL, 56, 0)
            .with_token(USDC, "USDC", 18, U256::from(2_500_000_000_000_000_000u128))
            .with_token(SIX_DECIMAL_TOKEN, "SIX", 6, U256::from(1_500_000u64));
        connector.set_balance(DEVNET_URL, U256::from(1_000_000_000_000_000_000u128));
        connector
    }

    pub fn with_endpoint(self, url: &str, chain_id: u64, nonce: u64) -> Self {
        self.lock().endpoints.insert(
            url.to_string(),
            Endpoint {
                chain_id,
                nonce,
                balance: U256::ZERO,
            },
        );
        self
    }

    pub fn with_token(self, address: &str, symbol: &str, decimals: u8, balance: U256) -> Self {
        self.lock().tokens.insert(
            address.to_lowercase(),
            Token {
                symbol: symbol.to_string(),
                decimals,
                balance,
            },
        );
        self
    }

    pub fn set_balance(&self, url: &str, balance: U256) {
        if let Some(endpoint) = self.lock().endpoints.get_mut(url) {
            endpoint.balance = balance;
        }
    }

    pub fn set_nonce(&self, url: &str, nonce: u64) {
        if let Some(endpoint) = self.lock().endpoints.get_mut(url) {
            endpoint.nonce = nonce;
        }
    }

    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Number of provider requests made so far.
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn count_of(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|m| *m == method).count()
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.lock().sent.clone()
    }

    pub fn estimates(&self) -> Vec<CallRequest> {
        self.lock().estimates.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

impl Connect for MockConnector {
    type Provider = MockProvider;

    fn connect(&self, rpc_url: &str) -> Result<MockProvider, RpcError> {
        if !self.lock().endpoints.contains_key(rpc_url) {
            return Err(RpcError::Transport(format!("connection refused: {rpc_url}")));
        }
        Ok(MockProvider {
            url: rpc_url.to_string(),
            state: Arc::clone(&self.state),
        })
    }
}

#[derive(Debug)]
pub struct MockProvider {
    url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    fn record(&self, method: &str) -> MutexGuard<'_, MockState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(method.to_string());
        state
    }

    fn endpoint<'a>(&self, state: &'a mut MockState) -> &'a mut Endpoint {
        state.endpoints.get_mut(&self.url).unwrap()
    }
}

#[async_trait]
impl RpcProvider for MockProvider {
    async fn chain_id(&self) -> Result<u64, RpcError> {
        let mut state = self.record("eth_chainId");
        Ok(self.endpoint(&mut state).chain_id)
    }

    async fn transaction_count(&self, _address: &str) -> Result<u64, RpcError> {
        let mut state = self.record("eth_getTransactionCount");
        Ok(self.endpoint(&mut state).nonce)
    }

    async fn balance(&self, _address: &str) -> Result<U256, RpcError> {
        let mut state = self.record("eth_getBalance");
        Ok(self.endpoint(&mut state).balance)
    }

    async fn gas_price(&self) -> Result<u128, RpcError> {
        drop(self.record("eth_gasPrice"));
        Ok(GAS_PRICE)
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, RpcError> {
        let mut state = self.record("eth_estimateGas");
        state.estimates.push(request.clone());
        Ok(GAS_ESTIMATE)
    }

    async fn send_raw_transaction(&self, raw_tx: &[u8]) -> Result<String, RpcError> {
        let mut state = self.record("eth_sendRawTransaction");
        if state.fail_sends {
            return Err(RpcError::Response {
                code: -32000,
                message: "insufficient funds for gas * price + value".into(),
            });
        }
        state.sent.push(raw_tx.to_vec());
        self.endpoint(&mut state).nonce += 1;
        Ok(format!("0x{}", hex::encode(Keccak256::digest(raw_tx))))
    }

    async fn call(&self, request: &CallRequest) -> Result<Vec<u8>, RpcError> {
        let state = self.record("eth_call");
        let to = request.to.clone().unwrap_or_default().to_lowercase();
        let token = state
            .tokens
            .get(&to)
            .cloned()
            .ok_or_else(|| RpcError::Response {
                code: -32000,
                message: "execution reverted".into(),
            })?;

        let data = request.data.clone().unwrap_or_default();
        match data.get(..4) {
            Some(selector) if selector == SYMBOL_SELECTOR => Ok(abi_string(&token.symbol)),
            Some(selector) if selector == DECIMALS_SELECTOR => {
                Ok(U256::from(token.decimals).to_be_bytes::<32>().to_vec())
            }
            Some(selector) if selector == BALANCE_OF_SELECTOR => {
                Ok(token.balance.to_be_bytes::<32>().to_vec())
            }
            _ => Err(RpcError::Response {
                code: -32000,
                message: "execution reverted".into(),
            }),
        }
    }
}

fn abi_string(value: &str) -> Vec<u8> {
    let mut out = U256::from(32u64).to_be_bytes::<32>().to_vec();
    out.extend_from_slice(&U256::from(value.len()).to_be_bytes::<32>());
    let mut padded = value.as_bytes().to_vec();
    padded.resize(value.len().div_ceil(32) * 32, 0);
    out.extend_from_slice(&padded);
    out
}

pub fn devnet() -> NetworkInfo {
    NetworkInfo::new("Devnet", DEVNET_URL, "DEV")
        .with_chain_id(DEVNET_CHAIN_ID)
        .with_explorer_url("https://explorer.devnet.test/")
}

pub fn othernet() -> NetworkInfo {
    NetworkInfo::new("Othernet", OTHERNET_URL, "OTH").with_chain_id(OTHERNET_CHAIN_ID)
}

/// A catalog of test networks; `Liar` declares chain 1 but its endpoint
/// reports 56.
pub fn catalog() -> Arc<NetworkCatalog> {
    Arc::new(
        NetworkCatalog::new()
            .with_network(devnet())
            .with_network(othernet())
            .with_network(NetworkInfo::new("Unpinned", UNPINNED_URL, "UNP"))
            .with_network(NetworkInfo::new("Liar", LIAR_URL, "LIE").with_chain_id(1)),
    )
}

pub fn account() -> AccountIdentity {
    AccountIdentity::from_hex(KEY_ONE).unwrap()
}

pub fn config() -> WalletConfig {
    WalletConfig::default()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
