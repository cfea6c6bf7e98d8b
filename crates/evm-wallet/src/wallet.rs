//! The asynchronous wallet.
//!
//! One `AsyncWallet` owns an account, the network it is connected to and the
//! nonce it will use for the next transaction. Network, provider and nonce
//! live together behind a single async mutex: a network switch replaces all
//! three at once, and `submit` holds the lock from the nonce check through
//! the send and increment.

use std::sync::Arc;

use alloy_primitives::U256;
use chain_eth::address::{checksum_address, require_checksum_address, ZERO_ADDRESS};
use chain_eth::erc20;
use chain_eth::transaction::sign_transaction;
use chain_eth::units::{format_ether, format_units};
use tokio::sync::Mutex;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::account::AccountIdentity;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::network::{NetworkCatalog, NetworkInfo, NetworkReference, NetworkResolver};
use crate::rpc::{CallRequest, Connect, HttpConnector, RpcProvider};
use crate::token::{TokenCache, TokenDescriptor};
use crate::transaction::{ContractCall, TransactionParameters};

struct WalletState<P> {
    network: NetworkInfo,
    chain_id: u64,
    provider: Arc<P>,
    nonce: u64,
}

/// Wallet bound to one account and, at any time, one network.
pub struct AsyncWallet<C: Connect = HttpConnector> {
    connector: C,
    catalog: Arc<NetworkCatalog>,
    config: WalletConfig,
    account: AccountIdentity,
    state: Mutex<WalletState<C::Provider>>,
    tokens: TokenCache,
}

impl AsyncWallet<HttpConnector> {
    /// Connects to `network` over HTTP with the built-in catalog and
    /// configuration read from the environment.
    pub async fn new(
        private_key: &str,
        network: impl Into<NetworkReference>,
    ) -> Result<Self, WalletError> {
        let account = AccountIdentity::from_hex(private_key)?;
        Self::with_http(account, network).await
    }

    /// Like [`new`](Self::new) with a freshly generated key.
    pub async fn create(network: impl Into<NetworkReference>) -> Result<Self, WalletError> {
        Self::with_http(AccountIdentity::random()?, network).await
    }

    async fn with_http(
        account: AccountIdentity,
        network: impl Into<NetworkReference>,
    ) -> Result<Self, WalletError> {
        let config = WalletConfig::from_env();
        let connector = HttpConnector::new(&config)?;
        let catalog = Arc::new(NetworkCatalog::builtin());
        Self::with_connector(connector, catalog, config, account, network).await
    }
}

impl<C: Connect> AsyncWallet<C> {
    pub async fn with_connector(
        connector: C,
        catalog: Arc<NetworkCatalog>,
        config: WalletConfig,
        account: AccountIdentity,
        network: impl Into<NetworkReference>,
    ) -> Result<Self, WalletError> {
        let reference = network.into();
        let state = open_network(&connector, &catalog, &account, &reference).await?;
        info!(
            address = account.address(),
            network = %state.network.name,
            nonce = state.nonce,
            "wallet ready"
        );

        Ok(Self {
            connector,
            catalog,
            config,
            account,
            state: Mutex::new(state),
            tokens: TokenCache::default(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub async fn provider(&self) -> Arc<C::Provider> {
        Arc::clone(&self.state.lock().await.provider)
    }

    pub async fn network(&self) -> NetworkInfo {
        self.state.lock().await.network.clone()
    }

    pub async fn nonce(&self) -> u64 {
        self.state.lock().await.nonce
    }

    pub async fn native_token(&self) -> String {
        self.state.lock().await.network.native_token_symbol.clone()
    }

    pub fn address(&self) -> &str {
        self.account.address()
    }

    pub fn private_key(&self) -> Zeroizing<String> {
        self.account.private_key_hex()
    }

    pub fn catalog(&self) -> &NetworkCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Network
    // -----------------------------------------------------------------------

    /// Moves the wallet to another network.
    ///
    /// The new network is resolved and the nonce re-fetched while the state
    /// lock is held; on failure the wallet stays on its current network.
    pub async fn switch_network(
        &self,
        network: impl Into<NetworkReference>,
    ) -> Result<(), WalletError> {
        let reference = network.into();
        let mut state = self.state.lock().await;
        let next = open_network(&self.connector, &self.catalog, &self.account, &reference).await?;
        info!(
            from = %state.network.name,
            to = %next.network.name,
            nonce = next.nonce,
            "switched network"
        );
        *state = next;
        Ok(())
    }

    pub async fn is_native_token(&self, token: &str) -> bool {
        if token.eq_ignore_ascii_case(ZERO_ADDRESS) {
            return true;
        }
        let state = self.state.lock().await;
        token.eq_ignore_ascii_case(&state.network.native_token_symbol)
    }

    /// Block explorer link for a transaction on the current network.
    pub async fn explorer_url(&self, tx_hash: &str) -> Option<String> {
        self.state.lock().await.network.explorer_tx_url(tx_hash)
    }

    // -----------------------------------------------------------------------
    // Balances and tokens
    // -----------------------------------------------------------------------

    /// Native balance in base units (wei).
    pub async fn get_balance(&self) -> Result<U256, WalletError> {
        let provider = self.provider().await;
        Ok(provider.balance(self.address()).await?)
    }

    /// Native balance in ether units, for display only.
    pub async fn get_balance_ether(&self) -> Result<f64, WalletError> {
        Ok(format_ether(self.get_balance().await?))
    }

    /// `balanceOf(self)` on the token contract, in base units.
    pub async fn get_token_balance(&self, token: &TokenDescriptor) -> Result<U256, WalletError> {
        require_checksum_address(&token.address)?;
        let calldata = erc20::encode_balance_of(self.address())?;
        let provider = self.provider().await;
        let output = provider
            .call(&CallRequest::call(token.address.as_str(), calldata))
            .await?;
        Ok(erc20::decode_balance(&output)?)
    }

    /// Token balance divided by `10^decimals`. Lossy; for display only.
    pub async fn get_token_balance_converted(
        &self,
        token: &TokenDescriptor,
    ) -> Result<f64, WalletError> {
        let balance = self.get_token_balance(token).await?;
        Ok(format_units(balance, token.decimals))
    }

    /// Reads `symbol()` and `decimals()` from an ERC-20 contract.
    ///
    /// `address` must be EIP-55 checksummed; anything else fails before a
    /// request is made.
    pub async fn get_token(&self, address: &str) -> Result<TokenDescriptor, WalletError> {
        require_checksum_address(address)?;

        let (provider, chain_id) = {
            let state = self.state.lock().await;
            (Arc::clone(&state.provider), state.chain_id)
        };

        if self.config.cache_tokens {
            if let Some(token) = self.tokens.get(chain_id, address).await {
                debug!(address, chain_id, "token cache hit");
                return Ok(token);
            }
        }

        let symbol = provider
            .call(&CallRequest::call(address, erc20::encode_symbol()))
            .await?;
        let decimals = provider
            .call(&CallRequest::call(address, erc20::encode_decimals()))
            .await?;

        let token = TokenDescriptor::new(
            address,
            erc20::decode_symbol(&symbol)?,
            erc20::decode_decimals(&decimals)?,
        );

        if self.config.cache_tokens {
            self.tokens.insert(chain_id, token.clone()).await;
        }
        Ok(token)
    }

    // -----------------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------------

    /// Assembles a transaction from the wallet's current address, chain id
    /// and nonce. Does not change the nonce.
    ///
    /// `gas` falls back to the configured default limit and `gas_price` to
    /// the network's suggested price. A `gas` of zero counts as unset.
    pub async fn build_transaction_parameters(
        &self,
        value: U256,
        recipient: Option<&str>,
        data: Option<Vec<u8>>,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TransactionParameters, WalletError> {
        let to = recipient.map(checksum_address).transpose()?;

        let (provider, chain_id, nonce) = {
            let state = self.state.lock().await;
            (Arc::clone(&state.provider), state.chain_id, state.nonce)
        };

        let gas_price = match gas_price {
            Some(price) => price,
            None => provider.gas_price().await?,
        };

        Ok(TransactionParameters {
            from: self.address().to_string(),
            to,
            value,
            data,
            gas: gas.filter(|g| *g > 0).unwrap_or(self.config.default_gas_limit),
            gas_price,
            chain_id,
            nonce,
        })
    }

    /// Gas units the endpoint expects the transaction to consume.
    pub async fn estimate_gas(&self, params: &TransactionParameters) -> Result<u64, WalletError> {
        let provider = self.provider().await;
        let gas = provider.estimate_gas(&params.to_call_request()).await?;
        debug!(gas, nonce = params.nonce, "estimated gas");
        Ok(gas)
    }

    /// Estimated fee (`gas * gas_price`) in ether units, for display only.
    pub async fn estimate_fee_ether(
        &self,
        params: &TransactionParameters,
    ) -> Result<f64, WalletError> {
        let gas = self.estimate_gas(params).await?;
        let fee = U256::from(gas) * U256::from(params.gas_price);
        Ok(format_ether(fee))
    }

    /// Signs and sends `params`, returning the transaction hash.
    ///
    /// The nonce advances by one only after the endpoint accepts the
    /// transaction. Parameters built for another chain or an already used
    /// nonce are rejected without sending.
    pub async fn submit(&self, params: &TransactionParameters) -> Result<String, WalletError> {
        if !params.from.eq_ignore_ascii_case(self.address()) {
            return Err(WalletError::InvalidAddress(format!(
                "transaction is from {}, wallet signs for {}",
                params.from,
                self.address()
            )));
        }

        if params.gas == 0 {
            return Err(WalletError::InvalidAmount("gas limit must be positive".into()));
        }

        let mut state = self.state.lock().await;

        if params.chain_id != state.chain_id {
            return Err(WalletError::ChainIdMismatch {
                network: state.network.name.clone(),
                declared: params.chain_id,
                reported: state.chain_id,
            });
        }
        if params.nonce != state.nonce {
            return Err(WalletError::NonceMismatch {
                expected: state.nonce,
                found: params.nonce,
            });
        }

        let signed = sign_transaction(&params.to_legacy(), self.account.private_key_bytes())?;
        debug!(nonce = state.nonce, tx_hash = %signed.tx_hash, "signed transaction");

        let tx_hash = state.provider.send_raw_transaction(&signed.raw_tx).await?;
        state.nonce += 1;

        info!(
            network = %state.network.name,
            tx_hash = %tx_hash,
            next_nonce = state.nonce,
            "transaction sent"
        );
        Ok(tx_hash)
    }

    /// Builds, optionally estimates, and submits a contract call.
    ///
    /// Without an explicit non-zero `gas` the limit comes from
    /// `eth_estimateGas`.
    pub async fn build_and_submit(
        &self,
        call: ContractCall,
        value: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        let gas = gas.filter(|g| *g > 0);
        let mut params = self
            .build_transaction_parameters(
                value,
                Some(&call.contract),
                Some(call.calldata),
                gas,
                gas_price,
            )
            .await?;

        if gas.is_none() {
            params.gas = self.estimate_gas(&params).await?;
        }

        self.submit(&params).await
    }

    /// ERC-20 `transfer(recipient, amount)`; `amount` is in token base units.
    pub async fn transfer(
        &self,
        token: &TokenDescriptor,
        recipient: &str,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        require_checksum_address(recipient)?;
        require_checksum_address(&token.address)?;

        let calldata = erc20::encode_transfer(recipient, amount)?;
        let call = ContractCall::new(token.address.as_str(), calldata);
        self.build_and_submit(call, U256::ZERO, gas, gas_price).await
    }

    /// ERC-20 `approve(spender, amount)`; `amount` is in token base units.
    pub async fn approve(
        &self,
        token: &TokenDescriptor,
        spender: &str,
        amount: U256,
    ) -> Result<String, WalletError> {
        require_checksum_address(spender)?;
        require_checksum_address(&token.address)?;

        let calldata = erc20::encode_approve(spender, amount)?;
        let call = ContractCall::new(token.address.as_str(), calldata);
        self.build_and_submit(call, U256::ZERO, None, None).await
    }

    /// Sends `amount` wei of the native currency to `recipient`.
    pub async fn send_native(
        &self,
        recipient: &str,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        require_checksum_address(recipient)?;
        let gas = gas.filter(|g| *g > 0);

        let mut params = self
            .build_transaction_parameters(amount, Some(recipient), None, gas, gas_price)
            .await?;
        if gas.is_none() {
            params.gas = self.estimate_gas(&params).await?;
        }

        self.submit(&params).await
    }
}

async fn open_network<C: Connect>(
    connector: &C,
    catalog: &NetworkCatalog,
    account: &AccountIdentity,
    reference: &NetworkReference,
) -> Result<WalletState<C::Provider>, WalletError> {
    let resolver = NetworkResolver::new(catalog, connector);
    let (network, provider) = resolver.resolve_connected(reference).await?;
    let chain_id = network.chain_id.ok_or_else(|| {
        WalletError::Runtime(format!("{} resolved without a chain id", network.name))
    })?;

    let nonce = provider.transaction_count(account.address()).await?;
    debug!(network = %network.name, nonce, "fetched account nonce");

    Ok(WalletState {
        network,
        chain_id,
        provider: Arc::new(provider),
        nonce,
    })
}
