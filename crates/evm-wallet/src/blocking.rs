//! Blocking front end for callers without an async runtime.
//!
//! [`Wallet`] owns a current-thread tokio runtime and an [`AsyncWallet`];
//! every method drives the corresponding async method to completion. It
//! holds no state of its own, so nonce and network handling are exactly
//! those of the async wallet.
//!
//! Fallible methods called from inside another tokio runtime fail with
//! [`WalletError::Runtime`]. The infallible accessors panic there instead.

use std::future::Future;
use std::sync::Arc;

use alloy_primitives::U256;
use tokio::runtime::{Builder, Handle, Runtime};
use zeroize::Zeroizing;

use crate::account::AccountIdentity;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::network::{NetworkCatalog, NetworkInfo, NetworkReference};
use crate::rpc::{Connect, HttpConnector};
use crate::token::TokenDescriptor;
use crate::transaction::{ContractCall, TransactionParameters};
use crate::wallet::AsyncWallet;

/// Synchronous wallet over a private current-thread runtime.
///
/// # Panics
///
/// [`provider`](Self::provider), [`network`](Self::network),
/// [`nonce`](Self::nonce), [`native_token`](Self::native_token),
/// [`is_native_token`](Self::is_native_token) and
/// [`explorer_url`](Self::explorer_url) panic when called from within an
/// async runtime. The fallible operations return [`WalletError::Runtime`].
pub struct Wallet<C: Connect = HttpConnector> {
    inner: AsyncWallet<C>,
    runtime: Runtime,
}

fn outside_runtime() -> Result<(), WalletError> {
    if Handle::try_current().is_ok() {
        return Err(WalletError::Runtime(
            "blocking wallet cannot be used inside an async runtime, use AsyncWallet".into(),
        ));
    }
    Ok(())
}

fn build_runtime() -> Result<Runtime, WalletError> {
    outside_runtime()?;
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| WalletError::Runtime(e.to_string()))
}

impl Wallet<HttpConnector> {
    pub fn new(private_key: &str, network: impl Into<NetworkReference>) -> Result<Self, WalletError> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(AsyncWallet::new(private_key, network))?;
        Ok(Self { inner, runtime })
    }

    pub fn create(network: impl Into<NetworkReference>) -> Result<Self, WalletError> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(AsyncWallet::create(network))?;
        Ok(Self { inner, runtime })
    }
}

impl<C: Connect> Wallet<C> {
    pub fn with_connector(
        connector: C,
        catalog: Arc<NetworkCatalog>,
        config: WalletConfig,
        account: AccountIdentity,
        network: impl Into<NetworkReference>,
    ) -> Result<Self, WalletError> {
        let runtime = build_runtime()?;
        let inner = runtime.block_on(AsyncWallet::with_connector(
            connector, catalog, config, account, network,
        ))?;
        Ok(Self { inner, runtime })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    fn run<T, F>(&self, future: F) -> Result<T, WalletError>
    where
        F: Future<Output = Result<T, WalletError>>,
    {
        outside_runtime()?;
        self.runtime.block_on(future)
    }

    /// The wrapped async wallet.
    pub fn as_async(&self) -> &AsyncWallet<C> {
        &self.inner
    }

    pub fn provider(&self) -> Arc<C::Provider> {
        self.block_on(self.inner.provider())
    }

    pub fn network(&self) -> NetworkInfo {
        self.block_on(self.inner.network())
    }

    pub fn nonce(&self) -> u64 {
        self.block_on(self.inner.nonce())
    }

    pub fn native_token(&self) -> String {
        self.block_on(self.inner.native_token())
    }

    pub fn address(&self) -> &str {
        self.inner.address()
    }

    pub fn private_key(&self) -> Zeroizing<String> {
        self.inner.private_key()
    }

    pub fn catalog(&self) -> &NetworkCatalog {
        self.inner.catalog()
    }

    pub fn switch_network(&self, network: impl Into<NetworkReference>) -> Result<(), WalletError> {
        self.run(self.inner.switch_network(network))
    }

    pub fn is_native_token(&self, token: &str) -> bool {
        self.block_on(self.inner.is_native_token(token))
    }

    pub fn explorer_url(&self, tx_hash: &str) -> Option<String> {
        self.block_on(self.inner.explorer_url(tx_hash))
    }

    pub fn get_balance(&self) -> Result<U256, WalletError> {
        self.run(self.inner.get_balance())
    }

    pub fn get_balance_ether(&self) -> Result<f64, WalletError> {
        self.run(self.inner.get_balance_ether())
    }

    pub fn get_token_balance(&self, token: &TokenDescriptor) -> Result<U256, WalletError> {
        self.run(self.inner.get_token_balance(token))
    }

    pub fn get_token_balance_converted(&self, token: &TokenDescriptor) -> Result<f64, WalletError> {
        self.run(self.inner.get_token_balance_converted(token))
    }

    pub fn get_token(&self, address: &str) -> Result<TokenDescriptor, WalletError> {
        self.run(self.inner.get_token(address))
    }

    pub fn build_transaction_parameters(
        &self,
        value: U256,
        recipient: Option<&str>,
        data: Option<Vec<u8>>,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<TransactionParameters, WalletError> {
        self.run(
            self.inner
                .build_transaction_parameters(value, recipient, data, gas, gas_price),
        )
    }

    pub fn estimate_gas(&self, params: &TransactionParameters) -> Result<u64, WalletError> {
        self.run(self.inner.estimate_gas(params))
    }

    pub fn estimate_fee_ether(&self, params: &TransactionParameters) -> Result<f64, WalletError> {
        self.run(self.inner.estimate_fee_ether(params))
    }

    pub fn submit(&self, params: &TransactionParameters) -> Result<String, WalletError> {
        self.run(self.inner.submit(params))
    }

    pub fn build_and_submit(
        &self,
        call: ContractCall,
        value: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        self.run(self.inner.build_and_submit(call, value, gas, gas_price))
    }

    pub fn transfer(
        &self,
        token: &TokenDescriptor,
        recipient: &str,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        self.run(self.inner.transfer(token, recipient, amount, gas, gas_price))
    }

    pub fn approve(
        &self,
        token: &TokenDescriptor,
        spender: &str,
        amount: U256,
    ) -> Result<String, WalletError> {
        self.run(self.inner.approve(token, spender, amount))
    }

    pub fn send_native(
        &self,
        recipient: &str,
        amount: U256,
        gas: Option<u64>,
        gas_price: Option<u128>,
    ) -> Result<String, WalletError> {
        self.run(self.inner.send_native(recipient, amount, gas, gas_price))
    }
}
