//! Network selection: the catalog of known networks, references to them,
//! and resolution against a live endpoint.

use std::collections::BTreeMap;
use std::fmt;

use chain_eth::chains::{supported_chains, EvmChain};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::WalletError;
use crate::rpc::{Connect, RpcProvider};

/// Connection and chain metadata for one network.
///
/// After [`NetworkResolver::resolve`] the `chain_id` is always `Some` and
/// equals what the endpoint reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub name: String,
    pub rpc_url: String,
    pub native_token_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

impl NetworkInfo {
    pub fn new(
        name: impl Into<String>,
        rpc_url: impl Into<String>,
        native_token_symbol: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rpc_url: rpc_url.into(),
            native_token_symbol: native_token_symbol.into(),
            chain_id: None,
            explorer_url: None,
        }
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_explorer_url(mut self, explorer_url: impl Into<String>) -> Self {
        self.explorer_url = Some(explorer_url.into());
        self
    }

    /// Link to a transaction on this network's block explorer.
    pub fn explorer_tx_url(&self, tx_hash: &str) -> Option<String> {
        let base = self.explorer_url.as_deref()?.trim_end_matches('/');
        Some(format!("{base}/tx/{tx_hash}"))
    }

    /// Structural check for caller-supplied records.
    fn validate(&self) -> Result<(), WalletError> {
        let invalid = || WalletError::InvalidNetworkReference(self.to_string());

        if self.name.trim().is_empty() || self.native_token_symbol.trim().is_empty() {
            return Err(invalid());
        }

        let url = Url::parse(&self.rpc_url).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }

        Ok(())
    }
}

impl fmt::Display for NetworkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{name: {:?}, rpcUrl: {:?}, nativeTokenSymbol: {:?}}}",
            self.name, self.rpc_url, self.native_token_symbol
        )
    }
}

impl From<&EvmChain> for NetworkInfo {
    fn from(chain: &EvmChain) -> Self {
        Self {
            name: chain.identifier.to_string(),
            rpc_url: chain.rpc_url.to_string(),
            native_token_symbol: chain.symbol.to_string(),
            chain_id: chain.chain_id,
            explorer_url: chain.explorer_url.map(str::to_string),
        }
    }
}

/// Either the identifier of a catalog entry or a complete custom record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkReference {
    Known(String),
    Custom(NetworkInfo),
}

impl From<&str> for NetworkReference {
    fn from(identifier: &str) -> Self {
        NetworkReference::Known(identifier.to_string())
    }
}

impl From<String> for NetworkReference {
    fn from(identifier: String) -> Self {
        NetworkReference::Known(identifier)
    }
}

impl From<NetworkInfo> for NetworkReference {
    fn from(info: NetworkInfo) -> Self {
        NetworkReference::Custom(info)
    }
}

impl fmt::Display for NetworkReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkReference::Known(identifier) => write!(f, "{identifier:?}"),
            NetworkReference::Custom(info) => fmt::Display::fmt(info, f),
        }
    }
}

/// Table of networks that can be referenced by identifier.
///
/// Immutable once built; wallets hold it behind an `Arc` so tests can inject
/// their own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCatalog {
    networks: BTreeMap<String, NetworkInfo>,
}

impl NetworkCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self {
            networks: BTreeMap::new(),
        }
    }

    /// The built-in networks from [`chain_eth::chains`].
    pub fn builtin() -> Self {
        supported_chains()
            .into_iter()
            .map(NetworkInfo::from)
            .fold(Self::new(), Self::with_network)
    }

    /// Adds (or replaces) an entry keyed by its `name`.
    pub fn with_network(mut self, info: NetworkInfo) -> Self {
        self.networks.insert(info.name.clone(), info);
        self
    }

    pub fn get(&self, identifier: &str) -> Option<&NetworkInfo> {
        self.networks.get(identifier)
    }

    /// Identifiers in sorted order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl Default for NetworkCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Turns a [`NetworkReference`] into a fully populated [`NetworkInfo`].
pub struct NetworkResolver<'a, C> {
    catalog: &'a NetworkCatalog,
    connector: &'a C,
}

impl<'a, C: Connect> NetworkResolver<'a, C> {
    pub fn new(catalog: &'a NetworkCatalog, connector: &'a C) -> Self {
        Self { catalog, connector }
    }

    /// The record a reference names, before any network query.
    pub fn candidate(&self, reference: &NetworkReference) -> Result<NetworkInfo, WalletError> {
        match reference {
            NetworkReference::Known(identifier) => self
                .catalog
                .get(identifier)
                .cloned()
                .ok_or_else(|| WalletError::InvalidNetworkReference(format!("{identifier:?}"))),
            NetworkReference::Custom(info) => {
                info.validate()?;
                Ok(info.clone())
            }
        }
    }

    /// Resolves `reference` and cross-checks its chain id against the
    /// endpoint.
    pub async fn resolve(&self, reference: &NetworkReference) -> Result<NetworkInfo, WalletError> {
        let (info, _provider) = self.resolve_connected(reference).await?;
        Ok(info)
    }

    /// Like [`resolve`](Self::resolve), also handing back the provider used
    /// for the chain id query.
    pub async fn resolve_connected(
        &self,
        reference: &NetworkReference,
    ) -> Result<(NetworkInfo, C::Provider), WalletError> {
        let mut info = self.candidate(reference)?;
        let provider = self.connector.connect(&info.rpc_url)?;
        let reported = provider.chain_id().await?;
        debug!(network = %info.name, reported, declared = ?info.chain_id, "endpoint chain id");

        match info.chain_id {
            Some(declared) if declared != reported => {
                return Err(WalletError::ChainIdMismatch {
                    network: info.name,
                    declared,
                    reported,
                });
            }
            Some(_) => {}
            None => info.chain_id = Some(reported),
        }

        info!(network = %info.name, chain_id = reported, "resolved network");
        Ok((info, provider))
    }
}
