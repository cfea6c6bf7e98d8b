use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// ERC-20 contract metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenDescriptor {
    /// Checksummed contract address.
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenDescriptor {
    pub fn new(address: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}

/// Memoized token lookups keyed by `(chain_id, address)`.
///
/// Symbol and decimals are fixed at deployment, so entries never expire.
#[derive(Debug, Default)]
pub(crate) struct TokenCache {
    entries: Mutex<HashMap<(u64, String), TokenDescriptor>>,
}

impl TokenCache {
    pub(crate) async fn get(&self, chain_id: u64, address: &str) -> Option<TokenDescriptor> {
        self.entries
            .lock()
            .await
            .get(&(chain_id, address.to_string()))
            .cloned()
    }

    pub(crate) async fn insert(&self, chain_id: u64, token: TokenDescriptor) {
        self.entries
            .lock()
            .await
            .insert((chain_id, token.address.clone()), token);
    }
}
