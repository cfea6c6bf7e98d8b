use chain_eth::error::EthError;
use thiserror::Error;

use crate::rpc::RpcError;

/// Everything a wallet operation can fail with.
///
/// Configuration errors (bad network, address, key, stale parameters) are
/// distinguishable from transport errors so callers can retry selectively.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error(
        "network must be a supported network identifier or a complete custom network record, got: {0}"
    )]
    InvalidNetworkReference(String),

    #[error("chain id mismatch on {network}: declared {declared}, endpoint reports {reported}")]
    ChainIdMismatch {
        network: String,
        declared: u64,
        reported: u64,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("nonce mismatch: wallet is at {expected}, transaction carries {found}")]
    NonceMismatch { expected: u64, found: u64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("rpc error: {0}")]
    Rpc(#[from] RpcError),

    #[error("runtime error: {0}")]
    Runtime(String),
}

impl WalletError {
    /// `true` for errors caused by the caller's input or the wallet's
    /// configuration; retrying without changing the input will fail again.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidNetworkReference(_)
                | WalletError::ChainIdMismatch { .. }
                | WalletError::InvalidAddress(_)
                | WalletError::InvalidPrivateKey(_)
                | WalletError::NonceMismatch { .. }
                | WalletError::InvalidAmount(_)
        )
    }

    /// `true` for failures reported by the RPC transport or endpoint.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, WalletError::Rpc(_))
    }
}

impl From<EthError> for WalletError {
    fn from(e: EthError) -> Self {
        match e {
            EthError::InvalidAddress(msg) => WalletError::InvalidAddress(msg),
            EthError::InvalidPrivateKey(msg) | EthError::InvalidPublicKey(msg) => {
                WalletError::InvalidPrivateKey(msg)
            }
            EthError::InvalidAmount(msg) => WalletError::InvalidAmount(msg),
            EthError::SigningError(msg) => WalletError::Signing(msg),
            EthError::EncodingError(msg) | EthError::DecodingError(msg) => {
                WalletError::Encoding(msg)
            }
        }
    }
}
