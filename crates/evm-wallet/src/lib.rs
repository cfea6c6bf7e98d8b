//! A wallet over EVM JSON-RPC.
//!
//! [`AsyncWallet`] signs and submits legacy transactions for one account,
//! tracks the account nonce, and looks up ERC-20 metadata and balances on any
//! network in the [`NetworkCatalog`] or a caller-supplied [`NetworkInfo`].
//! [`Wallet`] is the same wallet behind a blocking interface.
//!
//! ```no_run
//! use evm_wallet::{AsyncWallet, WalletError};
//!
//! # async fn run() -> Result<(), WalletError> {
//! let wallet = AsyncWallet::new("0x...", "BSC").await?;
//! let usdc = wallet
//!     .get_token("0x8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d")
//!     .await?;
//! println!("{} {}", usdc.symbol, wallet.get_token_balance_converted(&usdc).await?);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod blocking;
pub mod config;
pub mod error;
pub mod network;
pub mod rpc;
pub mod token;
pub mod transaction;
pub mod wallet;

pub use account::AccountIdentity;
pub use blocking::Wallet;
pub use config::WalletConfig;
pub use error::WalletError;
pub use network::{NetworkCatalog, NetworkInfo, NetworkReference, NetworkResolver};
pub use rpc::{CallRequest, Connect, HttpConnector, HttpProvider, RpcError, RpcProvider};
pub use token::TokenDescriptor;
pub use transaction::{ContractCall, TransactionParameters};
pub use wallet::AsyncWallet;

pub use alloy_primitives::U256;
