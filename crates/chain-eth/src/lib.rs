//! EVM chain primitives for the wallet.
//!
//! This crate performs no I/O. It provides:
//! - EIP-55 checksummed address derivation and validation
//! - Legacy (EIP-155) transaction signing
//! - ERC-20 call encoding and return-data decoding
//! - The built-in catalog of supported EVM networks
//! - Base-unit / display-unit conversions

pub mod abi;
pub mod address;
pub mod chains;
pub mod erc20;
pub mod error;
pub mod transaction;
pub mod units;
