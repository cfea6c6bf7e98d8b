//! The standard ERC-20 interface, compiled in.
//!
//! Every token contract is addressed through the same five functions, so the
//! selectors below are the whole "ABI" the wallet ever needs.

use alloy_primitives::U256;

use crate::abi::{self, encode_function_call, AbiParam};
use crate::address::parse_address;
use crate::error::EthError;

/// Function selector for `transfer(address,uint256)`: `0xa9059cbb`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];

/// Function selector for `balanceOf(address)`: `0x70a08231`.
pub const BALANCE_OF_SELECTOR: [u8; 4] = [0x70, 0xa0, 0x82, 0x31];

/// Function selector for `approve(address,uint256)`: `0x095ea7b3`.
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];

/// Function selector for `symbol()`: `0x95d89b41`.
pub const SYMBOL_SELECTOR: [u8; 4] = [0x95, 0xd8, 0x9b, 0x41];

/// Function selector for `decimals()`: `0x313ce567`.
pub const DECIMALS_SELECTOR: [u8; 4] = [0x31, 0x3c, 0xe5, 0x67];

/// Encodes an ERC-20 `transfer(address,uint256)` call.
pub fn encode_transfer(to: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(to)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(TRANSFER_SELECTOR, &params))
}

/// Encodes an ERC-20 `balanceOf(address)` call.
pub fn encode_balance_of(owner: &str) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(owner)?;
    Ok(encode_function_call(
        BALANCE_OF_SELECTOR,
        &[AbiParam::Address(addr)],
    ))
}

/// Encodes an ERC-20 `approve(address,uint256)` call.
pub fn encode_approve(spender: &str, amount: U256) -> Result<Vec<u8>, EthError> {
    let addr = parse_address(spender)?;
    let params = [AbiParam::Address(addr), AbiParam::Uint256(amount)];
    Ok(encode_function_call(APPROVE_SELECTOR, &params))
}

/// Encodes an ERC-20 `symbol()` call.
pub fn encode_symbol() -> Vec<u8> {
    encode_function_call(SYMBOL_SELECTOR, &[])
}

/// Encodes an ERC-20 `decimals()` call.
pub fn encode_decimals() -> Vec<u8> {
    encode_function_call(DECIMALS_SELECTOR, &[])
}

/// Decodes the return data of `balanceOf`.
pub fn decode_balance(data: &[u8]) -> Result<U256, EthError> {
    abi::decode_uint256(data)
}

/// Decodes the return data of `symbol`.
pub fn decode_symbol(data: &[u8]) -> Result<String, EthError> {
    abi::decode_string(data)
}

/// Decodes the return data of `decimals`, which must fit in a `u8`.
pub fn decode_decimals(data: &[u8]) -> Result<u8, EthError> {
    let value = abi::decode_uint256(data)?;
    u8::try_from(value)
        .map_err(|_| EthError::DecodingError(format!("decimals {value} exceeds 255")))
}
