//! Minimal ABI encoding and decoding for EVM function calls.
//!
//! Covers exactly what the ERC-20 surface needs: static address/uint256
//! arguments on the way in, and uint256 or string return values on the way out.

use alloy_primitives::U256;

use crate::error::EthError;

const WORD: usize = 32;

/// A single ABI-encoded parameter.
#[derive(Debug, Clone)]
pub enum AbiParam {
    /// A 20-byte Ethereum address, left-padded to 32 bytes.
    Address([u8; 20]),
    /// A 256-bit unsigned integer.
    Uint256(U256),
}

/// Encodes a function call with the given 4-byte selector and ABI parameters.
///
/// The output is `selector || encode(params[0]) || encode(params[1]) || ...`
/// where each parameter is encoded as a 32-byte ABI word.
pub fn encode_function_call(selector: [u8; 4], params: &[AbiParam]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + params.len() * WORD);
    data.extend_from_slice(&selector);

    for param in params {
        data.extend_from_slice(&encode_param(param));
    }

    data
}

fn encode_param(param: &AbiParam) -> [u8; WORD] {
    match param {
        AbiParam::Address(addr) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr);
            word
        }
        AbiParam::Uint256(value) => value.to_be_bytes::<WORD>(),
    }
}

/// Decodes a single uint256 return value. Trailing words are ignored.
pub fn decode_uint256(data: &[u8]) -> Result<U256, EthError> {
    let word = read_word(data, 0)?;
    Ok(U256::from_be_slice(word))
}

/// Decodes a `string` return value.
///
/// Some early tokens declare `symbol()` as `bytes32`; a return payload of
/// exactly one word is therefore read as a NUL-padded fixed string.
pub fn decode_string(data: &[u8]) -> Result<String, EthError> {
    if data.len() == WORD {
        return decode_bytes32_string(data);
    }

    let offset = word_to_usize(read_word(data, 0)?)?;
    let len_word = read_word(data, offset)?;
    let len = word_to_usize(len_word)?;

    let start = offset + WORD;
    let end = start
        .checked_add(len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| {
            EthError::DecodingError(format!(
                "string of length {len} at offset {offset} exceeds {} bytes of return data",
                data.len()
            ))
        })?;

    String::from_utf8(data[start..end].to_vec())
        .map_err(|e| EthError::DecodingError(format!("string is not utf-8: {e}")))
}

fn decode_bytes32_string(data: &[u8]) -> Result<String, EthError> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    String::from_utf8(data[..end].to_vec())
        .map_err(|e| EthError::DecodingError(format!("bytes32 is not utf-8: {e}")))
}

fn read_word(data: &[u8], offset: usize) -> Result<&[u8], EthError> {
    offset
        .checked_add(WORD)
        .and_then(|end| data.get(offset..end))
        .ok_or_else(|| {
            EthError::DecodingError(format!(
                "expected a 32-byte word at offset {offset}, got {} bytes",
                data.len()
            ))
        })
}

fn word_to_usize(word: &[u8]) -> Result<usize, EthError> {
    let value = U256::from_be_slice(word);
    usize::try_from(value)
        .map_err(|_| EthError::DecodingError(format!("offset {value} does not fit in usize")))
}
