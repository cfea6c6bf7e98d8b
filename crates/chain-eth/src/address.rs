use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::error::EthError;

/// The all-zero address, used as the sentinel for a network's native currency.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Derives an EIP-55 checksummed Ethereum address from an uncompressed secp256k1
/// public key (65 bytes, starting with 0x04).
///
/// The derivation takes the Keccak-256 hash of the 64-byte public key (without
/// the 0x04 prefix) and uses the last 20 bytes as the address.
pub fn pubkey_to_eth_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, EthError> {
    if uncompressed_pubkey[0] != 0x04 {
        return Err(EthError::InvalidPublicKey(
            "uncompressed key must start with 0x04".into(),
        ));
    }

    let hash = Keccak256::digest(&uncompressed_pubkey[1..]);

    let mut addr_bytes = [0u8; 20];
    addr_bytes.copy_from_slice(&hash[12..]);

    checksum_address(&format!("0x{}", hex::encode(addr_bytes)))
}

/// Derives the checksummed address controlled by a raw secp256k1 private key.
pub fn private_key_to_address(private_key: &[u8; 32]) -> Result<String, EthError> {
    let key_bytes = Zeroizing::new(*private_key);
    let signing_key = SigningKey::from_bytes((&*key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;

    let uncompressed = signing_key.verifying_key().to_encoded_point(false);

    let mut key_65 = [0u8; 65];
    key_65.copy_from_slice(uncompressed.as_bytes());

    pubkey_to_eth_address(&key_65)
}

/// Returns `true` only if `address` is 0x + 40 hex characters *and* its letter
/// casing matches the EIP-55 checksum exactly.
///
/// All-lowercase and all-uppercase addresses are rejected unless they happen
/// to contain no letters, since they carry no checksum.
pub fn is_checksum_address(address: &str) -> bool {
    match checksum_address(address) {
        Ok(checksummed) => checksummed == address,
        Err(_) => false,
    }
}

/// Fails with [`EthError::InvalidAddress`] unless `address` is a well-formed,
/// correctly checksummed address.
pub fn require_checksum_address(address: &str) -> Result<(), EthError> {
    let checksummed = checksum_address(address)?;
    if checksummed != address {
        return Err(EthError::InvalidAddress(format!(
            "{address} does not match its EIP-55 checksum"
        )));
    }
    Ok(())
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address.
///
/// The input may be in any case. Returns the checksummed version.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    let hex_part = strip_hex_prefix(address)?.to_lowercase();

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    // EIP-55: hash the lowercase hex address (without 0x).
    let hash = Keccak256::digest(hex_part.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        // High nibble for even positions, low nibble for odd ones.
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }

    Ok(checksummed)
}

/// Parses a 0x-prefixed hex address string (any casing) into raw bytes.
pub fn parse_address(address: &str) -> Result<[u8; 20], EthError> {
    let hex_str = strip_hex_prefix(address)?;

    if hex_str.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_str.len()
        )));
    }

    let bytes = hex::decode(hex_str)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

    let mut addr = [0u8; 20];
    addr.copy_from_slice(&bytes);
    Ok(addr)
}

fn strip_hex_prefix(address: &str) -> Result<&str, EthError> {
    address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))
}
