use std::fmt;

use chain_eth::address::private_key_to_address;
use secrecy::{ExposeSecret, SecretBox};
use zeroize::Zeroizing;

use crate::error::WalletError;

/// A secp256k1 key and the checksummed address derived from it.
///
/// The address is computed once at construction. The key is zeroed on drop
/// and never appears in `Debug` output.
pub struct AccountIdentity {
    private_key: SecretBox<[u8; 32]>,
    address: String,
}

impl AccountIdentity {
    pub fn from_bytes(private_key: [u8; 32]) -> Result<Self, WalletError> {
        let private_key = SecretBox::new(Box::new(private_key));
        let address = private_key_to_address(private_key.expose_secret())?;
        Ok(Self {
            private_key,
            address,
        })
    }

    /// Parses a 32-byte hex key, with or without a `0x` prefix.
    pub fn from_hex(private_key: &str) -> Result<Self, WalletError> {
        let trimmed = private_key.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if stripped.len() != 64 {
            return Err(WalletError::InvalidPrivateKey(format!(
                "expected 64 hex characters, got {}",
                stripped.len()
            )));
        }

        let decoded = Zeroizing::new(
            hex::decode(stripped)
                .map_err(|e| WalletError::InvalidPrivateKey(format!("invalid hex: {e}")))?,
        );
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&decoded);
        Self::from_bytes(*key)
    }

    /// A fresh key from the operating system's CSPRNG.
    pub fn random() -> Result<Self, WalletError> {
        let secret = k256::SecretKey::random(&mut rand::rngs::OsRng);
        let mut key = Zeroizing::new([0u8; 32]);
        key.copy_from_slice(&secret.to_bytes());
        Self::from_bytes(*key)
    }

    /// EIP-55 checksummed address.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn private_key_bytes(&self) -> &[u8; 32] {
        self.private_key.expose_secret()
    }

    /// `0x`-prefixed hex of the private key.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.private_key.expose_secret())))
    }
}

impl fmt::Debug for AccountIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountIdentity")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
