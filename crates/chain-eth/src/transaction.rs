use alloy_primitives::U256;
use alloy_rlp::{Encodable, RlpEncodable};
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{RecoveryId, Signature, SigningKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::address::parse_address;
use crate::error::EthError;

/// An unsigned legacy (type 0) transaction, replay-protected with EIP-155.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// Recipient as a 0x-prefixed hex string, `None` for contract creation.
    pub to: Option<String>,
    /// Value in base units (wei).
    pub value: U256,
    /// Calldata (empty for plain value transfers).
    pub data: Vec<u8>,
}

/// A signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone)]
pub struct SignedEthTransaction {
    /// RLP-encoded signed transaction bytes.
    pub raw_tx: Vec<u8>,
    /// Transaction hash as a 0x-prefixed hex string.
    pub tx_hash: String,
}

/// Returns the EIP-155 signing payload:
/// `rlp([nonce, gasPrice, gas, to, value, data, chainId, 0, 0])`.
pub fn encode_signing_payload(tx: &LegacyTransaction) -> Result<Vec<u8>, EthError> {
    let fields = UnsignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: RlpTo::parse(tx.to.as_deref())?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpBytes(tx.data.clone()),
        chain_id: tx.chain_id,
        empty_r: 0,
        empty_s: 0,
    };

    let mut out = Vec::with_capacity(fields.length());
    fields.encode(&mut out);
    Ok(out)
}

/// Keccak-256 of the EIP-155 signing payload.
pub fn signing_hash(tx: &LegacyTransaction) -> Result<[u8; 32], EthError> {
    let payload = encode_signing_payload(tx)?;
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&Keccak256::digest(&payload));
    Ok(hash)
}

/// Signs a legacy transaction with the given secp256k1 private key.
///
/// The signed form is `rlp([nonce, gasPrice, gas, to, value, data, v, r, s])`
/// with `v = recovery_id + 35 + 2 * chain_id`.
pub fn sign_transaction(
    tx: &LegacyTransaction,
    private_key: &[u8; 32],
) -> Result<SignedEthTransaction, EthError> {
    let msg_hash = signing_hash(tx)?;
    let (signature, recovery_id) = sign_prehash(&msg_hash, private_key)?;

    let v = tx
        .chain_id
        .checked_mul(2)
        .and_then(|id| id.checked_add(35 + recovery_id.is_y_odd() as u64))
        .ok_or_else(|| {
            EthError::SigningError(format!("chain id {} overflows EIP-155 v", tx.chain_id))
        })?;

    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&signature.r().to_bytes());
    s_bytes.copy_from_slice(&signature.s().to_bytes());

    let signed_fields = SignedTxFields {
        nonce: tx.nonce,
        gas_price: tx.gas_price,
        gas_limit: tx.gas_limit,
        to: RlpTo::parse(tx.to.as_deref())?,
        value: RlpU256(tx.value.to_be_bytes::<32>()),
        data: RlpBytes(tx.data.clone()),
        v,
        r: RlpU256(r_bytes),
        s: RlpU256(s_bytes),
    };

    let mut raw_tx = Vec::with_capacity(signed_fields.length());
    signed_fields.encode(&mut raw_tx);

    let tx_hash = Keccak256::digest(&raw_tx);

    Ok(SignedEthTransaction {
        raw_tx,
        tx_hash: format!("0x{}", hex::encode(tx_hash)),
    })
}

fn sign_prehash(
    msg_hash: &[u8; 32],
    private_key: &[u8; 32],
) -> Result<(Signature, RecoveryId), EthError> {
    let key_bytes = Zeroizing::new(*private_key);
    let signing_key = SigningKey::from_bytes((&*key_bytes).into())
        .map_err(|e| EthError::InvalidPrivateKey(e.to_string()))?;

    signing_key
        .sign_prehash(msg_hash)
        .map_err(|e| EthError::SigningError(e.to_string()))
}

// ---------------------------------------------------------------------------
// RLP-encodable structures
// ---------------------------------------------------------------------------

#[derive(RlpEncodable)]
struct UnsignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpTo,
    value: RlpU256,
    data: RlpBytes,
    chain_id: u64,
    empty_r: u8,
    empty_s: u8,
}

#[derive(RlpEncodable)]
struct SignedTxFields {
    nonce: u64,
    gas_price: u128,
    gas_limit: u64,
    to: RlpTo,
    value: RlpU256,
    data: RlpBytes,
    v: u64,
    r: RlpU256,
    s: RlpU256,
}

/// Recipient field: a 20-byte string, or the empty string for contract creation.
#[derive(Debug, Clone)]
struct RlpTo(Option<[u8; 20]>);

impl RlpTo {
    fn parse(to: Option<&str>) -> Result<Self, EthError> {
        to.map(parse_address).transpose().map(Self)
    }

    fn as_slice(&self) -> &[u8] {
        match &self.0 {
            Some(addr) => addr.as_slice(),
            None => &[],
        }
    }
}

impl Encodable for RlpTo {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.as_slice().length()
    }
}

/// Wrapper for a 256-bit integer (32 bytes) that encodes as minimal big-endian
/// bytes with leading zeros stripped (standard RLP integer encoding).
#[derive(Debug, Clone)]
struct RlpU256([u8; 32]);

impl RlpU256 {
    fn trimmed(&self) -> &[u8] {
        let start = self.0.iter().position(|&b| b != 0).unwrap_or(32);
        &self.0[start..]
    }
}

impl Encodable for RlpU256 {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.trimmed().encode(out);
    }

    fn length(&self) -> usize {
        self.trimmed().length()
    }
}

/// Calldata encoded as a single RLP byte string.
#[derive(Debug, Clone)]
struct RlpBytes(Vec<u8>);

impl Encodable for RlpBytes {
    fn encode(&self, out: &mut dyn alloy_rlp::BufMut) {
        self.0.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        self.0.as_slice().length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{pubkey_to_eth_address, private_key_to_address};
    use k256::ecdsa::VerifyingKey;

    /// Private key from the EIP-155 worked example.
    const EIP155_KEY: [u8; 32] = [0x46; 32];

    fn eip155_example() -> LegacyTransaction {
        LegacyTransaction {
            chain_id: 1,
            nonce: 9,
            gas_price: 20_000_000_000,
            gas_limit: 21_000,
            to: Some("0x3535353535353535353535353535353535353535".into()),
            value: U256::from(1_000_000_000_000_000_000u128),
            data: Vec::new(),
        }
    }

    #[test]
    fn signing_payload_matches_eip155_example() {
        let payload = encode_signing_payload(&eip155_example()).unwrap();
        assert_eq!(
            hex::encode(payload),
            "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080"
        );
    }

    #[test]
    fn signing_hash_matches_eip155_example() {
        let hash = signing_hash(&eip155_example()).unwrap();
        assert_eq!(
            hex::encode(hash),
            "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
        );
    }

    #[test]
    fn signature_recovers_signer_address() {
        let tx = eip155_example();
        let hash = signing_hash(&tx).unwrap();
        let (signature, recovery_id) = sign_prehash(&hash, &EIP155_KEY).unwrap();

        let recovered = VerifyingKey::recover_from_prehash(&hash, &signature, recovery_id).unwrap();
        let point = recovered.to_encoded_point(false);
        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(point.as_bytes());

        assert_eq!(
            pubkey_to_eth_address(&key_65).unwrap(),
            private_key_to_address(&EIP155_KEY).unwrap()
        );
    }

    #[test]
    fn signed_tx_carries_eip155_v() {
        let signed = sign_transaction(&eip155_example(), &EIP155_KEY).unwrap();

        let fields: Vec<alloy_rlp::Bytes> =
            alloy_rlp::Decodable::decode(&mut signed.raw_tx.as_slice()).unwrap();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[6].len(), 1);
        assert!(fields[6][0] == 37 || fields[6][0] == 38, "unexpected v {}", fields[6][0]);
    }

    #[test]
    fn sign_transaction_produces_hash() {
        let signed = sign_transaction(&eip155_example(), &EIP155_KEY).unwrap();

        assert!(signed.tx_hash.starts_with("0x"));
        assert_eq!(signed.tx_hash.len(), 66);
        assert_eq!(
            signed.tx_hash,
            format!("0x{}", hex::encode(Keccak256::digest(&signed.raw_tx)))
        );
    }

    #[test]
    fn sign_transaction_is_deterministic() {
        let tx = eip155_example();
        let a = sign_transaction(&tx, &EIP155_KEY).unwrap();
        let b = sign_transaction(&tx, &EIP155_KEY).unwrap();
        assert_eq!(a.raw_tx, b.raw_tx);
        assert_eq!(a.tx_hash, b.tx_hash);
    }

    #[test]
    fn different_nonces_produce_different_hashes() {
        let tx1 = eip155_example();
        let tx2 = LegacyTransaction {
            nonce: 10,
            ..eip155_example()
        };

        let a = sign_transaction(&tx1, &EIP155_KEY).unwrap();
        let b = sign_transaction(&tx2, &EIP155_KEY).unwrap();
        assert_ne!(a.tx_hash, b.tx_hash);
    }

    #[test]
    fn different_chains_produce_different_payloads() {
        let tx1 = eip155_example();
        let tx2 = LegacyTransaction {
            chain_id: 56,
            ..eip155_example()
        };
        assert_ne!(signing_hash(&tx1).unwrap(), signing_hash(&tx2).unwrap());
    }

    #[test]
    fn contract_creation_encodes_empty_recipient() {
        let tx = LegacyTransaction {
            to: None,
            ..eip155_example()
        };
        let payload = encode_signing_payload(&tx).unwrap();

        // gas (0x825208) is followed directly by the empty string 0x80.
        let gas_end = payload
            .windows(3)
            .position(|w| w == [0x82, 0x52, 0x08])
            .unwrap()
            + 3;
        assert_eq!(payload[gas_end], 0x80);
    }

    #[test]
    fn calldata_is_encoded_as_byte_string() {
        let tx = LegacyTransaction {
            data: vec![0xa9, 0x05, 0x9c, 0xbb],
            ..eip155_example()
        };
        let payload = encode_signing_payload(&tx).unwrap();
        let needle = [0x84, 0xa9, 0x05, 0x9c, 0xbb];
        assert!(payload.windows(5).any(|w| w == needle));
    }

    #[test]
    fn invalid_private_key_is_rejected() {
        let result = sign_transaction(&eip155_example(), &[0u8; 32]);
        assert!(matches!(result, Err(EthError::InvalidPrivateKey(_))));
    }

    #[test]
    fn invalid_recipient_is_rejected() {
        let tx = LegacyTransaction {
            to: Some("0x1234".into()),
            ..eip155_example()
        };
        assert!(matches!(
            sign_transaction(&tx, &EIP155_KEY),
            Err(EthError::InvalidAddress(_))
        ));
    }

    #[test]
    fn rlp_u256_zero_encodes_as_empty() {
        let mut buf = Vec::new();
        RlpU256([0u8; 32]).encode(&mut buf);
        assert_eq!(buf, vec![0x80]);
    }

    #[test]
    fn rlp_to_encodes_20_bytes() {
        let mut buf = Vec::new();
        RlpTo(Some([0xde; 20])).encode(&mut buf);
        assert_eq!(buf.len(), 21);
        assert_eq!(buf[0], 0x94);
    }
}
