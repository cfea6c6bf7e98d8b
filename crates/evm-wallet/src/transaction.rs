use alloy_primitives::U256;
use chain_eth::transaction::LegacyTransaction;

use crate::rpc::CallRequest;

/// Everything needed to sign and send one transaction.
///
/// `chain_id` and `nonce` are captured from the wallet when the record is
/// built; submission rejects the record if either no longer matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionParameters {
    pub from: String,
    pub to: Option<String>,
    /// Native-currency amount in base units.
    pub value: U256,
    pub data: Option<Vec<u8>>,
    pub gas: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    pub nonce: u64,
}

impl TransactionParameters {
    pub(crate) fn to_legacy(&self) -> LegacyTransaction {
        LegacyTransaction {
            chain_id: self.chain_id,
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas,
            to: self.to.clone(),
            value: self.value,
            data: self.data.clone().unwrap_or_default(),
        }
    }

    /// The simulation request for `eth_estimateGas`.
    pub(crate) fn to_call_request(&self) -> CallRequest {
        CallRequest {
            from: Some(self.from.clone()),
            to: self.to.clone(),
            value: Some(self.value),
            data: self.data.clone(),
            gas: None,
            gas_price: Some(self.gas_price),
        }
    }
}

/// A contract method invocation: the target contract and its encoded
/// calldata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    pub contract: String,
    pub calldata: Vec<u8>,
}

impl ContractCall {
    pub fn new(contract: impl Into<String>, calldata: Vec<u8>) -> Self {
        Self {
            contract: contract.into(),
            calldata,
        }
    }
}
