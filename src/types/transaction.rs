//! Transaction-related types.
//!
//! An [`UnsignedTransaction`] is produced once per submission, signed into a
//! [`SignedTransaction`] by the wallet, and eventually observed on chain as a
//! [`ConfirmationRecord`]. None of these are mutated after construction.

use alloy::{
    consensus::{Signed, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    primitives::{Address, Bytes, TxHash, TxKind, U256},
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Gas limit of a plain ETH transfer.
pub const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// A fully specified, not yet signed legacy transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// Sender nonce.
    pub nonce: u64,
    /// Recipient or contract address.
    pub to: Address,
    /// Value in wei.
    pub value: U256,
    /// Call data (empty for plain transfers).
    pub input: Bytes,
    /// Maximum gas the transaction may consume.
    pub gas_limit: u64,
    /// Gas price in wei.
    pub gas_price: u128,
    /// EIP-155 chain id bound into the signature.
    pub chain_id: u64,
}

impl UnsignedTransaction {
    /// Build a plain ETH transfer.
    pub fn transfer(
        nonce: u64,
        to: Address,
        value: U256,
        gas_limit: u64,
        gas_price: u128,
        chain_id: u64,
    ) -> Self {
        Self { nonce, to, value, input: Bytes::new(), gas_limit, gas_price, chain_id }
    }

    /// Build a contract call carrying ABI-encoded `input`.
    pub fn contract_call(
        nonce: u64,
        to: Address,
        value: U256,
        input: Bytes,
        gas_limit: u64,
        gas_price: u128,
        chain_id: u64,
    ) -> Self {
        Self { nonce, to, value, input, gas_limit, gas_price, chain_id }
    }

    /// Convert into the consensus representation that gets signed.
    pub fn to_legacy(&self) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce: self.nonce,
            gas_price: self.gas_price,
            gas_limit: self.gas_limit,
            to: TxKind::Call(self.to),
            value: self.value,
            input: self.input.clone(),
        }
    }
}

/// A signed legacy transaction together with the address that signed it.
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    inner: Signed<TxLegacy>,
    from: Address,
}

impl SignedTransaction {
    pub(crate) fn new(inner: Signed<TxLegacy>, from: Address) -> Self {
        Self { inner, from }
    }

    /// Transaction hash (keccak of the signed RLP encoding).
    pub fn hash(&self) -> TxHash {
        *self.inner.hash()
    }

    /// Address of the signing wallet.
    pub fn from(&self) -> Address {
        self.from
    }

    pub fn nonce(&self) -> u64 {
        self.inner.tx().nonce
    }

    pub fn to(&self) -> Option<Address> {
        self.inner.tx().to.to().copied()
    }

    pub fn value(&self) -> U256 {
        self.inner.tx().value
    }

    pub fn input(&self) -> &Bytes {
        &self.inner.tx().input
    }

    pub fn gas_limit(&self) -> u64 {
        self.inner.tx().gas_limit
    }

    pub fn gas_price(&self) -> u128 {
        self.inner.tx().gas_price
    }

    /// Chain id the signature commits to.
    pub fn chain_id(&self) -> Option<u64> {
        self.inner.tx().chain_id
    }

    /// The underlying signed consensus transaction.
    pub fn inner(&self) -> &Signed<TxLegacy> {
        &self.inner
    }

    /// Raw bytes for `eth_sendRawTransaction`.
    pub fn encoded(&self) -> Bytes {
        TxEnvelope::from(self.inner.clone()).encoded_2718().into()
    }

    /// Recover the signer from the signature and the chain-bound signing hash.
    pub fn recover_signer(&self) -> Result<Address> {
        self.inner.recover_signer().map_err(|e| AppError::Signing(e.to_string()))
    }
}

/// Outcome of a transaction observed on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    /// Hash of the included transaction.
    pub tx_hash: TxHash,
    /// Block that included the transaction.
    pub block_number: Option<u64>,
    /// Gas consumed by the transaction.
    pub gas_used: u64,
    /// Whether execution succeeded (receipt status 1).
    pub success: bool,
}

impl ConfirmationRecord {
    /// Turn a failed receipt into [`AppError::TransactionReverted`].
    pub fn ensure_success(self) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(AppError::TransactionReverted(self.tx_hash))
        }
    }
}

/// What the CLI reports after a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferOutcome {
    pub tx_hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub value_wei: String,
    pub nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<ConfirmationRecord>,
}

impl TransferOutcome {
    pub fn new(signed: &SignedTransaction, confirmation: Option<ConfirmationRecord>) -> Self {
        Self {
            tx_hash: signed.hash(),
            from: signed.from(),
            to: signed.to().unwrap_or_default(),
            value_wei: signed.value().to_string(),
            nonce: signed.nonce(),
            confirmation,
        }
    }
}
