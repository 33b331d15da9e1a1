//! Typed contract calls over the generic chain connection.
//!
//! [`ContractCaller`] turns `sol!` call structs into `eth_call` reads or
//! signed write transactions. [`CounterContract`] is the typed wrapper for
//! the counter deployment the CLI drives.

use std::sync::Arc;

use alloy::{
    primitives::{Address, Bytes, TxHash, U256},
    sol_types::SolCall,
};

use crate::{
    error::{AppError, Result},
    ethereum::{contracts::ICounter, ChainConnection, WalletManager},
    services::{ConfirmationPolicy, Submitter},
    types::{ConfirmationRecord, SignedTransaction, UnsignedTransaction},
};

/// Authorization and gas settings for a contract write.
///
/// `signer` and `nonce` must both be set; `gas_price` falls back to the
/// node's suggestion when absent.
#[derive(Debug, Clone)]
pub struct TransactOpts {
    pub signer: Option<WalletManager>,
    pub nonce: Option<u64>,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: Option<u128>,
    pub chain_id: u64,
}

impl TransactOpts {
    /// Options signed by `wallet` for `chain_id`, with no nonce or gas settings yet.
    pub fn keyed(wallet: WalletManager, chain_id: u64) -> Self {
        Self {
            signer: Some(wallet),
            nonce: None,
            value: U256::ZERO,
            gas_limit: 0,
            gas_price: None,
            chain_id,
        }
    }
}

/// Read and write access to one deployed contract.
#[derive(Clone)]
pub struct ContractCaller {
    client: Arc<dyn ChainConnection>,
    submitter: Submitter,
    address: Address,
}

impl ContractCaller {
    pub fn new(client: Arc<dyn ChainConnection>, address: Address) -> Self {
        let submitter = Submitter::new(client.clone());
        Self { client, submitter, address }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Submitter used for writes.
    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    /// Run `call` as an unsigned `eth_call` and decode its return value.
    pub async fn call<C: SolCall>(&self, call: &C) -> Result<C::Return> {
        tracing::debug!(contract = %self.address, method = C::SIGNATURE, "Contract read");

        let output = self.client.call(self.address, Bytes::from(call.abi_encode())).await?;
        C::abi_decode_returns(&output).map_err(|e| {
            AppError::ContractCall(format!("{}: failed to decode output: {}", C::SIGNATURE, e))
        })
    }

    /// Build and sign a transaction invoking `call` without broadcasting it.
    pub async fn build_transaction<C: SolCall>(
        &self,
        call: &C,
        opts: &TransactOpts,
    ) -> Result<SignedTransaction> {
        let signer = opts.signer.as_ref().ok_or_else(|| {
            AppError::Credential(format!("{}: transact options carry no signer", C::SIGNATURE))
        })?;
        let nonce = opts.nonce.ok_or_else(|| {
            AppError::SequenceResolution(format!(
                "{}: transact options carry no nonce",
                C::SIGNATURE
            ))
        })?;
        let gas_price = match opts.gas_price {
            Some(price) => price,
            None => self.client.gas_price().await?,
        };

        let tx = UnsignedTransaction::contract_call(
            nonce,
            self.address,
            opts.value,
            Bytes::from(call.abi_encode()),
            opts.gas_limit,
            gas_price,
            opts.chain_id,
        );

        signer.sign(&tx)
    }

    /// Sign and broadcast a transaction invoking `call`.
    pub async fn transact<C: SolCall>(&self, call: &C, opts: &TransactOpts) -> Result<TxHash> {
        let signed = self.build_transaction(call, opts).await?;

        tracing::info!(
            contract = %self.address,
            method = C::SIGNATURE,
            nonce = signed.nonce(),
            "Contract write"
        );

        self.submitter.submit(&signed).await
    }
}

/// Typed wrapper around a deployed counter contract.
#[derive(Clone)]
pub struct CounterContract {
    caller: ContractCaller,
}

impl CounterContract {
    pub fn new(client: Arc<dyn ChainConnection>, address: Address) -> Self {
        Self { caller: ContractCaller::new(client, address) }
    }

    pub fn address(&self) -> Address {
        self.caller.address()
    }

    /// Current counter value.
    pub async fn get_count(&self) -> Result<U256> {
        self.caller.call(&ICounter::getCountCall {}).await
    }

    /// Submit an `increment()` transaction.
    pub async fn increment(&self, opts: &TransactOpts) -> Result<TxHash> {
        self.caller.transact(&ICounter::incrementCall {}, opts).await
    }

    /// Wait for a previously submitted write to be included successfully.
    pub async fn wait_mined(
        &self,
        hash: TxHash,
        policy: &ConfirmationPolicy,
    ) -> Result<ConfirmationRecord> {
        self.caller.submitter().wait_for_confirmation(hash, policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_keyed_opts() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let opts = TransactOpts::keyed(wallet.clone(), 11155111);

        assert_eq!(opts.signer.as_ref().map(|w| w.address()), Some(wallet.address()));
        assert_eq!(opts.chain_id, 11155111);
        assert_eq!(opts.value, U256::ZERO);
        assert!(opts.nonce.is_none());
        assert!(opts.gas_price.is_none());
    }
}
