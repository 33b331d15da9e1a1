//! End-to-end workflows composed from the individual services.

use std::sync::Arc;

use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;

use crate::{
    error::Result,
    ethereum::{ChainConnection, WalletManager},
    services::{
        ConfirmationPolicy, CounterContract, TransactOpts, TransferRequest, TransferService,
    },
    types::TransferOutcome,
};

/// Progress of the counter workflow, reported as each step completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStep {
    CountRead(U256),
    IncrementSent(TxHash),
    CountUpdated(U256),
}

/// Result of the counter workflow.
#[derive(Debug, Clone, Serialize)]
pub struct CounterReport {
    pub contract: Address,
    pub count_before: U256,
    pub increment_tx: TxHash,
    pub count_after: U256,
}

/// Transfer workflow; waits for inclusion when a policy is given.
pub async fn run_transfer(
    client: Arc<dyn ChainConnection>,
    wallet: WalletManager,
    request: &TransferRequest,
    wait: Option<ConfirmationPolicy>,
) -> Result<TransferOutcome> {
    let service = TransferService::new(client, wallet);

    match wait {
        Some(policy) => {
            let (signed, record) = service.send_and_wait(request, &policy).await?;
            Ok(TransferOutcome::new(&signed, Some(record)))
        }
        None => {
            let signed = service.send(request).await?;
            Ok(TransferOutcome::new(&signed, None))
        }
    }
}

/// Counter workflow: read, increment, wait for inclusion, read again.
///
/// `on_step` sees each intermediate result before the next network call.
pub async fn run_counter<F>(
    client: Arc<dyn ChainConnection>,
    wallet: WalletManager,
    contract_address: Address,
    gas_limit: u64,
    policy: &ConfirmationPolicy,
    mut on_step: F,
) -> Result<CounterReport>
where
    F: FnMut(CounterStep),
{
    let nonce = client.pending_nonce(wallet.address()).await?;
    let chain_id = client.chain_id().await?;
    let gas_price = client.gas_price().await?;

    let opts = TransactOpts {
        nonce: Some(nonce),
        value: U256::ZERO,
        gas_limit,
        gas_price: Some(gas_price),
        ..TransactOpts::keyed(wallet, chain_id)
    };

    let counter = CounterContract::new(client, contract_address);

    let count_before = counter.get_count().await?;
    on_step(CounterStep::CountRead(count_before));

    let hash = counter.increment(&opts).await?;
    on_step(CounterStep::IncrementSent(hash));

    counter.wait_mined(hash, policy).await?;

    let count_after = counter.get_count().await?;
    on_step(CounterStep::CountUpdated(count_after));

    Ok(CounterReport { contract: contract_address, count_before, increment_tx: hash, count_after })
}
