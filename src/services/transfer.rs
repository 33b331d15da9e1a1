//! Native ETH transfer service.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

use crate::{
    error::Result,
    ethereum::{ChainConnection, NonceManager, WalletManager},
    services::{ConfirmationPolicy, Submitter},
    types::{ConfirmationRecord, SignedTransaction, UnsignedTransaction, TRANSFER_GAS_LIMIT},
};

/// Parameters for a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    /// Recipient address.
    pub to: Address,
    /// Amount in wei.
    pub value: U256,
    /// Gas limit (21000 for a plain transfer to an EOA).
    pub gas_limit: u64,
}

impl TransferRequest {
    /// A transfer with the standard 21000 gas limit.
    pub fn new(to: Address, value: U256) -> Self {
        Self { to, value, gas_limit: TRANSFER_GAS_LIMIT }
    }
}

/// Resolves nonce and fees, signs and submits ETH transfers for one wallet.
pub struct TransferService {
    client: Arc<dyn ChainConnection>,
    wallet: WalletManager,
    nonces: NonceManager,
    submitter: Submitter,
}

impl TransferService {
    /// Create a new transfer service.
    pub fn new(client: Arc<dyn ChainConnection>, wallet: WalletManager) -> Self {
        let nonces = NonceManager::new(wallet.address());
        let submitter = Submitter::new(client.clone());
        Self { client, wallet, nonces, submitter }
    }

    /// Sending address.
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    async fn quote(&self) -> Result<(u128, u64)> {
        let gas_price = self.client.gas_price().await?;
        let chain_id = self.client.chain_id().await?;
        Ok((gas_price, chain_id))
    }

    /// Build the unsigned transaction for `request` using the next nonce,
    /// the node's gas price suggestion and the connected chain id.
    ///
    /// The nonce is only previewed; it is not consumed until a transaction
    /// using it is accepted by [`send`](Self::send). No balance check is made;
    /// the node decides whether funds suffice.
    pub async fn prepare(&self, request: &TransferRequest) -> Result<UnsignedTransaction> {
        let (gas_price, chain_id) = self.quote().await?;
        let reservation = self.nonces.reserve(self.client.as_ref()).await?;
        Ok(build(request, reservation.nonce(), gas_price, chain_id))
    }

    /// Sign and broadcast a transfer without waiting for inclusion.
    ///
    /// The nonce stays reserved from signing until the node answers, so
    /// concurrent sends are submitted one at a time in nonce order.
    pub async fn send(&self, request: &TransferRequest) -> Result<SignedTransaction> {
        tracing::info!(
            from = %self.sender(),
            to = %request.to,
            value = %request.value,
            "Sending transfer"
        );

        let (gas_price, chain_id) = self.quote().await?;
        let reservation = self.nonces.reserve(self.client.as_ref()).await?;

        let tx = build(request, reservation.nonce(), gas_price, chain_id);
        let signed = self.wallet.sign(&tx)?;

        match self.submitter.submit(&signed).await {
            Ok(_) => {
                reservation.commit();
                Ok(signed)
            }
            Err(e) => {
                reservation.resync();
                Err(e)
            }
        }
    }

    /// Sign, broadcast and wait for a successful receipt.
    pub async fn send_and_wait(
        &self,
        request: &TransferRequest,
        policy: &ConfirmationPolicy,
    ) -> Result<(SignedTransaction, ConfirmationRecord)> {
        policy.validate()?;
        let signed = self.send(request).await?;
        let record = self.submitter.wait_for_confirmation(signed.hash(), policy).await?;
        Ok((signed, record))
    }
}

fn build(
    request: &TransferRequest,
    nonce: u64,
    gas_price: u128,
    chain_id: u64,
) -> UnsignedTransaction {
    UnsignedTransaction::transfer(
        nonce,
        request.to,
        request.value,
        request.gas_limit,
        gas_price,
        chain_id,
    )
}

impl std::fmt::Debug for TransferService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferService").field("sender", &self.sender()).finish()
    }
}
