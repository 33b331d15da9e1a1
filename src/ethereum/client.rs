//! Ethereum RPC client.
//!
//! [`ChainConnection`] is the seam every workflow talks through; the
//! [`EthereumClient`] implementation forwards each call to a single JSON-RPC
//! endpoint and performs no retries.

use alloy::{
    eips::BlockNumberOrTag,
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, Bytes, TxHash},
    providers::{Provider, RootProvider},
    rpc::types::TransactionRequest,
    transports::http::reqwest::Url,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    error::{AppError, Result},
    types::{BlockSummary, ConfirmationRecord, SignedTransaction},
};

/// Type alias for the HTTP provider.
pub type HttpProvider = RootProvider<Ethereum>;

/// Operations a workflow needs from the remote ledger.
///
/// Implementations must be stateless request/response wrappers so a single
/// connection can be shared between services.
#[async_trait]
pub trait ChainConnection: Send + Sync {
    /// Next nonce for `address`, counting pending transactions.
    async fn pending_nonce(&self, address: Address) -> Result<u64>;

    /// Suggested legacy gas price in wei.
    async fn gas_price(&self) -> Result<u128>;

    /// Chain id of the connected network.
    async fn chain_id(&self) -> Result<u64>;

    /// Execute a read-only call against `to`.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes>;

    /// Broadcast a signed transaction and return the hash reported by the node.
    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<TxHash>;

    /// Receipt for `hash`, or `None` while the transaction is still pending.
    async fn receipt(&self, hash: TxHash) -> Result<Option<ConfirmationRecord>>;

    /// Block at `number`, or `None` if the chain has no such block.
    async fn block_by_number(&self, number: u64) -> Result<Option<BlockSummary>>;
}

/// Ethereum RPC client wrapper with lazy initialization.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: Arc<HttpProvider>,
    /// RPC URL for logging.
    rpc_url: String,
    /// Lazily initialized chain ID.
    chain_id: Arc<OnceCell<u64>>,
}

impl EthereumClient {
    /// Create a new Ethereum client.
    ///
    /// Note: This does NOT make any network calls. Use [`EthereumClient::connect`]
    /// to verify the endpoint is reachable.
    pub fn new(rpc_url: &str) -> Result<Self> {
        let url: Url = rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", rpc_url)))?;

        let provider = RootProvider::<Ethereum>::new_http(url);

        tracing::info!(rpc_url = %rpc_url, "Ethereum client created (lazy initialization)");

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url: rpc_url.to_string(),
            chain_id: Arc::new(OnceCell::new()),
        })
    }

    /// Create a client and confirm the endpoint answers by fetching the chain id.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let client = Self::new(rpc_url)?;
        client.chain_id().await?;
        Ok(client)
    }
}

impl std::fmt::Debug for EthereumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id.get())
            .finish()
    }
}

#[async_trait]
impl ChainConnection for EthereumClient {
    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        let nonce = self
            .provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|e| AppError::SequenceResolution(e.to_string()))?;
        tracing::debug!(address = %address, nonce = nonce, "Resolved pending nonce");
        Ok(nonce)
    }

    async fn gas_price(&self) -> Result<u128> {
        let gas_price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| AppError::FeeEstimation(e.to_string()))?;
        tracing::debug!(gas_price = gas_price, "Fetched gas price");
        Ok(gas_price)
    }

    /// Fetches from the network on first call and caches the answer.
    async fn chain_id(&self) -> Result<u64> {
        self.chain_id
            .get_or_try_init(|| async {
                let chain_id = self
                    .provider
                    .get_chain_id()
                    .await
                    .map_err(|e| AppError::Connection(e.to_string()))?;
                tracing::info!(
                    chain_id = chain_id,
                    rpc_url = %self.rpc_url,
                    "Connected to Ethereum node"
                );
                Ok(chain_id)
            })
            .await
            .copied()
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().to(to).input(input.into());
        self.provider.call(tx).await.map_err(|e| AppError::ContractCall(e.to_string()))
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<TxHash> {
        let encoded = tx.encoded();
        let pending = self
            .provider
            .send_raw_transaction(&encoded)
            .await
            .map_err(|e| AppError::Submission(e.to_string()))?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<ConfirmationRecord>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(receipt.map(|r| ConfirmationRecord {
            tx_hash: r.transaction_hash,
            block_number: r.block_number,
            gas_used: r.gas_used,
            success: r.status(),
        }))
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<BlockSummary>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await
            .map_err(|e| AppError::Connection(e.to_string()))?;

        Ok(block.map(|b| BlockSummary {
            number: b.header.number,
            hash: b.header.hash,
            timestamp: b.header.timestamp,
            transaction_count: b.transactions.len(),
        }))
    }
}
