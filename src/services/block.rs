//! Block lookup service.

use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    ethereum::ChainConnection,
    types::BlockSummary,
};

/// Service for reading block metadata.
#[derive(Clone)]
pub struct BlockService {
    client: Arc<dyn ChainConnection>,
}

impl BlockService {
    /// Create a new block service.
    pub fn new(client: Arc<dyn ChainConnection>) -> Self {
        Self { client }
    }

    /// Fetch the block at `number`.
    ///
    /// A height the node does not know yields [`AppError::BlockNotFound`].
    pub async fn block_by_number(&self, number: u64) -> Result<BlockSummary> {
        tracing::debug!(number = number, "Querying block");

        let block =
            self.client.block_by_number(number).await?.ok_or(AppError::BlockNotFound(number))?;

        tracing::info!(
            number = block.number,
            hash = %block.hash,
            transactions = block.transaction_count,
            "Block fetched"
        );

        Ok(block)
    }
}
