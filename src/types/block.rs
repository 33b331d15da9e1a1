//! Block-related types.

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

/// Read-only projection of a block header plus its transaction count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    /// Block height.
    pub number: u64,
    /// Block hash.
    pub hash: B256,
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// Number of transactions included in the block.
    pub transaction_count: usize,
}

impl std::fmt::Display for BlockSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Block number: {}", self.number)?;
        writeln!(f, "Block hash: {}", self.hash)?;
        writeln!(f, "Timestamp: {} (unix)", self.timestamp)?;
        write!(f, "Transaction count: {}", self.transaction_count)
    }
}
