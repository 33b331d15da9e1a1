//! Ethereum network constants and workflow defaults.

use std::time::Duration;

// ============================================================================
// Chain IDs
// ============================================================================

/// Ethereum Mainnet chain ID.
pub const ETHEREUM_MAINNET_CHAIN_ID: u64 = 1;

/// Sepolia testnet chain ID.
pub const SEPOLIA_CHAIN_ID: u64 = 11155111;

// ============================================================================
// Workflow defaults
// ============================================================================

/// Default transfer amount: 0.05 ETH in wei.
pub const DEFAULT_TRANSFER_VALUE_WEI: u128 = 50_000_000_000_000_000;

/// Gas limit used for counter contract writes.
pub const DEFAULT_CONTRACT_GAS_LIMIT: u64 = 300_000;

/// Block inspected when no height is given.
pub const DEFAULT_BLOCK_NUMBER: u64 = 8_199_285;

/// How long to wait for a transaction to be included.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Interval between receipt polls while waiting for inclusion.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
