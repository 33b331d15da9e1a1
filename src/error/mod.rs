//! Error types and handling module.
//!
//! Every stage of a workflow has its own variant so that the diagnostic
//! printed before exit names the step that failed.

use std::time::Duration;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The RPC endpoint could not be reached or answered with a transport failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Malformed or missing key material.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The next nonce for the sender could not be determined.
    #[error("Nonce resolution failed: {0}")]
    SequenceResolution(String),

    /// The node refused to suggest a gas price.
    #[error("Gas price estimation failed: {0}")]
    FeeEstimation(String),

    /// Producing the transaction signature failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node rejected the signed transaction.
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// The transaction was not included before the deadline.
    #[error("Transaction {hash} not confirmed within {waited:?}")]
    ConfirmationTimeout { hash: TxHash, waited: Duration },

    /// The transaction was included but its receipt reports failure.
    #[error("Transaction {0} reverted")]
    TransactionReverted(TxHash),

    /// A contract read or write failed.
    #[error("Contract call failed: {0}")]
    ContractCall(String),

    /// The requested block does not exist on the connected chain.
    #[error("Block {0} not found")]
    BlockNotFound(u64),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AppError {
    /// Whether repeating the same request could plausibly succeed.
    ///
    /// Nothing in this crate retries; the classification is exposed for
    /// callers that embed the workflows in a longer-lived process.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Connection(_) | AppError::ConfirmationTimeout { .. })
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Credential(err.to_string())
    }
}

impl From<alloy::sol_types::Error> for AppError {
    fn from(err: alloy::sol_types::Error) -> Self {
        AppError::ContractCall(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
