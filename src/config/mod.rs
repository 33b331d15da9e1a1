//! Configuration management module.
//!
//! Handles loading configuration from environment variables (and `.env`).

use std::{env, time::Duration};

use alloy::primitives::Address;

use crate::{
    error::{AppError, Result},
    ethereum::constants::{DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_POLL_INTERVAL},
    services::ConfirmationPolicy,
};

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Private key for the sending wallet (hex string, `0x` optional).
    pub private_key: Option<String>,
    /// Default transfer recipient.
    pub recipient: Option<Address>,
    /// Default counter contract address.
    pub counter_address: Option<Address>,
    /// Deadline for inclusion waits.
    pub confirmation_timeout: Duration,
    /// Receipt polling interval.
    pub poll_interval: Duration,
    /// Logging level (default: info).
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `ETHEREUM_RPC_URL`: Ethereum JSON-RPC endpoint
    ///
    /// Optional environment variables:
    /// - `ETHEREUM_PRIVATE_KEY`: Private key for signing (hex)
    /// - `TRANSFER_RECIPIENT`: Default recipient for `transfer`
    /// - `COUNTER_CONTRACT_ADDRESS`: Default contract for `counter`
    /// - `CONFIRMATION_TIMEOUT_SECS`: Inclusion deadline (default: 120)
    /// - `CONFIRMATION_POLL_INTERVAL_MS`: Receipt poll interval (default: 2000)
    /// - `LOG_LEVEL`: Logging level (default: info)
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let rpc_url = var("ETHEREUM_RPC_URL").ok_or_else(|| {
            AppError::Config("ETHEREUM_RPC_URL environment variable not set".into())
        })?;

        let private_key = var("ETHEREUM_PRIVATE_KEY");
        let recipient = var("TRANSFER_RECIPIENT").map(|s| parse_address(&s)).transpose()?;
        let counter_address =
            var("COUNTER_CONTRACT_ADDRESS").map(|s| parse_address(&s)).transpose()?;

        let confirmation_timeout = match var("CONFIRMATION_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(s.trim().parse()?),
            None => DEFAULT_CONFIRMATION_TIMEOUT,
        };
        let poll_interval = match var("CONFIRMATION_POLL_INTERVAL_MS") {
            Some(s) => Duration::from_millis(s.trim().parse()?),
            None => DEFAULT_POLL_INTERVAL,
        };
        if poll_interval.is_zero() {
            return Err(AppError::Config("CONFIRMATION_POLL_INTERVAL_MS must be positive".into()));
        }

        let log_level = var("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            rpc_url,
            private_key,
            recipient,
            counter_address,
            confirmation_timeout,
            poll_interval,
            log_level,
        })
    }

    /// The private key, or a credential error naming the missing variable.
    pub fn require_private_key(&self) -> Result<&str> {
        self.private_key.as_deref().ok_or_else(|| {
            AppError::Credential("ETHEREUM_PRIVATE_KEY environment variable not set".into())
        })
    }

    /// Inclusion wait settings derived from this configuration.
    pub fn confirmation_policy(&self) -> ConfirmationPolicy {
        ConfirmationPolicy { timeout: self.confirmation_timeout, poll_interval: self.poll_interval }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("recipient", &self.recipient)
            .field("counter_address", &self.counter_address)
            .field("confirmation_timeout", &self.confirmation_timeout)
            .field("poll_interval", &self.poll_interval)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Parse and validate an Ethereum address from a string.
///
/// Validates:
/// - Address format (0x + 40 hex characters)
/// - Basic format checks
pub fn parse_address(s: &str) -> Result<Address> {
    let trimmed = s.trim();

    // Check for empty input
    if trimmed.is_empty() {
        return Err(AppError::InvalidAddress("Address cannot be empty".into()));
    }

    // Check for correct prefix
    if !trimmed.starts_with("0x") && !trimmed.starts_with("0X") {
        return Err(AppError::InvalidAddress(format!("Address must start with '0x': {}", s)));
    }

    // Check length (0x + 40 hex chars = 42 total)
    if trimmed.len() != 42 {
        return Err(AppError::InvalidAddress(format!(
            "Address must be 42 characters (0x + 40 hex chars), got {}: {}",
            trimmed.len(),
            s
        )));
    }

    trimmed
        .parse::<Address>()
        .map_err(|e| AppError::InvalidAddress(format!("Invalid address format '{}': {}", s, e)))
}
