//! Transaction submission and confirmation tracking.

use std::{sync::Arc, time::Duration};

use alloy::primitives::TxHash;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::{
    error::{AppError, Result},
    ethereum::{
        constants::{DEFAULT_CONFIRMATION_TIMEOUT, DEFAULT_POLL_INTERVAL},
        ChainConnection,
    },
    types::{ConfirmationRecord, SignedTransaction},
};

/// How long and how often to poll for a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    /// Give up after this long.
    pub timeout: Duration,
    /// Delay between receipt queries.
    pub poll_interval: Duration,
}

impl ConfirmationPolicy {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(AppError::Config("Confirmation poll interval must be non-zero".into()));
        }
        Ok(())
    }
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self { timeout: DEFAULT_CONFIRMATION_TIMEOUT, poll_interval: DEFAULT_POLL_INTERVAL }
    }
}

/// Broadcasts signed transactions and waits for their receipts.
#[derive(Clone)]
pub struct Submitter {
    client: Arc<dyn ChainConnection>,
}

impl Submitter {
    /// Create a new submitter.
    pub fn new(client: Arc<dyn ChainConnection>) -> Self {
        Self { client }
    }

    /// Broadcast `tx` without waiting for inclusion.
    pub async fn submit(&self, tx: &SignedTransaction) -> Result<TxHash> {
        let local_hash = tx.hash();
        let hash = self.client.send_transaction(tx).await?;

        if hash != local_hash {
            tracing::warn!(
                local = %local_hash,
                remote = %hash,
                "Node reported a different transaction hash"
            );
        }

        tracing::info!(
            hash = %hash,
            from = %tx.from(),
            nonce = tx.nonce(),
            "Transaction submitted"
        );
        Ok(hash)
    }

    /// Poll for the receipt of `hash` until it appears or the policy deadline passes.
    ///
    /// A receipt with failed status is returned as [`AppError::TransactionReverted`];
    /// a zero poll interval is rejected as [`AppError::Config`].
    pub async fn wait_for_confirmation(
        &self,
        hash: TxHash,
        policy: &ConfirmationPolicy,
    ) -> Result<ConfirmationRecord> {
        policy.validate()?;

        let result = timeout(policy.timeout, async {
            let mut ticker = interval(policy.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                match self.client.receipt(hash).await? {
                    Some(record) => return Ok::<_, AppError>(record),
                    None => tracing::debug!(hash = %hash, "Transaction pending"),
                }
            }
        })
        .await;

        let record = match result {
            Ok(record) => record?,
            Err(_) => {
                return Err(AppError::ConfirmationTimeout { hash, waited: policy.timeout });
            }
        };

        tracing::info!(
            hash = %hash,
            block = ?record.block_number,
            gas_used = record.gas_used,
            success = record.success,
            "Transaction included"
        );

        record.ensure_success()
    }

    /// Broadcast `tx` and wait for a successful receipt.
    pub async fn submit_and_wait(
        &self,
        tx: &SignedTransaction,
        policy: &ConfirmationPolicy,
    ) -> Result<ConfirmationRecord> {
        policy.validate()?;
        let hash = self.submit(tx).await?;
        self.wait_for_confirmation(hash, policy).await
    }
}
