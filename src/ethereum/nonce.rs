//! Serialized nonce allocation for a single sender.

use alloy::primitives::Address;
use tokio::sync::{Mutex, MutexGuard};

use crate::{error::Result, ethereum::ChainConnection};

/// Hands out nonces for one address without gaps or duplicates.
///
/// The first allocation reads the pending nonce from the node; later ones
/// count up locally. At most one nonce is outstanding at a time: a
/// [`NonceReservation`] holds the allocator until it is committed or dropped.
#[derive(Debug)]
pub struct NonceManager {
    address: Address,
    next: Mutex<Option<u64>>,
}

impl NonceManager {
    pub fn new(address: Address) -> Self {
        Self { address, next: Mutex::new(None) }
    }

    /// Reserve the next nonce, waiting for any outstanding reservation.
    pub async fn reserve(&self, chain: &dyn ChainConnection) -> Result<NonceReservation<'_>> {
        let mut slot = self.next.lock().await;
        let nonce = match *slot {
            Some(nonce) => nonce,
            None => {
                let nonce = chain.pending_nonce(self.address).await?;
                *slot = Some(nonce);
                nonce
            }
        };

        tracing::debug!(address = %self.address, nonce = nonce, "Reserved nonce");
        Ok(NonceReservation { slot, nonce, address: self.address })
    }
}

/// A nonce held for one submission.
///
/// Dropping the reservation without [`commit`](Self::commit) leaves the nonce
/// unconsumed for the next caller.
#[derive(Debug)]
pub struct NonceReservation<'a> {
    slot: MutexGuard<'a, Option<u64>>,
    nonce: u64,
    address: Address,
}

impl NonceReservation<'_> {
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The nonce was accepted by the node; advance past it.
    pub fn commit(mut self) {
        *self.slot = Some(self.nonce + 1);
    }

    /// The node rejected the transaction; re-read the pending nonce next time.
    pub fn resync(mut self) {
        tracing::debug!(address = %self.address, nonce = self.nonce, "Nonce counter reset");
        *self.slot = None;
    }
}
