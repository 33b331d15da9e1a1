//! Ethereum interaction module.
//!
//! Contains the RPC client, wallet, nonce allocation and contract bindings.

pub mod client;
pub mod constants;
pub mod contracts;
pub mod nonce;
pub mod wallet;

pub use client::{ChainConnection, EthereumClient, HttpProvider};
pub use nonce::{NonceManager, NonceReservation};
pub use wallet::WalletManager;
