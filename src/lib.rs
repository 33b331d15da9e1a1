//! Sepolia Demo Library
//!
//! Three small Ethereum workflows built on `alloy`:
//!
//! - **Transfer**: sign an EIP-155 legacy ETH transfer and broadcast it
//! - **Counter**: read a counter contract, increment it, wait for inclusion
//!   and read it again
//! - **Block**: print the metadata of a single block
//!
//! All network access goes through [`ChainConnection`], so the workflows can
//! run against any implementation of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sepolia_demo::{BlockService, Config, EthereumClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = Arc::new(EthereumClient::connect(&config.rpc_url).await?);
//!     let block = BlockService::new(client).block_by_number(8_199_285).await?;
//!     println!("{block}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod ethereum;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use ethereum::{ChainConnection, EthereumClient, NonceManager, WalletManager};
pub use services::{
    run_counter, run_transfer, BlockService, ConfirmationPolicy, ContractCaller, CounterContract,
    CounterReport, CounterStep, Submitter, TransactOpts, TransferRequest, TransferService,
};
