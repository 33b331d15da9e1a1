//! Command-line interface.
//!
//! Each subcommand runs one workflow to completion and prints its result to
//! stdout. Any error aborts the run.

use std::sync::Arc;

use alloy::primitives::{utils::format_ether, Address, U256};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::{
    config::{parse_address, Config},
    error::{AppError, Result},
    ethereum::{
        constants::{DEFAULT_BLOCK_NUMBER, DEFAULT_CONTRACT_GAS_LIMIT, DEFAULT_TRANSFER_VALUE_WEI},
        ChainConnection, EthereumClient, WalletManager,
    },
    services::{run_counter, run_transfer, BlockService, CounterStep, TransferRequest},
    types::TRANSFER_GAS_LIMIT,
};

#[derive(Debug, Parser)]
#[command(name = "sepolia-demo")]
#[command(
    about = "Send ETH, drive a counter contract and inspect blocks over JSON-RPC",
    long_about = None
)]
pub struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign and broadcast a native ETH transfer
    Transfer {
        /// Recipient address (defaults to TRANSFER_RECIPIENT)
        #[arg(long)]
        to: Option<String>,
        /// Amount in wei
        #[arg(long, default_value_t = DEFAULT_TRANSFER_VALUE_WEI)]
        value_wei: u128,
        /// Gas limit
        #[arg(long, default_value_t = TRANSFER_GAS_LIMIT)]
        gas_limit: u64,
        /// Wait for the transaction to be included
        #[arg(long)]
        wait: bool,
    },
    /// Read the counter, increment it and read it again
    Counter {
        /// Counter contract address (defaults to COUNTER_CONTRACT_ADDRESS)
        #[arg(long)]
        address: Option<String>,
        /// Gas limit for the increment transaction
        #[arg(long, default_value_t = DEFAULT_CONTRACT_GAS_LIMIT)]
        gas_limit: u64,
    },
    /// Print metadata of a single block
    Block {
        /// Block height
        #[arg(default_value_t = DEFAULT_BLOCK_NUMBER)]
        number: u64,
    },
}

/// Run the selected workflow against the endpoint in `config`.
pub async fn execute(cli: Cli, config: &Config) -> Result<()> {
    let client: Arc<dyn ChainConnection> =
        Arc::new(EthereumClient::connect(&config.rpc_url).await?);

    match cli.command {
        Command::Transfer { to, value_wei, gas_limit, wait } => {
            let to = resolve_address(to.as_deref(), config.recipient, "TRANSFER_RECIPIENT")?;
            let wallet = WalletManager::from_private_key(config.require_private_key()?)?;
            let request = TransferRequest { to, value: U256::from(value_wei), gas_limit };

            let policy = wait.then(|| config.confirmation_policy());
            let outcome = run_transfer(client, wallet, &request, policy).await?;

            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("Transaction sent! Hash: {}", outcome.tx_hash);
                println!("Value: {} ETH", format_ether(U256::from(value_wei)));
                if let Some(record) = &outcome.confirmation {
                    match record.block_number {
                        Some(block) => println!("Included in block {}", block),
                        None => println!("Included"),
                    }
                }
            }
        }
        Command::Counter { address, gas_limit } => {
            let contract_address = resolve_address(
                address.as_deref(),
                config.counter_address,
                "COUNTER_CONTRACT_ADDRESS",
            )?;
            let wallet = WalletManager::from_private_key(config.require_private_key()?)?;

            let json = cli.json;
            let report = run_counter(
                client,
                wallet,
                contract_address,
                gas_limit,
                &config.confirmation_policy(),
                |step| {
                    if !json {
                        print_counter_step(step);
                    }
                },
            )
            .await?;

            if cli.json {
                print_json(&report)?;
            }
        }
        Command::Block { number } => {
            let block = BlockService::new(client).block_by_number(number).await?;

            if cli.json {
                print_json(&block)?;
            } else {
                println!("{}", block);
            }
        }
    }

    Ok(())
}

/// Prefer the command-line value, then the configured default.
fn resolve_address(
    flag: Option<&str>,
    configured: Option<Address>,
    env_name: &str,
) -> Result<Address> {
    match flag {
        Some(s) => parse_address(s),
        None => configured.ok_or_else(|| {
            AppError::Config(format!("No address given and {} is not set", env_name))
        }),
    }
}

fn print_counter_step(step: CounterStep) {
    match step {
        CounterStep::CountRead(count) => println!("Current count: {}", count),
        CounterStep::IncrementSent(hash) => println!("Increment transaction sent! Hash: {}", hash),
        CounterStep::CountUpdated(count) => println!("Updated count: {}", count),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Parse(format!("Failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
