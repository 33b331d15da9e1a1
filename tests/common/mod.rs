//! Common utilities for integration tests.

#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy::{
    primitives::{address, Address, Bytes, TxHash, B256, U256},
    sol_types::SolCall,
};
use async_trait::async_trait;

use sepolia_demo::{
    ethereum::contracts::ICounter,
    types::{BlockSummary, ConfirmationRecord, SignedTransaction},
    AppError, ChainConnection, ConfirmationPolicy, EthereumClient, Result, WalletManager,
    SEPOLIA_CHAIN_ID,
};

/// First Hardhat/Foundry dev account (DO NOT use in production!)
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

pub const RECIPIENT: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
pub const COUNTER_ADDRESS: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

pub const GAS_PRICE: u128 = 1_500_000_000;

pub fn wallet() -> WalletManager {
    WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap()
}

/// Short deadlines so timeout tests finish quickly.
pub fn fast_policy() -> ConfirmationPolicy {
    ConfirmationPolicy {
        timeout: Duration::from_millis(200),
        poll_interval: Duration::from_millis(5),
    }
}

#[derive(Default)]
struct MockState {
    first_nonce: HashMap<Address, u64>,
    next_nonce: HashMap<Address, u64>,
    seen: HashSet<(Address, u64)>,
    receipts: HashMap<TxHash, ConfirmationRecord>,
    polls_left: HashMap<TxHash, u32>,
    submitted: Vec<SignedTransaction>,
    nonce_queries: usize,
    count: U256,
    head: u64,
    blocks: HashMap<u64, BlockSummary>,
    receipt_delay: u32,
    reverting: bool,
    never_include: bool,
    fail_next_submission: bool,
    fail_next_gas_price: bool,
}

/// In-memory ledger implementing [`ChainConnection`].
///
/// Rejects transactions signed for another chain, with a bad signature, or
/// reusing a (sender, nonce) pair. Knows one counter contract.
pub struct MockChain {
    chain_id: u64,
    gas_price: u128,
    state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            chain_id: SEPOLIA_CHAIN_ID,
            gas_price: GAS_PRICE,
            state: Mutex::new(MockState { head: 8_000_000, ..Default::default() }),
        }
    }

    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        let state = self.state.get_mut().unwrap();
        state.first_nonce.insert(address, nonce);
        state.next_nonce.insert(address, nonce);
        self
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.state.get_mut().unwrap().count = U256::from(count);
        self
    }

    pub fn with_block(mut self, block: BlockSummary) -> Self {
        self.state.get_mut().unwrap().blocks.insert(block.number, block);
        self
    }

    /// Receipts appear only after this many empty polls.
    pub fn with_receipt_delay(mut self, polls: u32) -> Self {
        self.state.get_mut().unwrap().receipt_delay = polls;
        self
    }

    /// Every transaction is included with failed status.
    pub fn reverting(mut self) -> Self {
        self.state.get_mut().unwrap().reverting = true;
        self
    }

    /// Receipts never appear.
    pub fn never_include(mut self) -> Self {
        self.state.get_mut().unwrap().never_include = true;
        self
    }

    /// The next submission is rejected without consuming a nonce.
    pub fn fail_next_submission(&self) {
        self.state.lock().unwrap().fail_next_submission = true;
    }

    /// The next gas price query fails.
    pub fn fail_next_gas_price(&self) {
        self.state.lock().unwrap().fail_next_gas_price = true;
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn submitted(&self) -> Vec<SignedTransaction> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn nonce_queries(&self) -> usize {
        self.state.lock().unwrap().nonce_queries
    }

    pub fn count(&self) -> U256 {
        self.state.lock().unwrap().count
    }
}

#[async_trait]
impl ChainConnection for MockChain {
    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        state.nonce_queries += 1;
        Ok(state.next_nonce.get(&address).copied().unwrap_or(0))
    }

    async fn gas_price(&self) -> Result<u128> {
        let mut state = self.state.lock().unwrap();
        if state.fail_next_gas_price {
            state.fail_next_gas_price = false;
            return Err(AppError::FeeEstimation("gas price unavailable".into()));
        }
        Ok(self.gas_price)
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.chain_id)
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let state = self.state.lock().unwrap();
        if to == COUNTER_ADDRESS && input[..] == ICounter::getCountCall::SELECTOR {
            return Ok(Bytes::from(state.count.to_be_bytes::<32>().to_vec()));
        }
        Err(AppError::ContractCall("execution reverted".into()))
    }

    async fn send_transaction(&self, tx: &SignedTransaction) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next_submission {
            state.fail_next_submission = false;
            return Err(AppError::Submission(
                "insufficient funds for gas * price + value".into(),
            ));
        }
        if tx.chain_id() != Some(self.chain_id) {
            return Err(AppError::Submission("invalid chain id for signer".into()));
        }
        if tx.recover_signer()? != tx.from() {
            return Err(AppError::Submission("invalid sender".into()));
        }

        let sender = tx.from();
        let first = state.first_nonce.get(&sender).copied().unwrap_or(0);
        if tx.nonce() < first || !state.seen.insert((sender, tx.nonce())) {
            return Err(AppError::Submission("nonce too low".into()));
        }
        let next = state.next_nonce.get(&sender).copied().unwrap_or(0);
        state.next_nonce.insert(sender, next.max(tx.nonce() + 1));

        let is_increment = tx.to() == Some(COUNTER_ADDRESS)
            && tx.input()[..] == ICounter::incrementCall::SELECTOR;
        let success = !state.reverting;
        if is_increment && success {
            state.count += U256::from(1u8);
        }

        state.head += 1;
        let record = ConfirmationRecord {
            tx_hash: tx.hash(),
            block_number: Some(state.head),
            gas_used: if is_increment { 26_000 } else { 21_000 },
            success,
        };
        let delay = state.receipt_delay;
        state.receipts.insert(tx.hash(), record);
        state.polls_left.insert(tx.hash(), delay);
        state.submitted.push(tx.clone());

        Ok(tx.hash())
    }

    async fn receipt(&self, hash: TxHash) -> Result<Option<ConfirmationRecord>> {
        let mut state = self.state.lock().unwrap();
        if state.never_include {
            return Ok(None);
        }
        if let Some(left) = state.polls_left.get_mut(&hash) {
            if *left > 0 {
                *left -= 1;
                return Ok(None);
            }
        }
        Ok(state.receipts.get(&hash).cloned())
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<BlockSummary>> {
        Ok(self.state.lock().unwrap().blocks.get(&number).cloned())
    }
}

pub fn sample_block(number: u64) -> BlockSummary {
    BlockSummary {
        number,
        hash: B256::repeat_byte(0x42),
        timestamp: 1_745_312_400,
        transaction_count: 87,
    }
}

/// Helper to create a live client from environment variables.
pub fn create_live_client() -> Option<EthereumClient> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let rpc_url = std::env::var("ETHEREUM_RPC_URL").ok()?;
    if rpc_url.is_empty() {
        return None;
    }

    EthereumClient::new(&rpc_url).ok()
}

/// Skip test if no live client can be created (missing env vars).
#[macro_export]
macro_rules! skip_if_no_client {
    () => {
        match common::create_live_client() {
            Some(client) => client,
            None => {
                eprintln!("Skipping test: ETHEREUM_RPC_URL not set");
                return;
            }
        }
    };
}
