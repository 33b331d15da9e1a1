//! Wallet management and transaction signing.

use alloy::{
    consensus::SignableTransaction,
    network::TxSignerSync,
    primitives::Address,
    signers::local::PrivateKeySigner,
};

use crate::{
    error::{AppError, Result},
    types::{SignedTransaction, UnsignedTransaction},
};

/// Holds the private key of the sending account.
///
/// The key never leaves this type: it is not serialized and `Debug` prints
/// only the derived address.
#[derive(Clone)]
pub struct WalletManager {
    /// The local signer.
    signer: PrivateKeySigner,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Credential(e.to_string())
            })?;

        let address = signer.address();

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { signer, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `tx` as an EIP-155 legacy transaction.
    ///
    /// The chain id carried by `tx` is part of the signing hash, so the result
    /// is only valid on that chain. Signing is deterministic (RFC 6979).
    pub fn sign(&self, tx: &UnsignedTransaction) -> Result<SignedTransaction> {
        let mut legacy = tx.to_legacy();
        let signature = self
            .signer
            .sign_transaction_sync(&mut legacy)
            .map_err(|e| AppError::Signing(e.to_string()))?;

        let signed = SignedTransaction::new(legacy.into_signed(signature), self.address);

        tracing::debug!(
            hash = %signed.hash(),
            nonce = tx.nonce,
            chain_id = tx.chain_id,
            "Transaction signed"
        );

        Ok(signed)
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes, U256};

    // A valid test private key (DO NOT use in production!)
    // This is a well-known test key from Hardhat/Foundry
    const TEST_PRIVATE_KEY: &str =
        "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_PRIVATE_KEY_NO_PREFIX: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    const RECIPIENT: Address = address!("70997970c51812dc3a010c7d01b50e0d17dc79c8");
    const SEPOLIA: u64 = 11155111;

    fn sample_transfer() -> UnsignedTransaction {
        UnsignedTransaction::transfer(
            7,
            RECIPIENT,
            U256::from(50_000_000_000_000_000u64),
            21_000,
            2_000_000_000,
            SEPOLIA,
        )
    }

    #[test]
    fn test_wallet_from_private_key_with_prefix() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        assert_eq!(wallet.address(), TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_from_private_key_without_prefix() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY_NO_PREFIX).unwrap();
        assert_eq!(wallet.address(), TEST_ADDRESS);
    }

    #[test]
    fn test_wallet_invalid_private_key() {
        // Too short
        assert!(WalletManager::from_private_key("0x1234").is_err());
        // Invalid hex
        assert!(WalletManager::from_private_key("0xZZZZ").is_err());
        // Empty
        assert!(WalletManager::from_private_key("").is_err());
    }

    #[test]
    fn test_wallet_error_is_credential_variant() {
        match WalletManager::from_private_key("invalid_key") {
            Err(AppError::Credential(msg)) => assert!(!msg.is_empty()),
            other => panic!("Expected Credential error, got {:?}", other),
        }
    }

    #[test]
    fn test_wallet_debug_hides_key() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let debug_str = format!("{:?}", wallet);

        assert!(debug_str.contains("WalletManager"));
        assert!(debug_str.contains("address"));
        assert!(!debug_str.contains(TEST_PRIVATE_KEY_NO_PREFIX));
    }

    #[test]
    fn test_sign_recovers_sender_and_binds_chain() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let tx = sample_transfer();
        let signed = wallet.sign(&tx).unwrap();

        assert_eq!(signed.from(), TEST_ADDRESS);
        assert_eq!(signed.recover_signer().unwrap(), TEST_ADDRESS);
        assert_eq!(signed.chain_id(), Some(SEPOLIA));

        assert_eq!(signed.nonce(), 7);
        assert_eq!(signed.to(), Some(RECIPIENT));
        assert_eq!(signed.value(), U256::from(50_000_000_000_000_000u64));
        assert_eq!(signed.gas_limit(), 21_000);
        assert_eq!(signed.gas_price(), 2_000_000_000);
    }

    #[test]
    fn test_sign_is_deterministic() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let tx = sample_transfer();

        let first = wallet.sign(&tx).unwrap();
        let second = wallet.sign(&tx).unwrap();

        assert_eq!(first.hash(), second.hash());
        assert_eq!(first.inner().signature(), second.inner().signature());
        assert_eq!(first.encoded(), second.encoded());
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let base = sample_transfer();
        let base_hash = wallet.sign(&base).unwrap().hash();

        let variants = [
            UnsignedTransaction { nonce: 8, ..base.clone() },
            UnsignedTransaction { to: TEST_ADDRESS, ..base.clone() },
            UnsignedTransaction { value: U256::from(1u8), ..base.clone() },
            UnsignedTransaction { input: Bytes::from_static(&[1]), ..base.clone() },
            UnsignedTransaction { gas_limit: 21_001, ..base.clone() },
            UnsignedTransaction { gas_price: 1, ..base.clone() },
            UnsignedTransaction { chain_id: 1, ..base.clone() },
        ];

        for variant in variants {
            let hash = wallet.sign(&variant).unwrap().hash();
            assert_ne!(hash, base_hash, "hash unchanged for {:?}", variant);
        }
    }

    #[test]
    fn test_signature_differs_across_chains() {
        let wallet = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let sepolia = wallet.sign(&sample_transfer()).unwrap();
        let mainnet =
            wallet.sign(&UnsignedTransaction { chain_id: 1, ..sample_transfer() }).unwrap();

        assert_ne!(sepolia.inner().signature(), mainnet.inner().signature());
        assert_eq!(mainnet.recover_signer().unwrap(), TEST_ADDRESS);
    }

    #[test]
    fn test_different_keys_different_addresses() {
        // Second Hardhat test account
        let key2 = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";

        let wallet1 = WalletManager::from_private_key(TEST_PRIVATE_KEY).unwrap();
        let wallet2 = WalletManager::from_private_key(key2).unwrap();

        assert_ne!(wallet1.address(), wallet2.address());
        assert_eq!(wallet2.address(), RECIPIENT);
    }
}
