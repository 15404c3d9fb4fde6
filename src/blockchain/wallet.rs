//! Sender key material and transaction signing.
//!
//! # Security
//! - The secret key is loaded ONLY from the environment
//! - Keys are never logged or serialized
//! - Error messages describe the shape of bad input, never its content

use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use std::sync::Arc;

use crate::blockchain::types::{LedgerError, LedgerResult};

/// Environment variable holding the secret key as a JSON byte array.
pub const SENDER_SECRET_KEY_ENV_VAR: &str = "SENDER_SECRET_KEY";

/// Length of an ed25519 keypair (secret half followed by public half).
const KEYPAIR_LENGTH: usize = 64;

/// Signing wallet for the sender.
#[derive(Clone)]
pub struct Wallet {
    keypair: Arc<Keypair>,
}

impl Wallet {
    /// Create a wallet from the 64 raw keypair bytes.
    pub fn from_secret_bytes(bytes: &[u8]) -> LedgerResult<Self> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(LedgerError::Wallet(format!(
                "Invalid secret key length: expected {} bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            )));
        }

        let keypair = Keypair::from_bytes(bytes)
            .map_err(|_| LedgerError::Wallet("Invalid secret key bytes".to_string()))?;

        tracing::info!(address = %keypair.pubkey(), "Wallet initialized");

        Ok(Self {
            keypair: Arc::new(keypair),
        })
    }

    /// Create a wallet from a JSON array of integers, e.g. `[12,250,...]`.
    ///
    /// This is the format written by `solana-keygen`.
    pub fn from_json_array(json: &str) -> LedgerResult<Self> {
        let bytes: Vec<u8> = serde_json::from_str(json).map_err(|e| {
            LedgerError::Wallet(format!(
                "Secret key must be a JSON array of bytes (error at line {}, column {})",
                e.line(),
                e.column()
            ))
        })?;
        Self::from_secret_bytes(&bytes)
    }

    /// Wrap an existing keypair.
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            keypair: Arc::new(keypair),
        }
    }

    /// The wallet's public address.
    pub fn address(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign a transaction against `blockhash`. The wallet must be its fee payer.
    pub fn sign_transaction(&self, tx: &mut Transaction, blockhash: Hash) -> LedgerResult<()> {
        tx.try_sign(&[self.keypair.as_ref()], blockhash)
            .map_err(|e| LedgerError::Wallet(format!("Signing failed: {}", e)))
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
