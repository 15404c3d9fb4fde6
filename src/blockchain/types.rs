//! Ledger types and error definitions.

use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Address string is not a valid base-58 public key.
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Amount cannot be expressed in lamports.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Network(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was rejected by the ledger or failed on-chain.
    #[error("Transaction rejected: {0}")]
    Transaction(String),

    /// Blockhash validity window passed before the transaction landed.
    #[error(
        "Blockhash expired: block height {current_block_height} exceeds last valid height {last_valid_block_height}"
    )]
    BlockhashExpired {
        last_valid_block_height: u64,
        current_block_height: u64,
    },

    /// Invalid key material or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// A recent blockhash and the last block height at which it is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockReference {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Signature status as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Not yet seen at the requested commitment.
    Pending,
    /// Landed and succeeded at the requested commitment.
    Confirmed,
    /// Landed but failed.
    Failed(String),
}

/// Account balance in both units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    pub lamports: u64,
    pub sol: f64,
}

impl Balance {
    pub const ZERO: Balance = Balance {
        lamports: 0,
        sol: 0.0,
    };

    pub fn from_lamports(lamports: u64) -> Self {
        Self {
            lamports,
            sol: crate::blockchain::units::lamports_to_sol(lamports),
        }
    }
}

/// Outcome of a confirmed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub signature: Signature,
    pub lamports: u64,
    pub blockhash: Hash,
    pub explorer_url: String,
}

/// Parse a base-58 account address.
pub fn parse_address(input: &str) -> LedgerResult<Pubkey> {
    input
        .trim()
        .parse::<Pubkey>()
        .map_err(|e| LedgerError::InvalidAddress {
            input: input.to_string(),
            reason: e.to_string(),
        })
}
