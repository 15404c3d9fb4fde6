//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (secret key, RPC URL)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → balance.rs (lamport lookups, SOL reporting)
//!     → transaction.rs (build, sign, submit, confirm)
//!     → explorer.rs (links for confirmed transfers)
//! ```
//!
//! # Security Constraints
//! - Secret keys ONLY from environment variables
//! - Never log secret keys
//! - All RPC calls have configurable timeouts

pub mod balance;
pub mod client;
pub mod explorer;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use balance::BalanceReporter;
pub use client::{LedgerClient, RpcLedgerClient};
pub use explorer::Explorer;
pub use transaction::TransferExecutor;
pub use types::{
    parse_address, Balance, BlockReference, ConfirmationStatus, LedgerError, LedgerResult,
    TransferReceipt,
};
pub use wallet::Wallet;
