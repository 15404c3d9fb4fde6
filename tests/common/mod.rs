//! Shared utilities for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use sol_transfer::blockchain::{
    BlockReference, ConfirmationStatus, LedgerClient, LedgerError, LedgerResult, Wallet,
};
use sol_transfer::config::schema::{Commitment, FailurePolicy};
use sol_transfer::config::{AppConfig, Settings};

/// Flat fee charged to the payer per submitted transaction.
pub const FEE_LAMPORTS: u64 = 5_000;
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// How the mock answers signature status polls.
#[derive(Debug, Clone)]
pub enum ConfirmBehavior {
    /// Confirmed on the first poll after submission.
    Confirm,
    /// Pending for this many polls, then confirmed.
    ConfirmAfter(u32),
    /// Landed but failed on-chain.
    Fail(String),
    /// Pending for this many polls, then failed on-chain.
    FailAfter(u32, String),
    /// Never seen by the ledger.
    NeverLand,
}

/// In-memory ledger implementing `LedgerClient`.
pub struct MockLedger {
    balances: Mutex<HashMap<Pubkey, u64>>,
    submitted: Mutex<Vec<Transaction>>,
    calls: Mutex<Vec<&'static str>>,
    blockhash: Hash,
    last_valid_block_height: u64,
    block_height: AtomicU64,
    block_advance: u64,
    status_polls: AtomicU32,
    confirm: ConfirmBehavior,
    fail_balance: bool,
    fail_blockhash: bool,
    reject_send: Option<String>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            balances: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            blockhash: Hash::new_unique(),
            last_valid_block_height: 150,
            block_height: AtomicU64::new(100),
            block_advance: 0,
            status_polls: AtomicU32::new(0),
            confirm: ConfirmBehavior::Confirm,
            fail_balance: false,
            fail_blockhash: false,
            reject_send: None,
        }
    }

    pub fn with_balance(self, address: Pubkey, lamports: u64) -> Self {
        self.balances.lock().unwrap().insert(address, lamports);
        self
    }

    pub fn with_confirm(mut self, confirm: ConfirmBehavior) -> Self {
        self.confirm = confirm;
        self
    }

    /// Advance the block height by `blocks` on every height query.
    pub fn with_block_advance(mut self, blocks: u64) -> Self {
        self.block_advance = blocks;
        self
    }

    pub fn failing_balance(mut self) -> Self {
        self.fail_balance = true;
        self
    }

    pub fn failing_blockhash(mut self) -> Self {
        self.fail_blockhash = true;
        self
    }

    pub fn rejecting_send(mut self, reason: &str) -> Self {
        self.reject_send = Some(reason.to_string());
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    pub fn submitted(&self) -> Vec<Transaction> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| **c == method).count()
    }

    pub fn status_polls(&self) -> u32 {
        self.status_polls.load(Ordering::SeqCst)
    }

    pub fn lamports(&self, address: &Pubkey) -> u64 {
        self.balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        self.calls.lock().unwrap().push(method);
    }

    fn was_submitted(&self, signature: &Signature) -> bool {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .any(|tx| tx.signatures.first() == Some(signature))
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_balance(&self, address: &Pubkey, _commitment: Commitment) -> LedgerResult<u64> {
        self.record("getBalance");
        if self.fail_balance {
            return Err(LedgerError::Network("connection refused".to_string()));
        }
        Ok(self.lamports(address))
    }

    async fn get_latest_blockhash(&self, _commitment: Commitment) -> LedgerResult<BlockReference> {
        self.record("getLatestBlockhash");
        if self.fail_blockhash {
            return Err(LedgerError::Timeout(30));
        }
        Ok(BlockReference {
            blockhash: self.blockhash,
            last_valid_block_height: self.last_valid_block_height,
        })
    }

    async fn send_transaction(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        self.record("sendTransaction");
        if let Some(reason) = &self.reject_send {
            return Err(LedgerError::Transaction(reason.clone()));
        }
        if transaction.verify().is_err() {
            return Err(LedgerError::Transaction("signature verification failed".to_string()));
        }
        if transaction.message.recent_blockhash != self.blockhash {
            return Err(LedgerError::Transaction("Blockhash not found".to_string()));
        }

        let (from, to, lamports) = decode_transfer(transaction);
        {
            let mut balances = self.balances.lock().unwrap();
            let payer = balances.get(&from).copied().unwrap_or(0);
            let debit = lamports + FEE_LAMPORTS;
            if payer < debit {
                return Err(LedgerError::Transaction("insufficient funds".to_string()));
            }
            balances.insert(from, payer - debit);
            *balances.entry(to).or_insert(0) += lamports;
        }

        self.submitted.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
        _commitment: Commitment,
    ) -> LedgerResult<ConfirmationStatus> {
        self.record("getSignatureStatus");
        let polls = self.status_polls.fetch_add(1, Ordering::SeqCst) + 1;

        if !self.was_submitted(signature) {
            return Ok(ConfirmationStatus::Pending);
        }

        Ok(match &self.confirm {
            ConfirmBehavior::Confirm => ConfirmationStatus::Confirmed,
            ConfirmBehavior::ConfirmAfter(pending) if polls > *pending => {
                ConfirmationStatus::Confirmed
            }
            ConfirmBehavior::ConfirmAfter(_) => ConfirmationStatus::Pending,
            ConfirmBehavior::Fail(reason) => ConfirmationStatus::Failed(reason.clone()),
            ConfirmBehavior::FailAfter(pending, reason) if polls > *pending => {
                ConfirmationStatus::Failed(reason.clone())
            }
            ConfirmBehavior::FailAfter(..) => ConfirmationStatus::Pending,
            ConfirmBehavior::NeverLand => ConfirmationStatus::Pending,
        })
    }

    async fn get_block_height(&self, _commitment: Commitment) -> LedgerResult<u64> {
        self.record("getBlockHeight");
        Ok(self.block_height.fetch_add(self.block_advance, Ordering::SeqCst) + self.block_advance)
    }
}

/// Decode the single system transfer in `transaction` as (from, to, lamports).
pub fn decode_transfer(transaction: &Transaction) -> (Pubkey, Pubkey, u64) {
    let message = &transaction.message;
    assert_eq!(message.instructions.len(), 1, "expected one instruction");

    let ix = &message.instructions[0];
    assert_eq!(
        message.account_keys[ix.program_id_index as usize],
        solana_sdk::system_program::id()
    );
    assert_eq!(&ix.data[..4], &2u32.to_le_bytes(), "not a transfer");

    let from = message.account_keys[ix.accounts[0] as usize];
    let to = message.account_keys[ix.accounts[1] as usize];
    let lamports = u64::from_le_bytes(ix.data[4..12].try_into().unwrap());
    (from, to, lamports)
}

/// Settings for a devnet run with fast confirmation polling.
pub fn settings(
    sender: &Wallet,
    recipient: &Pubkey,
    amount_sol: f64,
    policy: FailurePolicy,
) -> Settings {
    let mut config = AppConfig::default();
    config.rpc.url = "https://api.devnet.solana.com".to_string();
    config.confirmation.poll_interval_ms = 1;
    config.driver.on_failure = policy;

    Settings {
        config,
        sender: sender.clone(),
        recipient: recipient.to_string(),
        amount_sol,
    }
}

pub fn new_wallet() -> Wallet {
    Wallet::from_keypair(Keypair::new())
}
