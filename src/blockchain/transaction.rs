//! Transfer building, signing, submission, and confirmation.
//!
//! # Responsibilities
//! - Build a single system-program transfer with the sender as fee payer
//! - Sign against a fresh blockhash and submit exactly once
//! - Poll until confirmed or until the blockhash validity window closes
//!
//! No retries: a failed attempt is reported, never resubmitted.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction;
use solana_sdk::transaction::Transaction;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use crate::blockchain::client::LedgerClient;
use crate::blockchain::explorer::Explorer;
use crate::blockchain::types::{
    parse_address, BlockReference, ConfirmationStatus, LedgerError, LedgerResult, TransferReceipt,
};
use crate::blockchain::units::sol_to_lamports;
use crate::blockchain::wallet::Wallet;
use crate::config::schema::Commitment;

/// Build an unsigned transfer of `lamports` from `from` to `to`, paid by `from`.
pub fn build_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Transaction {
    let instruction = system_instruction::transfer(from, to, lamports);
    Transaction::new_with_payer(&[instruction], Some(from))
}

/// Executes SOL transfers through a `LedgerClient`.
#[derive(Clone)]
pub struct TransferExecutor {
    client: Arc<dyn LedgerClient>,
    commitment: Commitment,
    poll_interval: Duration,
    explorer: Explorer,
}

impl TransferExecutor {
    pub fn new(
        client: Arc<dyn LedgerClient>,
        commitment: Commitment,
        poll_interval: Duration,
        explorer: Explorer,
    ) -> Self {
        Self {
            client,
            commitment,
            poll_interval,
            explorer,
        }
    }

    /// Send `amount_sol` from `wallet` to `recipient` and wait for confirmation.
    ///
    /// The transaction is submitted at most once. An invalid amount or
    /// recipient fails before any request is made.
    pub async fn execute(
        &self,
        wallet: &Wallet,
        recipient: &str,
        amount_sol: f64,
    ) -> LedgerResult<TransferReceipt> {
        let lamports = sol_to_lamports(amount_sol)?;
        let from = wallet.address();
        let to = parse_address(recipient)?;

        tracing::info!(
            from = %from,
            to = %to,
            sol = amount_sol,
            lamports,
            "Sending transfer"
        );

        let reference = self.client.get_latest_blockhash(self.commitment).await?;
        let mut transaction = build_transfer(&from, &to, lamports);
        wallet.sign_transaction(&mut transaction, reference.blockhash)?;

        tracing::debug!(
            blockhash = %reference.blockhash,
            last_valid_block_height = reference.last_valid_block_height,
            "Submitting transaction"
        );
        let signature = self.client.send_transaction(&transaction).await?;
        tracing::info!(signature = %signature, "Transaction submitted");

        self.confirm(&signature, &reference).await?;

        let explorer_url = self.explorer.transaction_url(&signature);
        tracing::info!(
            signature = %signature,
            explorer_url = %explorer_url,
            "Transfer confirmed"
        );

        Ok(TransferReceipt {
            signature,
            lamports,
            blockhash: reference.blockhash,
            explorer_url,
        })
    }

    /// Best-effort transfer: errors are logged and reported as `None`.
    pub async fn send(
        &self,
        wallet: &Wallet,
        recipient: &str,
        amount_sol: f64,
    ) -> Option<Signature> {
        match self.execute(wallet, recipient, amount_sol).await {
            Ok(receipt) => Some(receipt.signature),
            Err(e) => {
                tracing::error!(recipient = %recipient, error = %e, "Transfer failed");
                None
            }
        }
    }

    /// Wait until `signature` is confirmed.
    ///
    /// Gives up once the block height passes the reference's
    /// `last_valid_block_height`; there is no other deadline.
    pub async fn confirm(
        &self,
        signature: &Signature,
        reference: &BlockReference,
    ) -> LedgerResult<()> {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self
                .client
                .get_signature_status(signature, self.commitment)
                .await?
            {
                ConfirmationStatus::Confirmed => return Ok(()),
                ConfirmationStatus::Failed(reason) => {
                    return Err(LedgerError::Transaction(reason));
                }
                ConfirmationStatus::Pending => {}
            }

            let block_height = self.client.get_block_height(self.commitment).await?;
            if block_height > reference.last_valid_block_height {
                // One last look: it may have landed between the two calls.
                return match self
                    .client
                    .get_signature_status(signature, self.commitment)
                    .await?
                {
                    ConfirmationStatus::Confirmed => Ok(()),
                    ConfirmationStatus::Failed(reason) => Err(LedgerError::Transaction(reason)),
                    ConfirmationStatus::Pending => Err(LedgerError::BlockhashExpired {
                        last_valid_block_height: reference.last_valid_block_height,
                        current_block_height: block_height,
                    }),
                };
            }

            tracing::debug!(
                signature = %signature,
                block_height,
                last_valid_block_height = reference.last_valid_block_height,
                "Transaction pending"
            );
        }
    }
}

impl std::fmt::Debug for TransferExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferExecutor")
            .field("commitment", &self.commitment)
            .field("poll_interval", &self.poll_interval)
            .field("explorer", &self.explorer)
            .finish_non_exhaustive()
    }
}
