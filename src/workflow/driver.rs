//! The transfer workflow as a single-path state machine.
//!
//! ```text
//! Init → BalanceChecked(Sender) → Submitted → BalanceChecked(Sender)
//!      → BalanceChecked(Recipient) → Done
//! ```
//!
//! Every step returns a typed result. With `FailurePolicy::Continue` a failed
//! step is logged and the next one still runs; with `FailurePolicy::Halt` the
//! machine moves to `Halted` and the remaining steps are skipped.

use solana_sdk::signature::Signature;
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::{
    Balance, BalanceReporter, Explorer, LedgerClient, LedgerResult, TransferExecutor,
    TransferReceipt, Wallet,
};
use crate::config::loader::Settings;
use crate::config::schema::FailurePolicy;

/// Whose balance a step reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Sender,
    Recipient,
}

/// Driver states, in the order they are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Init,
    BalanceChecked(Party),
    /// The transfer step has run (see `RunReport::transfer` for its outcome).
    Submitted,
    Done,
    /// A step failed under `FailurePolicy::Halt`.
    Halted,
}

/// What happened during one run.
#[derive(Debug)]
pub struct RunReport {
    pub states: Vec<DriverState>,
    pub sender_before: Option<LedgerResult<Balance>>,
    pub transfer: Option<LedgerResult<TransferReceipt>>,
    pub sender_after: Option<LedgerResult<Balance>>,
    pub recipient_after: Option<LedgerResult<Balance>>,
}

impl RunReport {
    fn new() -> Self {
        Self {
            states: vec![DriverState::Init],
            sender_before: None,
            transfer: None,
            sender_after: None,
            recipient_after: None,
        }
    }

    /// Last state reached.
    pub fn final_state(&self) -> DriverState {
        self.states.last().copied().unwrap_or(DriverState::Init)
    }

    /// Signature of the confirmed transfer, if any.
    pub fn signature(&self) -> Option<Signature> {
        match &self.transfer {
            Some(Ok(receipt)) => Some(receipt.signature),
            _ => None,
        }
    }

    /// Number of steps that ran and failed.
    pub fn failures(&self) -> usize {
        let balances = [&self.sender_before, &self.sender_after, &self.recipient_after]
            .into_iter()
            .filter(|step| matches!(step, Some(Err(_))))
            .count();
        let transfer = usize::from(matches!(self.transfer, Some(Err(_))));
        balances + transfer
    }
}

/// Runs the workflow once over an explicit set of collaborators.
#[derive(Debug)]
pub struct Driver {
    reporter: BalanceReporter,
    executor: TransferExecutor,
    sender: Wallet,
    recipient: String,
    amount_sol: f64,
    policy: FailurePolicy,
}

impl Driver {
    /// Wire a driver from loaded settings and a shared ledger client.
    pub fn new(client: Arc<dyn LedgerClient>, settings: &Settings) -> Self {
        let config = &settings.config;
        let explorer = Explorer::new(&config.explorer, &config.rpc.url);

        Self {
            reporter: BalanceReporter::new(client.clone(), config.rpc.commitment),
            executor: TransferExecutor::new(
                client,
                config.rpc.commitment,
                Duration::from_millis(config.confirmation.poll_interval_ms),
                explorer,
            ),
            sender: settings.sender.clone(),
            recipient: settings.recipient.clone(),
            amount_sol: settings.amount_sol,
            policy: config.driver.on_failure,
        }
    }

    /// Run every step in order and report what happened.
    pub async fn run(&self) -> RunReport {
        let mut report = RunReport::new();
        let sender = self.sender.address().to_string();

        tracing::info!(
            sender = %sender,
            recipient = %self.recipient,
            sol = self.amount_sol,
            policy = ?self.policy,
            "Starting transfer workflow"
        );

        let before = self.reporter.balance(&sender).await;
        let proceed = self.advance(
            &mut report,
            DriverState::BalanceChecked(Party::Sender),
            "sender balance",
            &before,
        );
        report.sender_before = Some(before);
        if !proceed {
            return report;
        }

        let transfer = self
            .executor
            .execute(&self.sender, &self.recipient, self.amount_sol)
            .await;
        let proceed = self.advance(&mut report, DriverState::Submitted, "transfer", &transfer);
        report.transfer = Some(transfer);
        if !proceed {
            return report;
        }

        let after = self.reporter.balance(&sender).await;
        let proceed = self.advance(
            &mut report,
            DriverState::BalanceChecked(Party::Sender),
            "sender balance",
            &after,
        );
        report.sender_after = Some(after);
        if !proceed {
            return report;
        }

        let recipient = self.reporter.balance(&self.recipient).await;
        let proceed = self.advance(
            &mut report,
            DriverState::BalanceChecked(Party::Recipient),
            "recipient balance",
            &recipient,
        );
        report.recipient_after = Some(recipient);
        if !proceed {
            return report;
        }

        report.states.push(DriverState::Done);
        tracing::info!(failures = report.failures(), "Transfer workflow finished");
        report
    }

    /// Record a finished step. Returns false when the run must stop.
    fn advance<T>(
        &self,
        report: &mut RunReport,
        state: DriverState,
        step: &'static str,
        result: &LedgerResult<T>,
    ) -> bool {
        report.states.push(state);

        let Err(e) = result else {
            return true;
        };

        match self.policy {
            FailurePolicy::Continue => {
                tracing::warn!(step, error = %e, "Step failed; continuing");
                true
            }
            FailurePolicy::Halt => {
                tracing::error!(step, error = %e, "Step failed; halting");
                report.states.push(DriverState::Halted);
                false
            }
        }
    }
}
