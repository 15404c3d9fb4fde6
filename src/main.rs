//! sol-transfer
//!
//! Loads credentials from the environment, checks the sender's balance,
//! sends one SOL transfer, and checks both balances again.
//!
//! # Architecture Overview
//!
//! ```text
//!   .env / environment ──▶ config::Settings (validated once)
//!                               │
//!                               ▼
//!                        workflow::Driver
//!                  ┌────────────┴─────────────┐
//!                  ▼                          ▼
//!        blockchain::BalanceReporter  blockchain::TransferExecutor
//!                  └────────────┬─────────────┘
//!                               ▼
//!               Arc<dyn LedgerClient> (RpcLedgerClient)
//!                               │
//!                               ▼
//!                        Solana JSON-RPC node
//! ```
//!
//! Exit status is 0 once configuration has loaded, whatever the step
//! outcomes; the summary lines say what happened.

use std::sync::Arc;

use sol_transfer::blockchain::{LedgerClient, RpcLedgerClient};
use sol_transfer::config::Settings;
use sol_transfer::observability;
use sol_transfer::workflow::{Driver, RunReport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    observability::init_logging(&settings.config.observability);
    tracing::info!("sol-transfer v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        rpc_url = %settings.config.rpc.url,
        commitment = %settings.config.rpc.commitment,
        sender = %settings.sender.address(),
        "Configuration loaded"
    );

    let client: Arc<dyn LedgerClient> = Arc::new(RpcLedgerClient::new(&settings.config.rpc)?);
    let report = Driver::new(client, &settings).run().await;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &RunReport) {
    match &report.transfer {
        Some(Ok(receipt)) => {
            println!("Transfer confirmed: {}", receipt.signature);
            println!("Explorer: {}", receipt.explorer_url);
        }
        Some(Err(e)) => println!("Transfer failed: {}", e),
        None => println!("Transfer not attempted"),
    }

    for (label, step) in [
        ("Sender balance before", &report.sender_before),
        ("Sender balance after", &report.sender_after),
        ("Recipient balance", &report.recipient_after),
    ] {
        match step {
            Some(Ok(balance)) => {
                println!("{}: {} SOL ({} lamports)", label, balance.sol, balance.lamports)
            }
            Some(Err(e)) => println!("{}: unavailable ({})", label, e),
            None => {}
        }
    }
}
