//! Balance lookups in human-readable units.

use std::sync::Arc;

use crate::blockchain::client::LedgerClient;
use crate::blockchain::types::{parse_address, Balance, LedgerResult};
use crate::config::schema::Commitment;

/// Reads account balances and logs them in lamports and SOL.
#[derive(Clone)]
pub struct BalanceReporter {
    client: Arc<dyn LedgerClient>,
    commitment: Commitment,
}

impl BalanceReporter {
    pub fn new(client: Arc<dyn LedgerClient>, commitment: Commitment) -> Self {
        Self { client, commitment }
    }

    /// Balance of `address`, or the error that prevented reading it.
    pub async fn balance(&self, address: &str) -> LedgerResult<Balance> {
        let pubkey = parse_address(address)?;
        tracing::info!(address = %pubkey, commitment = %self.commitment, "Checking balance");

        let lamports = self.client.get_balance(&pubkey, self.commitment).await?;
        let balance = Balance::from_lamports(lamports);

        tracing::info!(
            address = %pubkey,
            lamports = balance.lamports,
            sol = balance.sol,
            "Balance"
        );
        Ok(balance)
    }

    /// Best-effort balance: errors are logged and reported as zero.
    pub async fn report(&self, address: &str) -> Balance {
        match self.balance(address).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::error!(address = %address, error = %e, "Failed to read balance");
                Balance::ZERO
            }
        }
    }
}

impl std::fmt::Debug for BalanceReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceReporter")
            .field("commitment", &self.commitment)
            .finish_non_exhaustive()
    }
}
