//! SOL and lamport conversion.

use solana_sdk::native_token::LAMPORTS_PER_SOL;

use crate::blockchain::types::{LedgerError, LedgerResult};

/// Convert a SOL amount to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> LedgerResult<u64> {
    if !sol.is_finite() {
        return Err(LedgerError::InvalidAmount(format!("{} is not a finite number", sol)));
    }
    if sol < 0.0 {
        return Err(LedgerError::InvalidAmount(format!("{} is negative", sol)));
    }

    let lamports = (sol * LAMPORTS_PER_SOL as f64).round();
    // u64::MAX is not exactly representable; the cast would saturate silently.
    if lamports >= u64::MAX as f64 {
        return Err(LedgerError::InvalidAmount(format!(
            "{} SOL exceeds the lamport range",
            sol
        )));
    }

    Ok(lamports as u64)
}

/// Convert lamports to SOL.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
