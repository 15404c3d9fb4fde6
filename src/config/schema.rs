//! Configuration schema definitions.
//!
//! Tunables for the transfer workflow. Every section has defaults so an
//! empty (or absent) settings file is valid; secrets never live here and are
//! read from the environment by the loader instead.

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

/// Default public devnet endpoint.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Root configuration for the transfer client.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Confirmation polling settings.
    pub confirmation: ConfirmationConfig,

    /// Block explorer link settings.
    pub explorer: ExplorerConfig,

    /// Driver step-failure policy.
    pub driver: DriverConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Commitment level requested when reading ledger state.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl From<Commitment> for CommitmentConfig {
    fn from(commitment: Commitment) -> Self {
        match commitment {
            Commitment::Processed => CommitmentConfig::processed(),
            Commitment::Confirmed => CommitmentConfig::confirmed(),
            Commitment::Finalized => CommitmentConfig::finalized(),
        }
    }
}

impl std::fmt::Display for Commitment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        };
        f.write_str(name)
    }
}

/// JSON-RPC connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL. `RPC_SERVICE` takes precedence.
    pub url: String,

    /// Commitment used for balance reads, blockhash fetches and confirmation.
    pub commitment: Commitment,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RPC_URL.to_string(),
            commitment: Commitment::Confirmed,
            timeout_secs: 30,
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Delay between signature status polls in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

/// Explorer link configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Explorer root (e.g., "https://explorer.solana.com").
    pub base_url: String,

    /// Cluster query parameter. Inferred from the RPC URL when unset.
    pub cluster: Option<String>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://explorer.solana.com".to_string(),
            cluster: None,
        }
    }
}

/// What the driver does after a failed step.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and run the remaining steps.
    #[default]
    Continue,
    /// Stop at the first failed step.
    Halt,
}

/// Driver configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
#[serde(default)]
pub struct DriverConfig {
    pub on_failure: FailurePolicy,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
