//! Configuration loading from the environment and disk.
//!
//! Secrets and per-run values come from environment variables (optionally
//! seeded from a `.env` file). Tunables come from an optional TOML file.
//! Lookups go through a closure so tests never touch the process environment.

use std::fs;
use std::path::Path;

use crate::blockchain::units::sol_to_lamports;
use crate::blockchain::wallet::{Wallet, SENDER_SECRET_KEY_ENV_VAR};
use crate::blockchain::parse_address;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// RPC endpoint URL.
pub const RPC_URL_ENV_VAR: &str = "RPC_SERVICE";
/// Recipient base-58 address.
pub const RECIPIENT_ENV_VAR: &str = "RECEIVER_PUBLIC_KEY";
/// Transfer amount in SOL.
pub const AMOUNT_ENV_VAR: &str = "SOL_TO_SEND";
/// Optional path to a TOML settings file.
pub const CONFIG_PATH_ENV_VAR: &str = "SOL_TRANSFER_CONFIG";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Missing(&'static str),
    Malformed { var: &'static str, reason: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Missing(var) => write!(f, "Environment variable {} not set", var),
            ConfigError::Malformed { var, reason } => {
                write!(f, "Environment variable {} is malformed: {}", var, reason)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything one run of the workflow needs, loaded once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: AppConfig,
    pub sender: Wallet,
    pub recipient: String,
    pub amount_sol: f64,
}

impl Settings {
    /// Load settings from the process environment, seeding it from `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(env_lookup)
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = load_app_config(&lookup)?;
        let sender = load_sender(&lookup)?;
        let recipient = load_recipient(&lookup)?;
        let amount_sol = load_amount(&lookup)?;

        Ok(Self {
            config,
            sender,
            recipient,
            amount_sol,
        })
    }
}

/// Read `.env` from the working directory if present. Existing variables win.
pub fn load_dotenv() {
    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

/// Lookup backed by `std::env`.
pub fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

/// Load a TOML settings file without validating it.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Build the validated tunables: optional TOML file, then `RPC_SERVICE`.
pub fn load_app_config<F>(lookup: &F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match non_empty(lookup, CONFIG_PATH_ENV_VAR) {
        Some(path) => load_config(Path::new(&path))?,
        None => AppConfig::default(),
    };

    config.rpc.url = require(lookup, RPC_URL_ENV_VAR)?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load the sender's key material from `SENDER_SECRET_KEY`.
pub fn load_sender<F>(lookup: &F) -> Result<Wallet, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require(lookup, SENDER_SECRET_KEY_ENV_VAR)?;
    Wallet::from_json_array(&raw).map_err(|e| ConfigError::Malformed {
        var: SENDER_SECRET_KEY_ENV_VAR,
        reason: e.to_string(),
    })
}

/// Load and syntactically check the recipient address.
pub fn load_recipient<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require(lookup, RECIPIENT_ENV_VAR)?;
    parse_address(&raw).map_err(|e| ConfigError::Malformed {
        var: RECIPIENT_ENV_VAR,
        reason: e.to_string(),
    })?;
    Ok(raw)
}

/// Load the transfer amount in SOL.
pub fn load_amount<F>(lookup: &F) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = require(lookup, AMOUNT_ENV_VAR)?;
    let malformed = |reason: String| ConfigError::Malformed {
        var: AMOUNT_ENV_VAR,
        reason,
    };

    let amount: f64 = raw
        .parse()
        .map_err(|e: std::num::ParseFloatError| malformed(format!("'{}': {}", raw, e)))?;
    sol_to_lamports(amount).map_err(|e| malformed(e.to_string()))?;

    Ok(amount)
}

fn non_empty<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require<F>(lookup: &F, var: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, var).ok_or(ConfigError::Missing(var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::FailurePolicy;
    use solana_sdk::signature::{Keypair, Signer};
    use std::collections::HashMap;
    use std::io::Write;

    fn secret_json(keypair: &Keypair) -> String {
        serde_json::to_string(&keypair.to_bytes().to_vec()).unwrap()
    }

    fn env(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env(sender: &Keypair, recipient: &Keypair) -> Vec<(&'static str, String)> {
        vec![
            (RPC_URL_ENV_VAR, "https://api.devnet.solana.com".to_string()),
            (SENDER_SECRET_KEY_ENV_VAR, secret_json(sender)),
            (RECIPIENT_ENV_VAR, recipient.pubkey().to_string()),
            (AMOUNT_ENV_VAR, "0.001".to_string()),
        ]
    }

    #[test]
    fn test_loads_complete_environment() {
        let sender = Keypair::new();
        let recipient = Keypair::new();
        let settings = Settings::from_lookup(env(&full_env(&sender, &recipient))).unwrap();

        assert_eq!(settings.sender.address(), sender.pubkey());
        assert_eq!(settings.recipient, recipient.pubkey().to_string());
        assert_eq!(settings.amount_sol, 0.001);
        assert_eq!(settings.config.rpc.url, "https://api.devnet.solana.com");
    }

    #[test]
    fn test_each_missing_variable_is_reported() {
        let sender = Keypair::new();
        let recipient = Keypair::new();

        for var in [
            RPC_URL_ENV_VAR,
            SENDER_SECRET_KEY_ENV_VAR,
            RECIPIENT_ENV_VAR,
            AMOUNT_ENV_VAR,
        ] {
            let pairs: Vec<_> = full_env(&sender, &recipient)
                .into_iter()
                .filter(|(k, _)| *k != var)
                .collect();
            let err = Settings::from_lookup(env(&pairs)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Missing(v) if v == var),
                "expected Missing({}), got {:?}",
                var,
                err
            );
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let lookup = env(&[(RPC_URL_ENV_VAR, "   ".to_string())]);
        let err = load_app_config(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(RPC_URL_ENV_VAR)));
    }

    #[test]
    fn test_malformed_amount() {
        for raw in ["abc", "-1", "NaN", "inf"] {
            let lookup = env(&[(AMOUNT_ENV_VAR, raw.to_string())]);
            let err = load_amount(&lookup).unwrap_err();
            assert!(
                matches!(err, ConfigError::Malformed { var: AMOUNT_ENV_VAR, .. }),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_zero_amount_is_accepted() {
        let lookup = env(&[(AMOUNT_ENV_VAR, "0".to_string())]);
        assert_eq!(load_amount(&lookup).unwrap(), 0.0);
    }

    #[test]
    fn test_malformed_recipient() {
        let lookup = env(&[(RECIPIENT_ENV_VAR, "not-base58!".to_string())]);
        let err = load_recipient(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { var: RECIPIENT_ENV_VAR, .. }));
    }

    #[test]
    fn test_malformed_secret_is_not_echoed() {
        let lookup = env(&[(SENDER_SECRET_KEY_ENV_VAR, "[1,2,3,250]".to_string())]);
        let err = load_sender(&lookup).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(SENDER_SECRET_KEY_ENV_VAR));
        assert!(!message.contains("250"));
    }

    #[test]
    fn test_invalid_rpc_url_fails_validation() {
        let lookup = env(&[(RPC_URL_ENV_VAR, "ftp://example.com".to_string())]);
        let err = load_app_config(&lookup).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed"));
    }

    #[test]
    fn test_settings_file_overrides_defaults() {
        let mut file = temp_settings_file("settings.toml");
        writeln!(
            file.1,
            "[rpc]\nurl = \"http://ignored:8899\"\ncommitment = \"finalized\"\n\n[driver]\non_failure = \"halt\""
        )
        .unwrap();

        let lookup = env(&[
            (CONFIG_PATH_ENV_VAR, file.0.display().to_string()),
            (RPC_URL_ENV_VAR, "http://127.0.0.1:8899".to_string()),
        ]);
        let config = load_app_config(&lookup).unwrap();

        // RPC_SERVICE wins over the file.
        assert_eq!(config.rpc.url, "http://127.0.0.1:8899");
        assert_eq!(config.rpc.commitment.to_string(), "finalized");
        assert_eq!(config.driver.on_failure, FailurePolicy::Halt);

        let _ = std::fs::remove_file(&file.0);
    }

    #[test]
    fn test_missing_settings_file() {
        let lookup = env(&[
            (CONFIG_PATH_ENV_VAR, "/definitely/not/here.toml".to_string()),
            (RPC_URL_ENV_VAR, "http://127.0.0.1:8899".to_string()),
        ]);
        assert!(matches!(
            load_app_config(&lookup).unwrap_err(),
            ConfigError::Io(_)
        ));
    }

    fn temp_settings_file(name: &str) -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!(
            "sol-transfer-{}-{}",
            std::process::id(),
            name
        ));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
