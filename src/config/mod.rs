//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional) → process environment
//!     → loader.rs (RPC_SERVICE, SENDER_SECRET_KEY, RECEIVER_PUBLIC_KEY, SOL_TO_SEND)
//!     → config file (TOML, optional, via SOL_TRANSFER_CONFIG)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable, passed by reference)
//! ```
//!
//! # Design Decisions
//! - Loaded once at start-up; missing or malformed values are fatal
//! - All tunables have defaults to allow a file-less setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, Settings};
pub use schema::AppConfig;
pub use schema::{Commitment, FailurePolicy};
