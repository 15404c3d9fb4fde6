//! Solana SOL transfer client library.

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod workflow;

pub use config::{AppConfig, Settings};
pub use workflow::{Driver, RunReport};
