//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (address, signature, lamports)
//!
//! Consumers:
//!     → stdout via the fmt layer (logging.rs)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of interpolated strings
//! - Secret key material is never a field value

pub mod logging;

pub use logging::init_logging;
