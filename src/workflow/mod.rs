//! Workflow orchestration.
//!
//! Sequences the ledger operations for one run:
//! sender balance → transfer → sender balance → recipient balance.
//! Steps run strictly one after another; each depends on the previous
//! one having finished.

pub mod driver;

pub use driver::{Driver, DriverState, Party, RunReport};
