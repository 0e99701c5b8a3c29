//! Batched migration of legacy receipts
//!
//! - [`driver`] - run orchestration and the [`RunState`] machine
//! - [`report`] - counters, summary rendering and the failure log
//! - [`batch`] - page window arithmetic

pub mod batch;
pub mod driver;
pub mod report;

pub use batch::PageWindow;
pub use driver::{DriverSettings, MigrationDriver, RunOptions};
pub use report::{FailureEntry, RunReport, RunState};
