//! Per-table synchronization from the source database into the target.
//!
//! [`SyncOrchestrator`] walks the configured tables in order and runs each
//! one's strategy (see [`strategy`]). A failing table is logged and recorded
//! in the [`RunSummary`]; it never stops the tables after it.

pub mod error;
pub mod orchestrator;
pub mod strategy;
pub mod summary;


pub use error::SyncError;
pub use orchestrator::SyncOrchestrator;
pub use summary::{RunSummary, TableOutcome, TableReport, TableStats};
