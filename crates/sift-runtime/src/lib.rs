//! # sift-runtime
//!
//! Runs a search over a schema through a [`SchemaHandle`]:
//!
//! catalog read → table filter → statement synthesis → execution → report.
//!
//! The handle is the only seam to a database driver. Everything else here
//! works on the `sift-core` model and can be exercised against an in-memory
//! handle.

pub mod adapter;
pub mod catalog;
pub mod executor;
pub mod orchestrator;
pub mod report;

pub use adapter::{RowSet, SchemaHandle};
pub use orchestrator::{SearchRun, Searcher};
pub use report::{Report, Summary};
