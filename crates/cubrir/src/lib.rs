//! Cubrir: the coverage-history model behind the `cubridor` CLI.
//!
//! Cubrir (Spanish: "to cover") turns raw `go test` output into a
//! [`Snapshot`], compares it against the nearest recorded baseline in a
//! commit-keyed [`history::HistoryLog`], reduces the comparison to a
//! [`Decision`], and renders a plain-text delta report.
//!
//! # Pipeline
//!
//! ```text
//! go test output ──► parser ──► Snapshot
//!                                  │
//! history log ──► find_prior ──► diff ──► Decision ──► report text
//! ```
//!
//! The library is side-effect free: process spawning, git access and
//! comment posting live in the CLI crate behind the port traits defined
//! here.

#![warn(missing_docs)]

pub mod delta;
pub mod error;
pub mod history;
pub mod parser;
pub mod policy;
pub mod report;
pub mod snapshot;

pub use delta::{diff, DeltaEntry};
pub use error::{CoverageError, CoverageResult};
pub use history::{find_prior_snapshot, record_snapshot, HistoryLog, MemoryLog, PriorSnapshot};
pub use parser::{parse_output, ParsedCoverage};
pub use policy::{Decision, FailureMode, FailurePolicy};
pub use report::{render, ReportOptions};
pub use snapshot::{Snapshot, UnitStats, FORMAT_VERSION};
