//! Cubridor CLI Library
//!
//! Command-line interface for the Cubrir coverage gate: runs the
//! instrumented tests, diffs the result against the baseline recorded in
//! git notes, renders the delta report and gates the run on the configured
//! threshold.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
mod git_log;
pub mod handlers;
mod output;
mod runner;
mod sink;

pub use commands::{CheckArgs, Cli, Commands, HistoryArgs};
pub use config::{parse_test_args, resolve_under, RunConfig, RunContext};
pub use error::{CliError, CliResult};
pub use git_log::GitNotesLog;
pub use output::RunOutputs;
pub use runner::CoverageRunner;
pub use sink::{CommentSink, HttpCommentSink, NullSink};
