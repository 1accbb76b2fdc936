//! CLI command definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cubridor: coverage gate for go test with git-notes history
#[derive(Parser, Debug)]
#[command(name = "cubridor")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the tests, diff against the recorded baseline and gate on coverage
    Check(CheckArgs),

    /// Show the nearest recorded snapshot reachable from a ref
    History(HistoryArgs),
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Directory the test runner executes in
    #[arg(long, default_value = ".")]
    pub working_directory: PathBuf,

    /// Output path for the generated report; relative paths resolve under
    /// a run-scoped temporary directory
    #[arg(long, default_value = "coverage-report.txt")]
    pub report_filename: PathBuf,

    /// Coverage instrumentation mode passed to the runner
    #[arg(long, default_value = "count")]
    pub cover_mode: String,

    /// Extra runner arguments, as a JSON array of strings
    #[arg(long, default_value = "[]")]
    pub test_args: String,

    /// Minimum acceptable aggregate coverage percentage
    #[arg(long, default_value = "0")]
    pub coverage_threshold: f64,

    /// When a threshold miss fails the run: always, only_pull_requests,
    /// anything else never fails fatally
    #[arg(long, default_value = "never")]
    pub fail_coverage: String,

    /// Externally hosted URL for the full report, included in the text
    #[arg(long)]
    pub report_url: Option<String>,

    /// Credential for the comment endpoint
    #[arg(long, env = "CUBRIR_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Endpoint the rendered report is posted to in pull-request context
    #[arg(long)]
    pub comment_url: Option<String>,

    /// Commit the snapshot is recorded against
    #[arg(long = "ref", default_value = "HEAD")]
    pub git_ref: String,

    /// Base ref to resolve the prior snapshot from (pull-request runs);
    /// defaults to the first parent of --ref
    #[arg(long)]
    pub base_ref: Option<String>,

    /// Treat this run as a pull-request comparison
    #[arg(long)]
    pub pull_request: bool,

    /// Notes ref the history is stored under
    #[arg(long, default_value = "coverage")]
    pub notes_ref: String,

    /// Remote the notes ref is fetched from and pushed to
    #[arg(long, default_value = "origin")]
    pub remote: String,

    /// Skip pushing the notes ref (local or detached use)
    #[arg(long)]
    pub no_publish: bool,

    /// Write the run outputs as name=value lines to this file
    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

/// Arguments for the history command
#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Ref to start the ancestry walk from
    #[arg(long = "ref", default_value = "HEAD")]
    pub git_ref: String,

    /// Repository to inspect
    #[arg(long, default_value = ".")]
    pub working_directory: PathBuf,

    /// Notes ref the history is stored under
    #[arg(long, default_value = "coverage")]
    pub notes_ref: String,
}
