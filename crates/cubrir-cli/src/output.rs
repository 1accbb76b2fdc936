//! Run outputs
//!
//! Every run produces a fixed set of `name=value` outputs, written to the
//! configured outputs file when one is given and to stdout otherwise, so
//! a surrounding pipeline can consume them.

use crate::error::CliResult;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The machine-readable results of a check run
#[derive(Debug, Clone)]
pub struct RunOutputs {
    /// Current aggregate coverage percentage
    pub coverage_pct: f64,
    /// Total number of packages seen
    pub package_count: usize,
    /// Number of packages with zero coverage
    pub uncovered_packages: usize,
    /// Delta against the prior snapshot, 0 when there is none
    pub coverage_delta: f64,
    /// Prior aggregate percentage, if history exists
    pub prior_pct: Option<f64>,
    /// Commit the prior snapshot was found on
    pub prior_commit: Option<String>,
    /// Whether the threshold was met
    pub meets_threshold: bool,
    /// Where the rendered report was written
    pub report_path: PathBuf,
    /// Where the raw coverage profile lives
    pub profile_path: PathBuf,
}

impl RunOutputs {
    /// The outputs as `name=value` lines
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("coverage-pct={:.1}", self.coverage_pct),
            format!("package-count={}", self.package_count),
            format!("uncovered-packages={}", self.uncovered_packages),
            format!("coverage-delta={:.1}", self.coverage_delta),
            format!(
                "coverage-last-pct={}",
                self.prior_pct.map(|p| format!("{p:.1}")).unwrap_or_default()
            ),
            format!(
                "coverage-last-sha={}",
                self.prior_commit.clone().unwrap_or_default()
            ),
            format!("meets-threshold={}", self.meets_threshold),
            format!("report-pathname={}", self.report_path.display()),
            format!("gocov-pathname={}", self.profile_path.display()),
        ]
    }

    /// Write the outputs to `output_file`, or stdout when none is set
    pub fn emit(&self, output_file: Option<&Path>) -> CliResult<()> {
        let text = self.lines().join("\n");
        match output_file {
            Some(path) => {
                let mut file = std::fs::File::create(path)?;
                writeln!(file, "{text}")?;
            }
            None => println!("{text}"),
        }
        Ok(())
    }
}
