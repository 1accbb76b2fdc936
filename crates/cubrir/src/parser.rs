//! Coverage parser for `go test` output
//!
//! Scans the runner's raw text line by line and builds a [`Snapshot`].
//! Four line shapes matter:
//!
//! ```text
//! ok      pkg/a   0.015s  coverage: 80.0% of statements
//! pkg/a   coverage: 80.0% of statements
//! ?       pkg/b   [no test files]
//! total:  (statements)    60.0%
//! ```
//!
//! Everything else (build chatter, test logs, FAIL detail) is skipped.
//! Packages without tests are recorded at 0% rather than omitted, so a
//! later diff can tell "newly added, untested" apart from "unchanged".

use crate::error::{CoverageError, CoverageResult};
use crate::snapshot::{Snapshot, UnitStats};
use regex::Regex;
use std::collections::BTreeMap;

/// A parsed coverage run: the snapshot plus unit counts
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCoverage {
    /// The snapshot built from the run
    pub snapshot: Snapshot,
    /// Packages that ran tests
    pub units_with_tests: usize,
    /// Packages reported as having no test files
    pub units_without_tests: usize,
}

impl ParsedCoverage {
    /// Total number of packages seen
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.units_with_tests + self.units_without_tests
    }
}

/// Parse raw `go test` output into a snapshot.
///
/// Non-matching lines are skipped. A missing or unparseable aggregate
/// `total:` line is a fatal error: the threshold decision needs it.
pub fn parse_output(output: &str) -> CoverageResult<ParsedCoverage> {
    let covered = Regex::new(r"^ok\s+(\S+)\s+.*coverage:\s+(\d+(?:\.\d+)?)% of statements")
        .unwrap();
    let no_statements = Regex::new(r"^ok\s+(\S+)\s+.*coverage:\s+\[no statements\]").unwrap();
    let no_tests = Regex::new(r"^\?\s+(\S+)\s+\[no test files\]").unwrap();
    // Summary form without the `ok`/timing prefix, as emitted by package
    // summaries; checked after the `ok` forms so their lines never reach it.
    let summary = Regex::new(r"^(\S+)\s+coverage:\s+(\d+(?:\.\d+)?)% of statements").unwrap();
    let total = Regex::new(r"^total:\s+\(statements\)\s+(\d+(?:\.\d+)?)%").unwrap();

    let mut pkg_stats: BTreeMap<String, UnitStats> = BTreeMap::new();
    let mut units_with_tests = 0;
    let mut units_without_tests = 0;
    let mut aggregate: Option<f64> = None;

    for line in output.lines() {
        if let Some(caps) = covered.captures(line) {
            let pct: f64 = caps[2].parse().map_err(|_| {
                CoverageError::parse(format!("bad coverage percentage in line: {line}"))
            })?;
            pkg_stats.insert(caps[1].to_string(), UnitStats::from_pct(pct));
            units_with_tests += 1;
        } else if let Some(caps) = no_statements.captures(line) {
            pkg_stats.insert(caps[1].to_string(), UnitStats::from_pct(0.0));
            units_with_tests += 1;
        } else if let Some(caps) = no_tests.captures(line) {
            pkg_stats.insert(caps[1].to_string(), UnitStats::from_pct(0.0));
            units_without_tests += 1;
        } else if let Some(caps) = summary.captures(line) {
            let pct: f64 = caps[2].parse().map_err(|_| {
                CoverageError::parse(format!("bad coverage percentage in line: {line}"))
            })?;
            if pkg_stats
                .insert(caps[1].to_string(), UnitStats::from_pct(pct))
                .is_none()
            {
                units_with_tests += 1;
            }
        } else if let Some(caps) = total.captures(line) {
            aggregate = caps[1].parse().ok();
        }
    }

    let Some(coverage_pct) = aggregate else {
        return Err(CoverageError::parse(
            "total coverage line not found in test output (expected `total: (statements) N%`)",
        ));
    };

    Ok(ParsedCoverage {
        snapshot: Snapshot::new(coverage_pct, pkg_stats),
        units_with_tests,
        units_without_tests,
    })
}
