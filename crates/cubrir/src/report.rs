//! Report renderer
//!
//! Builds the publishable plain-text report from a [`Decision`], the
//! current [`Snapshot`] and the delta table. The renderer never emits an
//! empty table: when a prior exists but nothing changed, it says so.

use crate::delta::DeltaEntry;
use crate::policy::Decision;
use crate::snapshot::Snapshot;

/// Optional extras appended to the report
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Externally hosted URL for the full report, if configured
    pub report_url: Option<String>,
}

/// Render the coverage report text
#[must_use]
pub fn render(
    decision: &Decision,
    current: &Snapshot,
    deltas: &[DeltaEntry],
    options: &ReportOptions,
) -> String {
    let mut lines = vec![headline(decision)];

    let zero_count = current.zero_coverage_count();
    if zero_count > 0 {
        lines.push(format!(
            "Warning: {zero_count} of {} packages have zero coverage.",
            current.pkg_stats.len()
        ));
    }

    if !decision.meets_threshold {
        lines.push(format!(
            "Coverage does not meet the required minimum of {:.1}%.",
            decision.minimum_pct
        ));
    }

    if let Some(url) = &options.report_url {
        lines.push(format!("Full report: {url}"));
    }

    if decision.prior_pct.is_some() {
        if deltas.is_empty() {
            lines.push("No changes in per-package coverage.".to_string());
        } else {
            lines.push(String::new());
            lines.extend(delta_table(deltas));
        }
    }

    let mut report = lines.join("\n");
    report.push('\n');
    report
}

/// One of four headline variants: no history, up, down, unchanged
fn headline(decision: &Decision) -> String {
    match (decision.prior_pct, decision.delta_pct) {
        (Some(prior), Some(delta)) if delta > 0.0 => format!(
            "Coverage went up from {prior:.1}% to {:.1}%.",
            decision.current_pct
        ),
        (Some(prior), Some(delta)) if delta < 0.0 => format!(
            "Coverage went down from {prior:.1}% to {:.1}%.",
            decision.current_pct
        ),
        (Some(_), Some(_)) => {
            format!("Coverage stayed the same at {:.1}%.", decision.current_pct)
        }
        _ => format!(
            "Coverage is {:.1}%. No previously recorded coverage found.",
            decision.current_pct
        ),
    }
}

/// Column-aligned delta rows, `+` when coverage held or improved
fn delta_table(deltas: &[DeltaEntry]) -> Vec<String> {
    let width = deltas
        .iter()
        .map(|entry| entry.unit_id.len())
        .max()
        .unwrap_or(0);

    deltas
        .iter()
        .map(|entry| {
            let sign = if entry.improved_or_held() { '+' } else { '-' };
            format!(
                "{sign} {:<width$}  {:>5.1}  {:>5.1}",
                entry.unit_id, entry.prior_pct, entry.current_pct
            )
        })
        .collect()
}
