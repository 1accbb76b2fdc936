//! Threshold and decision policy
//!
//! Reduces the current and prior aggregate percentages plus the configured
//! minimum into a [`Decision`]. Two deliberate edge cases live here:
//! `current == minimum` does NOT meet the threshold (strict greater-than),
//! and a missing prior leaves `delta_pct` as `None` rather than zero.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// When a threshold miss becomes a fatal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailurePolicy {
    /// Any threshold miss fails the run
    Always,
    /// A threshold miss fails the run only in a pull-request context
    OnlyPullRequests,
    /// Threshold misses warn but never fail
    #[default]
    Never,
}

impl FromStr for FailurePolicy {
    type Err = std::convert::Infallible;

    /// Unrecognized values map to `Never`; a misspelled policy must not
    /// silently become a hard gate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "always" => Self::Always,
            "only_pull_requests" => Self::OnlyPullRequests,
            _ => Self::Never,
        })
    }
}

/// Outcome severity of a threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailureMode {
    /// Threshold met, nothing to report
    #[default]
    None,
    /// Threshold missed, non-fatal
    Warn,
    /// Threshold missed, run must exit non-zero
    Fail,
}

/// The outcome of comparing current coverage to policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Current aggregate percentage
    pub current_pct: f64,
    /// Prior aggregate percentage, if any history exists
    pub prior_pct: Option<f64>,
    /// `current - prior`, `None` when there is no prior
    pub delta_pct: Option<f64>,
    /// Configured minimum percentage
    pub minimum_pct: f64,
    /// Strictly greater than the minimum
    pub meets_threshold: bool,
    /// How the run should treat a miss
    pub failure_mode: FailureMode,
}

impl Decision {
    /// Evaluate the policy for one run
    #[must_use]
    pub fn evaluate(
        current_pct: f64,
        prior_pct: Option<f64>,
        minimum_pct: f64,
        policy: FailurePolicy,
        is_pull_request: bool,
    ) -> Self {
        let meets_threshold = current_pct > minimum_pct;
        let failure_mode = if meets_threshold {
            FailureMode::None
        } else {
            match policy {
                FailurePolicy::Always => FailureMode::Fail,
                FailurePolicy::OnlyPullRequests if is_pull_request => FailureMode::Fail,
                _ => FailureMode::Warn,
            }
        };
        Self {
            current_pct,
            prior_pct,
            delta_pct: prior_pct.map(|prior| current_pct - prior),
            minimum_pct,
            meets_threshold,
            failure_mode,
        }
    }

    /// Whether the run must exit non-zero
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.failure_mode == FailureMode::Fail
    }
}
