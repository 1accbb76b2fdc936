//! Snapshot model and versioned codec
//!
//! A snapshot is the coverage state recorded for one commit: the aggregate
//! percentage plus a per-package stats map. The encoded form is a small
//! JSON object tagged with a `format_version` field that readers check
//! before trusting anything else; payloads from a future schema decode to
//! "no usable snapshot" rather than being misread.
//!
//! The commit id a snapshot belongs to is assigned at persistence time by
//! the history log and is never stored inside the payload.

use crate::error::CoverageResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current encoding schema version
pub const FORMAT_VERSION: u32 = 1;

/// Per-package coverage stats, serialized as an ordered JSON array.
///
/// The first element is the coverage percentage. Future fields append to
/// the array, so readers of this version keep working against payloads
/// written by newer writers within the same `format_version`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitStats(pub Vec<f64>);

impl UnitStats {
    /// Stats holding a single coverage percentage
    #[must_use]
    pub fn from_pct(pct: f64) -> Self {
        Self(vec![pct])
    }

    /// The coverage percentage, 0 when the tuple is empty
    #[must_use]
    pub fn pct(&self) -> f64 {
        self.0.first().copied().unwrap_or(0.0)
    }
}

/// The coverage state for one commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Encoding schema version, checked first on decode
    pub format_version: u32,

    /// Aggregate coverage percentage in [0, 100].
    ///
    /// Presence of this key is what distinguishes a coverage note from any
    /// other attachment found while walking history.
    pub coverage_pct: f64,

    /// Per-package stats keyed by package path.
    ///
    /// BTreeMap keeps display and diff order deterministic without an
    /// extra sort.
    #[serde(default)]
    pub pkg_stats: BTreeMap<String, UnitStats>,
}

impl Snapshot {
    /// Create a snapshot at the current format version
    #[must_use]
    pub fn new(coverage_pct: f64, pkg_stats: BTreeMap<String, UnitStats>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            coverage_pct,
            pkg_stats,
        }
    }

    /// Per-package percentages, for diffing
    #[must_use]
    pub fn pct_by_unit(&self) -> BTreeMap<String, f64> {
        self.pkg_stats
            .iter()
            .map(|(unit, stats)| (unit.clone(), stats.pct()))
            .collect()
    }

    /// Number of packages with zero coverage
    #[must_use]
    pub fn zero_coverage_count(&self) -> usize {
        self.pkg_stats.values().filter(|s| s.pct() == 0.0).count()
    }

    /// Encode to the versioned JSON payload
    pub fn encode(&self) -> CoverageResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a payload, tolerantly.
    ///
    /// Returns `None` for anything that is not a usable snapshot: invalid
    /// JSON, a non-object, a missing or newer `format_version`, or a
    /// payload without the `coverage_pct` discriminating key. Extra fields
    /// from same-version writers are ignored.
    #[must_use]
    pub fn decode(payload: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(payload).ok()?;
        let obj = value.as_object()?;
        let version = obj.get("format_version")?.as_u64()?;
        if version > u64::from(FORMAT_VERSION) {
            tracing::debug!(version, "skipping snapshot with unknown format version");
            return None;
        }
        if !obj.get("coverage_pct")?.is_number() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}
