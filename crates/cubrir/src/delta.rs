//! Delta engine: per-unit structural diff between two snapshots
//!
//! The diff is defined over the union of both key sets; a unit absent on
//! one side defaults to 0%. Only units whose percentages differ under
//! exact `f64` equality are emitted, in lexicographic unit-id order, so
//! identical inputs always produce byte-identical output.

use std::collections::BTreeMap;

/// Coverage change for one unit between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaEntry {
    /// Unit identifier (package path)
    pub unit_id: String,
    /// Percentage in the prior snapshot, 0 if absent
    pub prior_pct: f64,
    /// Percentage in the current snapshot, 0 if absent
    pub current_pct: f64,
}

impl DeltaEntry {
    /// Whether coverage for this unit went up or held
    #[must_use]
    pub fn improved_or_held(&self) -> bool {
        self.current_pct >= self.prior_pct
    }
}

/// Diff two per-unit percentage maps.
///
/// BTreeMap keys are already sorted, so merging the two key ranges yields
/// the union in lexicographic order without an extra sort.
#[must_use]
pub fn diff(prior: &BTreeMap<String, f64>, current: &BTreeMap<String, f64>) -> Vec<DeltaEntry> {
    let mut entries = Vec::new();
    let mut units: Vec<&String> = prior.keys().chain(current.keys()).collect();
    units.sort();
    units.dedup();

    for unit in units {
        let prior_pct = prior.get(unit).copied().unwrap_or(0.0);
        let current_pct = current.get(unit).copied().unwrap_or(0.0);
        if prior_pct != current_pct {
            entries.push(DeltaEntry {
                unit_id: unit.clone(),
                prior_pct,
                current_pct,
            });
        }
    }
    entries
}
