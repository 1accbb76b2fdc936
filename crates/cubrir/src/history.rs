//! History store port and baseline lookup
//!
//! The version-control system is abstracted as a commit-keyed, append-only
//! log: `put` attaches (overwriting) a payload to a commit, and
//! `walk_ancestors` yields commits from a starting point backwards through
//! history together with whatever payload each carries. Any backend with
//! those two operations can hold coverage history; the CLI ships a
//! git-notes implementation and tests use [`MemoryLog`].
//!
//! Baseline lookup is deliberately forgiving: a missing reference, an
//! exhausted walk, a transport error or a corrupt payload all reduce to
//! "no prior snapshot". Absence of history is a normal state and must
//! never block the current run.

use crate::error::CoverageResult;
use crate::snapshot::Snapshot;
use std::collections::HashMap;

/// One step of an ancestry walk: the commit id and its attachment, if any
pub type AncestorItem = CoverageResult<(String, Option<String>)>;

/// Commit-keyed append-only log, the history store port
pub trait HistoryLog {
    /// Attach `payload` to `commit_id`, replacing any existing attachment
    /// for that commit.
    fn put(&mut self, commit_id: &str, payload: &str) -> CoverageResult<()>;

    /// Walk ancestry starting from (and including) `start_commit`,
    /// newest first.
    fn walk_ancestors<'a>(
        &'a self,
        start_commit: &str,
    ) -> CoverageResult<Box<dyn Iterator<Item = AncestorItem> + 'a>>;
}

/// A decoded snapshot plus the commit it was found on
#[derive(Debug, Clone, PartialEq)]
pub struct PriorSnapshot {
    /// The baseline snapshot
    pub snapshot: Snapshot,
    /// Commit id the snapshot was attached to
    pub commit_id: String,
}

/// Encode and persist a snapshot for `commit_id`.
///
/// Errors propagate: persistence is a promised side effect of the run.
pub fn record_snapshot(
    log: &mut dyn HistoryLog,
    commit_id: &str,
    snapshot: &Snapshot,
) -> CoverageResult<()> {
    let payload = snapshot.encode()?;
    log.put(commit_id, &payload)
}

/// Find the nearest recorded snapshot reachable from `reference`.
///
/// Attachments that fail to decode or lack the aggregate coverage key are
/// skipped. Every failure path degrades to `None` with a log line; history
/// lookup never aborts the run.
#[must_use]
pub fn find_prior_snapshot(
    log: &dyn HistoryLog,
    reference: Option<&str>,
) -> Option<PriorSnapshot> {
    let Some(start) = reference else {
        tracing::debug!("no reference commit available, treating as no coverage history");
        return None;
    };

    let walk = match log.walk_ancestors(start) {
        Ok(walk) => walk,
        Err(err) => {
            tracing::warn!(%err, start, "history walk failed, treating as no coverage history");
            return None;
        }
    };

    for item in walk {
        let (commit_id, payload) = match item {
            Ok(step) => step,
            Err(err) => {
                tracing::warn!(%err, "history walk aborted, treating as no coverage history");
                return None;
            }
        };
        let Some(payload) = payload else { continue };
        if let Some(snapshot) = Snapshot::decode(&payload) {
            tracing::debug!(%commit_id, pct = snapshot.coverage_pct, "found prior snapshot");
            return Some(PriorSnapshot {
                snapshot,
                commit_id,
            });
        }
        tracing::debug!(%commit_id, "skipping unusable attachment");
    }
    None
}

/// In-memory history log over a linear commit chain.
///
/// Reference semantics for the port, used throughout the tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    /// Commit ids, oldest first
    chain: Vec<String>,
    notes: HashMap<String, String>,
}

impl MemoryLog {
    /// Create a log over a linear chain of commit ids, oldest first
    #[must_use]
    pub fn new(chain: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            chain: chain.into_iter().map(Into::into).collect(),
            notes: HashMap::new(),
        }
    }

    /// The attachment for a commit, if any
    #[must_use]
    pub fn note(&self, commit_id: &str) -> Option<&str> {
        self.notes.get(commit_id).map(String::as_str)
    }
}

impl HistoryLog for MemoryLog {
    fn put(&mut self, commit_id: &str, payload: &str) -> CoverageResult<()> {
        let _ = self
            .notes
            .insert(commit_id.to_string(), payload.to_string());
        Ok(())
    }

    fn walk_ancestors<'a>(
        &'a self,
        start_commit: &str,
    ) -> CoverageResult<Box<dyn Iterator<Item = AncestorItem> + 'a>> {
        let position = self
            .chain
            .iter()
            .position(|commit| commit == start_commit)
            .ok_or_else(|| {
                crate::error::CoverageError::history(format!("unknown commit {start_commit}"))
            })?;
        Ok(Box::new(self.chain[..=position].iter().rev().map(
            |commit| Ok((commit.clone(), self.notes.get(commit).cloned())),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::UnitStats;
    use std::collections::BTreeMap;

    fn snapshot(pct: f64) -> Snapshot {
        let mut stats = BTreeMap::new();
        stats.insert("pkg/a".to_string(), UnitStats::from_pct(pct));
        Snapshot::new(pct, stats)
    }

    #[test]
    fn test_record_then_find_on_same_commit() {
        let mut log = MemoryLog::new(["c1", "c2", "c3"]);
        record_snapshot(&mut log, "c2", &snapshot(70.0)).unwrap();

        let prior = find_prior_snapshot(&log, Some("c3")).unwrap();
        assert_eq!(prior.commit_id, "c2");
        assert_eq!(prior.snapshot.coverage_pct, 70.0);
    }

    #[test]
    fn test_walk_is_inclusive_of_reference() {
        let mut log = MemoryLog::new(["c1", "c2"]);
        record_snapshot(&mut log, "c2", &snapshot(50.0)).unwrap();

        let prior = find_prior_snapshot(&log, Some("c2")).unwrap();
        assert_eq!(prior.commit_id, "c2");
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let mut log = MemoryLog::new(["c1", "c2", "c3"]);
        record_snapshot(&mut log, "c1", &snapshot(10.0)).unwrap();
        record_snapshot(&mut log, "c2", &snapshot(20.0)).unwrap();

        let prior = find_prior_snapshot(&log, Some("c3")).unwrap();
        assert_eq!(prior.commit_id, "c2");
        assert_eq!(prior.snapshot.coverage_pct, 20.0);
    }

    #[test]
    fn test_put_overwrites_for_same_commit() {
        let mut log = MemoryLog::new(["c1"]);
        record_snapshot(&mut log, "c1", &snapshot(10.0)).unwrap();
        record_snapshot(&mut log, "c1", &snapshot(90.0)).unwrap();

        let prior = find_prior_snapshot(&log, Some("c1")).unwrap();
        assert_eq!(prior.snapshot.coverage_pct, 90.0);
    }

    #[test]
    fn test_no_reference_is_empty_not_error() {
        let log = MemoryLog::new(["c1"]);
        assert!(find_prior_snapshot(&log, None).is_none());
    }

    #[test]
    fn test_no_attachments_is_empty() {
        let log = MemoryLog::new(["c1", "c2"]);
        assert!(find_prior_snapshot(&log, Some("c2")).is_none());
    }

    #[test]
    fn test_walk_error_degrades_to_none() {
        let log = MemoryLog::new(["c1"]);
        assert!(find_prior_snapshot(&log, Some("unknown")).is_none());
    }

    #[test]
    fn test_corrupt_and_foreign_attachments_are_skipped() {
        let mut log = MemoryLog::new(["c1", "c2", "c3"]);
        record_snapshot(&mut log, "c1", &snapshot(33.0)).unwrap();
        log.put("c2", "not a snapshot").unwrap();
        log.put("c3", r#"{"format_version":1,"other":"note"}"#).unwrap();

        let prior = find_prior_snapshot(&log, Some("c3")).unwrap();
        assert_eq!(prior.commit_id, "c1");
        assert_eq!(prior.snapshot.coverage_pct, 33.0);
    }
}
