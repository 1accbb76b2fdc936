//! Git-notes history log integration tests against real repositories

use cubridor::{CliError, GitNotesLog};
use cubrir::{find_prior_snapshot, record_snapshot, HistoryLog, Snapshot, UnitStats};
use git2::{Oid, Repository, Signature};
use std::collections::BTreeMap;
use std::path::Path;

fn init_repo(dir: &Path) -> Repository {
    Repository::init(dir).unwrap()
}

fn commit(repo: &Repository, message: &str) -> Oid {
    let sig = Signature::now("tester", "tester@example.com").unwrap();
    let tree_id = repo.index().unwrap().write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parent = repo
        .head()
        .ok()
        .and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

fn snapshot(pct: f64) -> Snapshot {
    let mut stats = BTreeMap::new();
    stats.insert("pkg/a".to_string(), UnitStats::from_pct(pct));
    Snapshot::new(pct, stats)
}

fn open_log(dir: &Path) -> GitNotesLog {
    // publish=false: these repositories have no remote
    GitNotesLog::open(dir, "coverage", "origin", false).unwrap()
}

#[test]
fn record_then_find_across_commits() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let first = commit(&repo, "first").to_string();
    let second = commit(&repo, "second").to_string();

    let mut log = open_log(dir.path());
    record_snapshot(&mut log, &first, &snapshot(70.0)).unwrap();

    let prior = find_prior_snapshot(&log, Some(&second)).unwrap();
    assert_eq!(prior.commit_id, first);
    assert_eq!(prior.snapshot.coverage_pct, 70.0);
}

#[test]
fn reattaching_overwrites_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let head = commit(&repo, "only").to_string();

    let mut log = open_log(dir.path());
    record_snapshot(&mut log, &head, &snapshot(10.0)).unwrap();
    record_snapshot(&mut log, &head, &snapshot(90.0)).unwrap();

    let prior = find_prior_snapshot(&log, Some(&head)).unwrap();
    assert_eq!(prior.snapshot.coverage_pct, 90.0);
}

#[test]
fn nearest_annotated_ancestor_wins() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let oldest = commit(&repo, "oldest").to_string();
    let middle = commit(&repo, "middle").to_string();
    let newest = commit(&repo, "newest").to_string();

    let mut log = open_log(dir.path());
    record_snapshot(&mut log, &oldest, &snapshot(11.0)).unwrap();
    record_snapshot(&mut log, &middle, &snapshot(22.0)).unwrap();

    let prior = find_prior_snapshot(&log, Some(&newest)).unwrap();
    assert_eq!(prior.commit_id, middle);
    assert_eq!(prior.snapshot.coverage_pct, 22.0);
}

#[test]
fn unannotated_history_is_empty_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let head = commit(&repo, "only").to_string();

    let log = open_log(dir.path());
    assert!(find_prior_snapshot(&log, Some(&head)).is_none());
}

#[test]
fn foreign_notes_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let first = commit(&repo, "first").to_string();
    let second = commit(&repo, "second").to_string();

    let mut log = open_log(dir.path());
    record_snapshot(&mut log, &first, &snapshot(33.0)).unwrap();
    log.put(&second, "not a coverage payload").unwrap();

    let prior = find_prior_snapshot(&log, Some(&second)).unwrap();
    assert_eq!(prior.commit_id, first);
}

#[test]
fn resolve_head_and_first_parent() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let first = commit(&repo, "first").to_string();
    let second = commit(&repo, "second").to_string();

    let log = open_log(dir.path());
    assert_eq!(log.resolve("HEAD").unwrap(), second);
    assert_eq!(log.first_parent(&second), Some(first.clone()));
    assert_eq!(log.first_parent(&first), None);
}

#[test]
fn publishing_fails_without_a_remote() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let head = commit(&repo, "only").to_string();

    let mut log = GitNotesLog::open(dir.path(), "coverage", "origin", true).unwrap();
    log.put(&head, &snapshot(50.0).encode().unwrap()).unwrap();

    let err = log.publish_notes().unwrap_err();
    assert!(matches!(err, CliError::Publish { .. }));
    assert!(err.to_string().contains("refs/notes/coverage"));
}

#[test]
fn publishing_is_a_noop_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let repo = init_repo(dir.path());
    let head = commit(&repo, "only").to_string();

    let mut log = open_log(dir.path());
    log.put(&head, &snapshot(50.0).encode().unwrap()).unwrap();
    log.publish_notes().unwrap();
}
