//! Git-notes backed history log
//!
//! Implements the [`HistoryLog`] port on top of git notes: one note per
//! commit under `refs/notes/<name>`, written with force so re-running a
//! commit overwrites rather than duplicates, and read back through a
//! revwalk over the commit ancestry. [`GitNotesLog::publish_notes`] pushes
//! the ref to the remote so other working copies observe the history.

use crate::error::{CliError, CliResult};
use cubrir::error::{CoverageError, CoverageResult};
use cubrir::history::{AncestorItem, HistoryLog};
use git2::{Oid, Repository, Signature, Sort};
use std::path::Path;

/// History log stored as git notes in a local repository
pub struct GitNotesLog {
    repo: Repository,
    notes_ref: String,
    remote: String,
    publish: bool,
}

impl std::fmt::Debug for GitNotesLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitNotesLog")
            .field("notes_ref", &self.notes_ref)
            .field("remote", &self.remote)
            .field("publish", &self.publish)
            .finish_non_exhaustive()
    }
}

impl GitNotesLog {
    /// Open the repository containing `path` and bind to a notes ref
    pub fn open(path: &Path, notes_ref: &str, remote: &str, publish: bool) -> CliResult<Self> {
        let repo = Repository::discover(path)?;
        let notes_ref = if notes_ref.starts_with("refs/") {
            notes_ref.to_string()
        } else {
            format!("refs/notes/{notes_ref}")
        };
        Ok(Self {
            repo,
            notes_ref,
            remote: remote.to_string(),
            publish,
        })
    }

    /// Resolve a revision (HEAD, branch, SHA) to a commit id
    pub fn resolve(&self, rev: &str) -> CliResult<String> {
        let commit = self.repo.revparse_single(rev)?.peel_to_commit()?;
        Ok(commit.id().to_string())
    }

    /// First parent of a commit, if it has one
    #[must_use]
    pub fn first_parent(&self, commit_id: &str) -> Option<String> {
        let oid = Oid::from_str(commit_id).ok()?;
        let commit = self.repo.find_commit(oid).ok()?;
        commit.parent_id(0).ok().map(|id| id.to_string())
    }

    /// Best-effort fetch of the notes ref before a lookup.
    ///
    /// Failures (no remote, offline, ref never pushed) downgrade to a
    /// warning; history lookup must never block the run.
    pub fn fetch_notes(&self) {
        let refspec = format!("+{0}:{0}", self.notes_ref);
        let result = self
            .repo
            .find_remote(&self.remote)
            .and_then(|mut remote| remote.fetch(&[refspec.as_str()], None, None));
        if let Err(err) = result {
            tracing::warn!(%err, remote = %self.remote, "could not fetch coverage notes");
        }
    }

    fn signature(&self) -> Result<Signature<'_>, git2::Error> {
        self.repo
            .signature()
            .or_else(|_| Signature::now("cubridor", "cubridor@localhost"))
    }

    /// Push the notes ref to the remote.
    ///
    /// A no-op when publishing is disabled. A failed push is a
    /// [`CliError::Publish`]: the history was promised to other working
    /// copies and did not arrive.
    pub fn publish_notes(&self) -> CliResult<()> {
        if !self.publish {
            return Ok(());
        }
        let refspec = format!("{0}:{0}", self.notes_ref);
        self.repo
            .find_remote(&self.remote)
            .and_then(|mut remote| remote.push(&[refspec.as_str()], None))
            .map_err(|err| {
                CliError::publish(format!("could not push {}: {err}", self.notes_ref))
            })
    }
}

impl HistoryLog for GitNotesLog {
    fn put(&mut self, commit_id: &str, payload: &str) -> CoverageResult<()> {
        let oid = Oid::from_str(commit_id)
            .map_err(|err| CoverageError::history(format!("bad commit id {commit_id}: {err}")))?;
        let sig = self
            .signature()
            .map_err(|err| CoverageError::history(err.to_string()))?;
        self.repo
            .note(&sig, &sig, Some(self.notes_ref.as_str()), oid, payload, true)
            .map_err(|err| {
                CoverageError::history(format!("could not attach note to {commit_id}: {err}"))
            })?;
        Ok(())
    }

    fn walk_ancestors<'a>(
        &'a self,
        start_commit: &str,
    ) -> CoverageResult<Box<dyn Iterator<Item = AncestorItem> + 'a>> {
        let oid = Oid::from_str(start_commit).map_err(|err| {
            CoverageError::history(format!("bad commit id {start_commit}: {err}"))
        })?;
        let mut walk = self
            .repo
            .revwalk()
            .map_err(|err| CoverageError::history(err.to_string()))?;
        walk.set_sorting(Sort::TOPOLOGICAL)
            .map_err(|err| CoverageError::history(err.to_string()))?;
        walk.push(oid)
            .map_err(|err| CoverageError::history(err.to_string()))?;

        Ok(Box::new(walk.map(move |step| {
            let oid = step.map_err(|err| CoverageError::history(err.to_string()))?;
            let note = self
                .repo
                .find_note(Some(self.notes_ref.as_str()), oid)
                .ok()
                .and_then(|note| note.message().map(String::from));
            Ok((oid.to_string(), note))
        })))
    }
}
