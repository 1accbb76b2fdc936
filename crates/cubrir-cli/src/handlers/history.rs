//! History command handler
//!
//! Operator aid for inspecting the notes store: resolves a ref and prints
//! the nearest recorded snapshot reachable from it.

use crate::commands::HistoryArgs;
use crate::error::CliResult;
use crate::git_log::GitNotesLog;
use cubrir::find_prior_snapshot;

/// Execute the history command
pub fn execute_history(args: &HistoryArgs) -> CliResult<()> {
    let log = GitNotesLog::open(&args.working_directory, &args.notes_ref, "origin", false)?;
    let commit_id = log.resolve(&args.git_ref)?;
    log.fetch_notes();

    let Some(prior) = find_prior_snapshot(&log, Some(&commit_id)) else {
        println!("No recorded coverage reachable from {}.", args.git_ref);
        return Ok(());
    };

    println!("commit: {}", prior.commit_id);
    println!("coverage: {:.1}%", prior.snapshot.coverage_pct);
    for (unit, stats) in &prior.snapshot.pkg_stats {
        println!("  {unit}  {:.1}%", stats.pct());
    }
    Ok(())
}
