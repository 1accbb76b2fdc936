//! Check command handler
//!
//! The full run, strictly sequential: parse config → run tests → parse
//! output → resolve the prior snapshot → diff → decide → render → persist
//! → post → emit outputs. Persistence and posting happen after the
//! decision step, and both happen even when the decision is fatal; a
//! threshold failure must never lose history.

use crate::commands::CheckArgs;
use crate::config::{RunConfig, RunContext};
use crate::error::{CliError, CliResult};
use crate::git_log::GitNotesLog;
use crate::output::RunOutputs;
use crate::runner::CoverageRunner;
use crate::sink::{CommentSink, HttpCommentSink, NullSink};
use console::style;
use cubrir::{
    diff, find_prior_snapshot, record_snapshot, render, Decision, FailureMode, ParsedCoverage,
    PriorSnapshot, ReportOptions,
};
use std::path::PathBuf;

/// Execute the check command
pub fn execute_check(args: &CheckArgs, quiet: bool) -> CliResult<()> {
    let temp_dir = scratch_dir()?;
    let config = RunConfig::from_args(args, &temp_dir)?;

    let runner_output = CoverageRunner::new(&config).run()?;
    let parsed = cubrir::parse_output(&runner_output)?;

    let mut log = GitNotesLog::open(
        &config.working_directory,
        &config.notes_ref,
        &config.remote,
        config.publish,
    )?;
    let context = resolve_context(&log, args)?;

    log.fetch_notes();
    let prior = find_prior_snapshot(&log, context.base_commit.as_deref());

    let decision = Decision::evaluate(
        parsed.snapshot.coverage_pct,
        prior.as_ref().map(|p| p.snapshot.coverage_pct),
        config.coverage_threshold,
        config.fail_policy,
        context.is_pull_request,
    );

    let prior_units = prior
        .as_ref()
        .map(|p| p.snapshot.pct_by_unit())
        .unwrap_or_default();
    let deltas = diff(&prior_units, &parsed.snapshot.pct_by_unit());

    let options = ReportOptions {
        report_url: config.report_url.clone(),
    };
    let report = render(&decision, &parsed.snapshot, &deltas, &options);
    if let Some(parent) = config.report_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.report_path, &report)?;

    record_snapshot(&mut log, &context.commit_id, &parsed.snapshot)?;
    log.publish_notes()?;

    if context.is_pull_request {
        comment_sink(&config).post(&report)?;
    }

    build_outputs(&config, &parsed, &prior, &decision).emit(config.output_file.as_deref())?;

    if !quiet {
        print!("{report}");
        print_status(&decision);
    }

    if decision.is_fatal() {
        return Err(CliError::ThresholdNotMet {
            current_pct: decision.current_pct,
            minimum_pct: decision.minimum_pct,
        });
    }
    if decision.failure_mode == FailureMode::Warn {
        tracing::warn!(
            current = decision.current_pct,
            minimum = decision.minimum_pct,
            "coverage below threshold"
        );
    }
    Ok(())
}

/// Resolve the run context from the repository.
///
/// The baseline reference is the explicit `--base-ref` when it resolves,
/// otherwise the first parent of the recorded commit. A base ref that does
/// not resolve and a parentless first commit both mean "no history", not
/// an error.
fn resolve_context(log: &GitNotesLog, args: &CheckArgs) -> CliResult<RunContext> {
    let commit_id = log.resolve(&args.git_ref)?;
    let base_commit = match &args.base_ref {
        Some(base_ref) => match log.resolve(base_ref) {
            Ok(commit) => Some(commit),
            Err(err) => {
                tracing::warn!(%err, %base_ref, "base ref did not resolve, treating as no history");
                None
            }
        },
        None => log.first_parent(&commit_id),
    };
    Ok(RunContext {
        commit_id,
        base_commit,
        is_pull_request: args.pull_request,
    })
}

/// Run-scoped scratch directory for the profile and report
fn scratch_dir() -> CliResult<PathBuf> {
    let dir = std::env::temp_dir().join(format!("cubridor-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn comment_sink(config: &RunConfig) -> Box<dyn CommentSink> {
    match (&config.comment_url, &config.token) {
        (Some(url), Some(token)) => Box::new(HttpCommentSink::new(url, token)),
        _ => Box::new(NullSink),
    }
}

fn build_outputs(
    config: &RunConfig,
    parsed: &ParsedCoverage,
    prior: &Option<PriorSnapshot>,
    decision: &Decision,
) -> RunOutputs {
    RunOutputs {
        coverage_pct: decision.current_pct,
        package_count: parsed.unit_count(),
        uncovered_packages: parsed.snapshot.zero_coverage_count(),
        coverage_delta: decision.delta_pct.unwrap_or(0.0),
        prior_pct: decision.prior_pct,
        prior_commit: prior.as_ref().map(|p| p.commit_id.clone()),
        meets_threshold: decision.meets_threshold,
        report_path: config.report_path.clone(),
        profile_path: config.profile_path.clone(),
    }
}

fn print_status(decision: &Decision) {
    match decision.failure_mode {
        FailureMode::None => println!(
            "{} coverage {:.1}%",
            style("ok").green().bold(),
            decision.current_pct
        ),
        FailureMode::Warn => println!(
            "{} coverage {:.1}% below minimum {:.1}%",
            style("warn").yellow().bold(),
            decision.current_pct,
            decision.minimum_pct
        ),
        FailureMode::Fail => println!(
            "{} coverage {:.1}% below minimum {:.1}%",
            style("fail").red().bold(),
            decision.current_pct,
            decision.minimum_pct
        ),
    }
}
