//! Run configuration
//!
//! Everything the check command needs is validated here, before any
//! external process is invoked. Ambient run context (the commit being
//! recorded, the comparison base, pull-request-ness) is resolved once and
//! carried in [`RunContext`] rather than read from globals downstream.

use crate::commands::CheckArgs;
use crate::error::{CliError, CliResult};
use cubrir::FailurePolicy;
use std::path::{Path, PathBuf};

/// Validated configuration for one check run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the test runner executes in
    pub working_directory: PathBuf,
    /// Resolved path the rendered report is written to
    pub report_path: PathBuf,
    /// Resolved path of the raw coverage profile handed to the runner
    pub profile_path: PathBuf,
    /// Coverage instrumentation mode
    pub cover_mode: String,
    /// Extra runner arguments decoded from the test-args JSON array
    pub test_args: Vec<String>,
    /// Minimum acceptable aggregate percentage
    pub coverage_threshold: f64,
    /// Failure policy for threshold misses
    pub fail_policy: FailurePolicy,
    /// Optional externally hosted report URL
    pub report_url: Option<String>,
    /// Credential for the comment endpoint
    pub token: Option<String>,
    /// Comment endpoint URL
    pub comment_url: Option<String>,
    /// Notes ref holding the history
    pub notes_ref: String,
    /// Remote for notes fetch/push
    pub remote: String,
    /// Whether put publishes the notes ref
    pub publish: bool,
    /// Optional outputs file
    pub output_file: Option<PathBuf>,
}

/// Resolved ambient context for one run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Commit id the snapshot is recorded against
    pub commit_id: String,
    /// Commit id the prior snapshot is resolved from, when available
    pub base_commit: Option<String>,
    /// Whether this run is a pull-request comparison
    pub is_pull_request: bool,
}

impl RunConfig {
    /// Build and validate the configuration for a run.
    ///
    /// Relative report paths resolve under `temp_dir`, the run-scoped
    /// scratch directory that also receives the coverage profile.
    pub fn from_args(args: &CheckArgs, temp_dir: &Path) -> CliResult<Self> {
        let test_args = parse_test_args(&args.test_args)?;
        // FromStr is infallible: unknown policies mean "never fail"
        let fail_policy = args
            .fail_coverage
            .parse::<FailurePolicy>()
            .unwrap_or_default();

        Ok(Self {
            working_directory: args.working_directory.clone(),
            report_path: resolve_under(temp_dir, &args.report_filename),
            profile_path: temp_dir.join("coverage.out"),
            cover_mode: args.cover_mode.clone(),
            test_args,
            coverage_threshold: args.coverage_threshold,
            fail_policy,
            report_url: args.report_url.clone(),
            token: args.token.clone(),
            comment_url: args.comment_url.clone(),
            notes_ref: args.notes_ref.clone(),
            remote: args.remote.clone(),
            publish: !args.no_publish,
            output_file: args.output_file.clone(),
        })
    }
}

/// Decode the test-args JSON array; anything but an array of strings is a
/// fatal configuration error naming the offending value.
pub fn parse_test_args(raw: &str) -> CliResult<Vec<String>> {
    serde_json::from_str::<Vec<String>>(raw)
        .map_err(|err| CliError::config(format!("test-args must be a JSON array of strings, got {raw:?}: {err}")))
}

/// Resolve a report path: absolute paths pass through, relative paths land
/// under the run-scoped temporary directory.
#[must_use]
pub fn resolve_under(temp_dir: &Path, filename: &Path) -> PathBuf {
    if filename.is_absolute() {
        filename.to_path_buf()
    } else {
        temp_dir.join(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn check_args(extra: &[&str]) -> CheckArgs {
        let mut argv = vec!["cubridor"];
        argv.extend_from_slice(extra);
        CheckArgs::parse_from(argv)
    }

    mod test_args_tests {
        use super::*;

        #[test]
        fn test_empty_array() {
            assert_eq!(parse_test_args("[]").unwrap(), Vec::<String>::new());
        }

        #[test]
        fn test_array_of_strings() {
            let parsed = parse_test_args(r#"["-race", "-count=1"]"#).unwrap();
            assert_eq!(parsed, vec!["-race".to_string(), "-count=1".to_string()]);
        }

        #[test]
        fn test_malformed_json_is_config_error() {
            let err = parse_test_args("not json").unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
            assert!(err.to_string().contains("not json"));
        }

        #[test]
        fn test_non_array_is_config_error() {
            let err = parse_test_args(r#"{"args": []}"#).unwrap_err();
            assert!(matches!(err, CliError::Config { .. }));
        }

        #[test]
        fn test_non_string_elements_are_config_error() {
            assert!(parse_test_args("[1, 2]").is_err());
        }
    }

    mod path_tests {
        use super::*;

        #[test]
        fn test_relative_report_path_lands_in_temp_dir() {
            let resolved = resolve_under(Path::new("/tmp/run"), Path::new("report.txt"));
            assert_eq!(resolved, PathBuf::from("/tmp/run/report.txt"));
        }

        #[test]
        fn test_absolute_report_path_passes_through() {
            let resolved = resolve_under(Path::new("/tmp/run"), Path::new("/out/report.txt"));
            assert_eq!(resolved, PathBuf::from("/out/report.txt"));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_defaults_build() {
            let config = RunConfig::from_args(&check_args(&[]), Path::new("/tmp/run")).unwrap();
            assert_eq!(config.cover_mode, "count");
            assert_eq!(config.fail_policy, FailurePolicy::Never);
            assert_eq!(config.profile_path, PathBuf::from("/tmp/run/coverage.out"));
            assert!(config.publish);
        }

        #[test]
        fn test_policy_mapping() {
            let args = check_args(&["--fail-coverage", "always"]);
            let config = RunConfig::from_args(&args, Path::new("/tmp/run")).unwrap();
            assert_eq!(config.fail_policy, FailurePolicy::Always);

            let args = check_args(&["--fail-coverage", "whenever"]);
            let config = RunConfig::from_args(&args, Path::new("/tmp/run")).unwrap();
            assert_eq!(config.fail_policy, FailurePolicy::Never);
        }

        #[test]
        fn test_bad_test_args_fail_before_anything_runs() {
            let args = check_args(&["--test-args", "{broken"]);
            assert!(RunConfig::from_args(&args, Path::new("/tmp/run")).is_err());
        }

        #[test]
        fn test_no_publish_flag() {
            let args = check_args(&["--no-publish"]);
            let config = RunConfig::from_args(&args, Path::new("/tmp/run")).unwrap();
            assert!(!config.publish);
        }
    }
}
