//! Test runner adapter
//!
//! Invokes the external toolchain as an opaque process and hands the
//! captured text to the parser. Two single-attempt invocations per run:
//! `go test` with coverage instrumentation, then `go tool cover -func`
//! over the profile for the aggregate summary line. Any process failure
//! is fatal; a tail of the captured output is logged for diagnosis.

use crate::config::RunConfig;
use crate::error::{CliError, CliResult};
use std::path::PathBuf;
use std::process::Command;

/// How many trailing output lines to log when the runner fails
const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Runs the coverage-instrumented test process
#[derive(Debug)]
pub struct CoverageRunner {
    program: String,
    working_directory: PathBuf,
    cover_mode: String,
    profile_path: PathBuf,
    extra_args: Vec<String>,
}

impl CoverageRunner {
    /// Create a runner from the run configuration
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        Self {
            program: "go".to_string(),
            working_directory: config.working_directory.clone(),
            cover_mode: config.cover_mode.clone(),
            profile_path: config.profile_path.clone(),
            extra_args: config.test_args.clone(),
        }
    }

    /// Override the spawned program (tests)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run the tests and the profile summary, returning the combined text.
    pub fn run(&self) -> CliResult<String> {
        let mut test_args: Vec<String> = vec![
            "test".to_string(),
            format!("-covermode={}", self.cover_mode),
            format!("-coverprofile={}", self.profile_path.display()),
        ];
        test_args.extend(self.extra_args.iter().cloned());
        if !self.has_package_selector() {
            test_args.push("./...".to_string());
        }
        let test_output = self.invoke(&test_args)?;

        let summary_args = vec![
            "tool".to_string(),
            "cover".to_string(),
            format!("-func={}", self.profile_path.display()),
        ];
        let summary_output = self.invoke(&summary_args)?;

        Ok(format!("{test_output}\n{summary_output}"))
    }

    /// Whether the extra args already select packages to test.
    ///
    /// Any non-flag argument counts, so both `./...` patterns and fully
    /// qualified import paths suppress the default selector. Flag values
    /// must use the `-flag=value` form to not be mistaken for one.
    fn has_package_selector(&self) -> bool {
        self.extra_args.iter().any(|arg| !arg.starts_with('-'))
    }

    fn invoke(&self, args: &[String]) -> CliResult<String> {
        tracing::debug!(program = %self.program, ?args, "invoking test runner");
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.working_directory)
            .output()
            .map_err(|err| {
                CliError::test_execution(format!("failed to spawn {}: {err}", self.program))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log_tail("stdout", &stdout);
            log_tail("stderr", &stderr);
            return Err(CliError::test_execution(format!(
                "{} {} exited with {}",
                self.program,
                args.first().map(String::as_str).unwrap_or(""),
                output.status
            )));
        }
        Ok(stdout)
    }
}

/// Log the last lines of a captured stream for post-mortem diagnosis
fn log_tail(stream: &str, text: &str) {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(DIAGNOSTIC_TAIL_LINES);
    for line in &lines[start..] {
        tracing::error!(stream, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CheckArgs;
    use clap::Parser;
    use std::path::Path;

    fn runner(extra: &[&str]) -> CoverageRunner {
        let mut argv = vec!["cubridor"];
        argv.extend_from_slice(extra);
        let args = CheckArgs::parse_from(argv);
        let config = RunConfig::from_args(&args, Path::new("/tmp/run")).unwrap();
        CoverageRunner::new(&config)
    }

    #[test]
    fn test_default_package_selector_appended() {
        let r = runner(&[]);
        assert!(!r.has_package_selector());
    }

    #[test]
    fn test_user_selector_respected() {
        let r = runner(&["--test-args", r#"["./cmd/..."]"#]);
        assert!(r.has_package_selector());
    }

    #[test]
    fn test_import_path_selector_respected() {
        let r = runner(&["--test-args", r#"["example.com/mod/pkg"]"#]);
        assert!(r.has_package_selector());
    }

    #[test]
    fn test_flag_args_are_not_a_selector() {
        let r = runner(&["--test-args", r#"["-race", "-run=TestParser"]"#]);
        assert!(!r.has_package_selector());
    }

    #[test]
    fn test_successful_invocation_captures_stdout() {
        let r = runner(&[]).with_program("echo");
        let output = r.run().unwrap();
        assert!(output.contains("-covermode=count"));
    }

    #[test]
    fn test_failed_invocation_is_fatal() {
        let r = runner(&[]).with_program("false");
        let err = r.run().unwrap_err();
        assert!(matches!(err, CliError::TestExecution { .. }));
    }

    #[test]
    fn test_missing_program_is_fatal() {
        let r = runner(&[]).with_program("definitely-not-a-real-binary");
        assert!(r.run().is_err());
    }
}
