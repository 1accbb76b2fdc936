//! Cubridor: coverage gate for go test with git-notes history
//!
//! ## Usage
//!
//! ```bash
//! cubridor check --coverage-threshold 80          # run, diff, gate
//! cubridor check --pull-request --base-ref main   # PR comparison
//! cubridor history --ref origin/main              # inspect the store
//! ```

use clap::Parser;
use cubridor::{handlers, Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> cubridor::CliResult<()> {
    match &cli.command {
        Commands::Check(args) => handlers::execute_check(args, cli.quiet),
        Commands::History(args) => handlers::execute_history(args),
    }
}

/// Map the verbosity flags to a subscriber filter; RUST_LOG still wins
/// when set.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("cubridor={default_level},cubrir={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
