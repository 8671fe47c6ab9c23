use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod commands;
mod exit_status;
mod report;
mod run;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "FLAVORGEN_LOG";

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let verbose = args.verbose();

    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result, verbose);

    Ok(ExitStatus::from_result(&result))
}

/// Install the stderr log subscriber.
///
/// `FLAVORGEN_LOG` wins; otherwise `debug` with `--verbose`, `warn` without.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(colored::control::SHOULD_COLORIZE.should_colorize())
        .without_time()
        .with_target(false)
        .try_init();
}
