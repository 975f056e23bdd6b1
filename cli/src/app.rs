//! Merges flags over the loaded config, validates them and runs the command.
use std::time::Instant;

use tstamp_core::config::{AppConfig, StampConfig};
use tstamp_core::error::{CliError, RunnerError};
use tstamp_core::runner::{self, RunOutcome, RunnerStartArgs};
use tstamp_plugins::ProcessRunnerPlugin;

use crate::commands::cli::{self, Args};

/// Command-line flags override config-file and environment defaults.
pub fn merge_stamp(args: &Args, base: &StampConfig) -> StampConfig {
    StampConfig {
        format: args.format.clone().unwrap_or_else(|| base.format.clone()),
        utc: args.utc || base.utc,
        millis: args.millis || base.millis,
        tabs: args.tabs || base.tabs,
    }
}

/// Warning for flag combinations where one flag has no effect.
pub fn conflicting_flags(stamp: &StampConfig) -> Option<&'static str> {
    (stamp.millis && stamp.utc)
        .then_some("WARNING: -utc will be ignored when -millis is specified.")
}

/// Report for a child that did not exit successfully.
pub fn failure_report(outcome: &RunOutcome) -> Option<String> {
    (!outcome.success()).then(|| format!("ERROR: command failed: {}", outcome.exit))
}

#[tracing::instrument(name = "cli.run_app", skip_all)]
pub async fn run_app(args: Args, cfg: &AppConfig, started_at: Instant) -> Result<i32, CliError> {
    let stamp = merge_stamp(&args, &cfg.stamp);
    let writer_cfg = stamp.resolve()?;

    // stderr directly: must show even with `[logging] enabled = false`
    if let Some(warning) = conflicting_flags(&stamp) {
        eprintln!("{warning}");
    }

    let Some((cmd, rest)) = args.command.split_first() else {
        return Err(CliError::Usage(cli::usage()));
    };
    let start = RunnerStartArgs {
        cmd: cmd.clone(),
        args: rest.to_vec(),
    };

    if args.verbose {
        tracing::info!(command = %start.cmd, args = ?start.args, "invoking command");
    }

    let plugin = ProcessRunnerPlugin::new();
    let outcome = runner::run_command(&plugin, &start, writer_cfg, started_at).await?;

    if let Some(report) = failure_report(&outcome) {
        eprintln!("{report}");
    }
    tracing::debug!(
        duration_ms = outcome.duration.as_millis() as u64,
        stdout_bytes = outcome.stdout_bytes,
        stderr_bytes = outcome.stderr_bytes,
        "run finished"
    );

    Ok(outcome.exit_code())
}

pub fn exit_code_for_error(e: &CliError) -> i32 {
    // 2: usage / config error, nothing was spawned
    // 126: command found but could not be started
    // 127: command not found
    // 1: stream io or other runtime failure
    match e {
        CliError::Usage(_) | CliError::Config(_) => 2,
        CliError::Runner(re) => match re.spawn_kind() {
            Some(std::io::ErrorKind::NotFound) => 127,
            Some(_) => 126,
            None => match re {
                RunnerError::MissingPipe(_) => 2,
                _ => 1,
            },
        },
        CliError::Logging(_) => 1,
    }
}
