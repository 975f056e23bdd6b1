use std::time::Instant;

use tokio::io::AsyncWrite;
use tokio::task::JoinHandle;

use crate::error::RunnerError;
use crate::stamp::{LineStampWriter, StampFormatter, WriterConfig};

use super::io_pump;
use super::traits::{RunnerPlugin, RunnerSession};
use super::types::{RunOutcome, RunnerStartArgs};

pub struct RunSessionArgs<O, E> {
    pub session: Box<dyn RunnerSession>,
    pub config: WriterConfig,
    /// Origin for millis-mode stamps, captured once at program start.
    pub started_at: Instant,
    pub stdout: O,
    pub stderr: E,
}

/// Drains both child streams through their own [`LineStampWriter`] and only
/// then waits for the child.
///
/// The first drain failure is returned immediately; the child's exit status
/// is never awaited before both streams reach end-of-data.
#[tracing::instrument(name = "runner.run_session", skip_all)]
pub async fn run_session<O, E>(args: RunSessionArgs<O, E>) -> Result<RunOutcome, RunnerError>
where
    O: AsyncWrite + Unpin + Send + 'static,
    E: AsyncWrite + Unpin + Send + 'static,
{
    let RunSessionArgs {
        mut session,
        config,
        started_at,
        stdout,
        stderr,
    } = args;

    let child_out = session
        .stdout()
        .ok_or(RunnerError::MissingPipe("stdout"))?;
    let child_err = session
        .stderr()
        .ok_or(RunnerError::MissingPipe("stderr"))?;

    let formatter = StampFormatter::new(config, started_at);
    let run_started = Instant::now();

    let out_task = io_pump::pump_stdout(child_out, LineStampWriter::new(stdout, formatter));
    let err_task = io_pump::pump_stderr(child_err, LineStampWriter::new(stderr, formatter));

    let (stdout_bytes, stderr_bytes) =
        tokio::try_join!(join_drain("stdout", out_task), join_drain("stderr", err_task))?;

    let exit = session
        .wait()
        .await
        .map_err(|e| match e.downcast::<std::io::Error>() {
            Ok(source) => RunnerError::Wait(source),
            Err(other) => RunnerError::Plugin(other),
        })?;
    tracing::debug!(%exit, stdout_bytes, stderr_bytes, "child finished");

    Ok(RunOutcome {
        exit,
        duration: run_started.elapsed(),
        stdout_bytes,
        stderr_bytes,
    })
}

async fn join_drain(
    stream: &'static str,
    task: JoinHandle<Result<u64, RunnerError>>,
) -> Result<u64, RunnerError> {
    task.await.map_err(|e| RunnerError::Join {
        stream,
        reason: e.to_string(),
    })?
}

/// Starts `start` through `plugin` and forwards its output to the process's
/// own stdout and stderr.
pub async fn run_command(
    plugin: &dyn RunnerPlugin,
    start: &RunnerStartArgs,
    config: WriterConfig,
    started_at: Instant,
) -> Result<RunOutcome, RunnerError> {
    let session = start_session(plugin, start).await?;
    run_session(RunSessionArgs {
        session,
        config,
        started_at,
        stdout: tokio::io::stdout(),
        stderr: tokio::io::stderr(),
    })
    .await
}

pub async fn start_session(
    plugin: &dyn RunnerPlugin,
    start: &RunnerStartArgs,
) -> Result<Box<dyn RunnerSession>, RunnerError> {
    tracing::debug!(runner = plugin.name(), cmd = %start.cmd, "starting session");
    plugin
        .start_session(start)
        .await
        .map_err(|e| match e.downcast::<std::io::Error>() {
            Ok(source) => RunnerError::Spawn {
                cmd: start.cmd.clone(),
                source,
            },
            Err(other) => RunnerError::Plugin(other),
        })
}
