use anyhow::Result;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

use tstamp_core::runner::{ExitState, RunnerPlugin, RunnerSession, RunnerStartArgs};

/// Runs the command as a real child process with stdout and stderr piped.
/// Stdin is inherited so interactive commands keep working.
pub struct ProcessRunnerPlugin {}

impl ProcessRunnerPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProcessRunnerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunnerPlugin for ProcessRunnerPlugin {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> Result<Box<dyn RunnerSession>> {
        // spawn errors stay io::Error so the caller can tell not-found from permission denied
        let child = Command::new(&args.cmd)
            .args(&args.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        tracing::debug!(pid = child.id(), cmd = %args.cmd, "child spawned");
        Ok(Box::new(ProcessRunnerSession { child }))
    }
}

struct ProcessRunnerSession {
    child: Child,
}

#[async_trait]
impl RunnerSession for ProcessRunnerSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn wait(&mut self) -> Result<ExitState> {
        let status = self.child.wait().await?;
        Ok(status.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_surfaces_io_not_found() {
        let plugin = ProcessRunnerPlugin::new();
        let args = RunnerStartArgs {
            cmd: "tstamp-definitely-not-a-real-binary".into(),
            args: vec![],
        };
        let err = match plugin.start_session(&args).await {
            Ok(_) => panic!("spawn should fail"),
            Err(e) => e,
        };
        let io = err.downcast::<std::io::Error>().expect("io error");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_hands_out_each_pipe_once() {
        let plugin = ProcessRunnerPlugin::new();
        let args = RunnerStartArgs {
            cmd: "sh".into(),
            args: vec!["-c".into(), "exit 0".into()],
        };
        let mut session = plugin.start_session(&args).await.unwrap();
        assert!(session.stdout().is_some());
        assert!(session.stdout().is_none());
        assert!(session.stderr().is_some());
        assert!(session.wait().await.unwrap().success());
    }
}
