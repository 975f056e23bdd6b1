use async_trait::async_trait;
use tokio::io::{AsyncRead, DuplexStream};

use tstamp_core::runner::{ExitState, RunnerSession};

/// In-memory child: the test writes to `stdout_tx` / `stderr_tx`, the session
/// hands out the read halves and reports `exit` from `wait`.
pub struct ScriptedSession {
    stdout: Option<DuplexStream>,
    stderr: Option<DuplexStream>,
    exit: ExitState,
}

pub struct ScriptedChild {
    pub session: ScriptedSession,
    pub stdout_tx: DuplexStream,
    pub stderr_tx: DuplexStream,
}

pub fn scripted(exit_code: i32) -> ScriptedChild {
    let (stdout_tx, stdout_rx) = tokio::io::duplex(64 * 1024);
    let (stderr_tx, stderr_rx) = tokio::io::duplex(64 * 1024);
    ScriptedChild {
        session: ScriptedSession {
            stdout: Some(stdout_rx),
            stderr: Some(stderr_rx),
            exit: ExitState {
                code: Some(exit_code),
                signal: None,
            },
        },
        stdout_tx,
        stderr_tx,
    }
}

impl ScriptedSession {
    pub fn without_stderr(mut self) -> Self {
        self.stderr = None;
        self
    }
}

#[async_trait]
impl RunnerSession for ScriptedSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn wait(&mut self) -> anyhow::Result<ExitState> {
        Ok(self.exit)
    }
}

/// Strips the `<stamp>| ` prefix from every line.
pub fn line_contents(out: &str) -> Vec<String> {
    out.lines()
        .map(|l| match l.split_once("| ") {
            Some((_, rest)) => rest.to_string(),
            None => panic!("line without stamp: {l:?}"),
        })
        .collect()
}
