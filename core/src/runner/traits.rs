use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::types::{ExitState, RunnerStartArgs};

#[async_trait]
pub trait RunnerSession: Send {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>>;
    async fn wait(&mut self) -> anyhow::Result<ExitState>;
}

#[async_trait]
pub trait RunnerPlugin: Send + Sync {
    fn name(&self) -> &str;
    /// Launches the command with stdout and stderr piped back to the caller.
    async fn start_session(&self, args: &RunnerStartArgs)
        -> anyhow::Result<Box<dyn RunnerSession>>;
}
