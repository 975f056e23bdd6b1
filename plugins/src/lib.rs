pub mod runner;

pub use runner::ProcessRunnerPlugin;
