mod io_pump;
mod run;
mod traits;
pub mod types;

pub use io_pump::{pump_stderr, pump_stdout};
pub use run::{run_command, run_session, start_session, RunSessionArgs};
pub use traits::{RunnerPlugin, RunnerSession};
pub use types::{ExitState, RunOutcome, RunnerStartArgs};
