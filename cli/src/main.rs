use std::time::Instant;

use tstamp_cli::app;
use tstamp_cli::commands::cli;
use tstamp_cli::logging;
use tstamp_core::error::CliError;

#[tokio::main]
async fn main() {
    let started_at = Instant::now();

    let exit = match real_main(started_at).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            app::exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main(started_at: Instant) -> Result<i32, CliError> {
    let args = cli::Args::parse_normalized();
    let cfg = tstamp_core::config::load_default()?;
    logging::init_tracing(&cfg.logging, args.verbose).map_err(CliError::Logging)?;

    app::run_app(args, &cfg, started_at).await
}
