use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use tstamp_core::config::LoggingConfig;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

/// Filter directives for the configured level; `-verbose` lifts this
/// binary's own events to `info`.
pub fn filter_directives(logging: &LoggingConfig, verbose: bool) -> String {
    let level = logging.level.trim();
    let level = if level.is_empty() { "warn" } else { level };
    if verbose {
        format!("{level},tstamp_cli=info")
    } else {
        level.to_string()
    }
}

pub fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(filter_directives(logging, verbose)).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("tstamp"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("tstamp.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    // our own log timestamps would be confused with the stamped output
    let console_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_cli_events_only() {
        let cfg = LoggingConfig::default();
        assert_eq!(filter_directives(&cfg, false), "warn");
        assert_eq!(filter_directives(&cfg, true), "warn,tstamp_cli=info");
    }

    #[test]
    fn blank_level_falls_back_to_warn() {
        let cfg = LoggingConfig {
            level: "  ".into(),
            ..Default::default()
        };
        assert_eq!(filter_directives(&cfg, false), "warn");
    }
}
