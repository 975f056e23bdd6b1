use std::ffi::OsString;

use clap::{CommandFactory, Parser};

#[derive(Parser, Debug, Default)]
#[command(
    name = "ts",
    version,
    about = "ts - run a command with timestamped output",
    override_usage = "ts [ options ] cmd args..."
)]
pub struct Args {
    /// Timestamp format: default, ansi, rfc3339 or rfc3339nano [default: default]
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Calculate timestamps in milliseconds since program start.
    #[arg(long)]
    pub millis: bool,

    /// Use tabs rather than spaces after the timestamp.
    #[arg(long)]
    pub tabs: bool,

    /// Use UTC timestamps instead of local time.
    #[arg(long)]
    pub utc: bool,

    /// Log the resolved command and arguments before running it.
    #[arg(long)]
    pub verbose: bool,

    /// Command to run, followed by its arguments.
    #[arg(trailing_var_arg = true, value_name = "CMD")]
    pub command: Vec<String>,
}

const LONG_OPTIONS: &[&str] = &["format"];
const LONG_FLAGS: &[&str] = &["millis", "tabs", "utc", "verbose", "help", "version"];

impl Args {
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Rewrites Go-style single-dash long options (`-utc`, `-format=ansi`,
/// `-format ansi`) to their `--` spelling.
///
/// Rewriting stops at the first positional argument or `--`; everything after
/// that belongs to the child command and is passed through untouched.
pub fn normalize_args<I>(raw: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut it = raw.into_iter().map(Into::into);
    let mut out: Vec<OsString> = Vec::new();
    if let Some(bin) = it.next() {
        out.push(bin);
    }

    while let Some(arg) = it.next() {
        let Some(s) = arg.to_str() else {
            out.push(arg);
            break;
        };
        if s == "--" || s == "-" || !s.starts_with('-') {
            out.push(arg);
            break;
        }

        let body = s.strip_prefix("--").unwrap_or(&s[1..]);
        let name = body.split_once('=').map_or(body, |(n, _)| n);

        if LONG_OPTIONS.contains(&name) {
            let has_value = body.contains('=');
            out.push(format!("--{body}").into());
            if !has_value {
                if let Some(value) = it.next() {
                    out.push(value);
                }
            }
        } else if LONG_FLAGS.contains(&name) {
            out.push(format!("--{body}").into());
        } else {
            // unknown options are rejected by clap, they never become the command
            out.push(arg);
        }
    }

    out.extend(it);
    out
}
