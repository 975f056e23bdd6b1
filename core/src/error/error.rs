use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("runner failed: {0}")]
    Runner(#[from] RunnerError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Usage(String),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("illegal time format identifier: {0}")]
    UnknownFormat(String),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("could not start '{cmd}': {source}")]
    Spawn {
        cmd: String,
        source: std::io::Error,
    },
    #[error("could not connect to {0} pipe")]
    MissingPipe(&'static str),
    #[error("stream io error: {stream} {source}")]
    StreamIo {
        stream: &'static str,
        source: std::io::Error,
    },
    #[error("wait failed: {0}")]
    Wait(#[source] std::io::Error),
    #[error("plugin error: {0}")]
    Plugin(#[from] anyhow::Error),
    #[error("drain task {stream} aborted: {reason}")]
    Join {
        stream: &'static str,
        reason: String,
    },
}

impl RunnerError {
    /// `io::ErrorKind` of the launch failure, if this is one.
    pub fn spawn_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Spawn { source, .. } => Some(source.kind()),
            _ => None,
        }
    }
}
