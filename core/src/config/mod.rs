mod load;
mod types;

pub use load::{apply_env_overrides, load_default, load_from, user_config_path, CONFIG_ENV};
pub use types::{AppConfig, LoggingConfig, StampConfig};
