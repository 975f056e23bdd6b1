//! tstamp-cli library; modules are exposed for unit tests.

pub mod app;
pub mod commands;
pub mod logging;
