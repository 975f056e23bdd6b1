//! Timestamped forwarding of a child process's stdout and stderr.
//!
//! [`stamp::LineStampWriter`] turns an arbitrary byte stream into
//! timestamp-prefixed lines; [`runner::run_session`] drives one writer per
//! child stream concurrently and reports the child's exit state once both
//! streams are drained.

pub mod config;
pub mod error;
pub mod runner;
pub mod stamp;
