use std::fmt::Write as _;
use std::time::Instant;

use chrono::{DateTime, Local, Utc};

use super::layout::{TimeFormat, TimeLayout};

/// Immutable timestamp settings shared by both output streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    pub layout: TimeLayout,
    pub utc: bool,
    pub millis: bool,
    pub tabs: bool,
}

impl WriterConfig {
    pub fn new(format: TimeFormat, utc: bool, millis: bool, tabs: bool) -> Self {
        Self {
            layout: format.layout(),
            utc,
            millis,
            tabs,
        }
    }

    pub fn separator(&self) -> &'static str {
        if self.tabs {
            "|\t"
        } else {
            "| "
        }
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::new(TimeFormat::Default, false, false, false)
    }
}

/// Renders the per-line prefix: timestamp followed by the separator.
#[derive(Debug, Clone, Copy)]
pub struct StampFormatter {
    config: WriterConfig,
    start: Instant,
}

impl StampFormatter {
    /// `start` is the origin for millis mode; both streams must share it.
    pub fn new(config: WriterConfig, start: Instant) -> Self {
        Self { config, start }
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn stamp(&self) -> String {
        self.stamp_at(Utc::now(), Instant::now())
    }

    pub fn stamp_at(&self, wall: DateTime<Utc>, mono: Instant) -> String {
        let mut out = String::with_capacity(40);

        if self.config.millis {
            let micros = mono.saturating_duration_since(self.start).as_micros();
            let _ = write!(out, "{:12.3}ms", micros as f64 / 1000.0);
        } else if self.config.utc {
            self.config.layout.render(&wall, &mut out);
        } else {
            self.config
                .layout
                .render(&wall.with_timezone(&Local), &mut out);
        }

        out.push_str(self.config.separator());
        out
    }
}
