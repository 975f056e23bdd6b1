use std::fmt::{self, Write as _};
use std::str::FromStr;

use chrono::{DateTime, Offset, TimeZone, Timelike};

use crate::error::ConfigError;

/// Timestamp flavours selectable with `-format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFormat {
    #[default]
    Default,
    Ansi,
    Rfc3339,
    Rfc3339Nano,
}

impl TimeFormat {
    pub const IDENTIFIERS: [&'static str; 4] = ["default", "ansi", "rfc3339", "rfc3339nano"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Ansi => "ansi",
            Self::Rfc3339 => "rfc3339",
            Self::Rfc3339Nano => "rfc3339nano",
        }
    }

    pub fn layout(self) -> TimeLayout {
        match self {
            Self::Default => TimeLayout {
                pattern: "%Y/%m/%d %H:%M:%S",
                fraction: false,
                zone: false,
            },
            Self::Ansi => TimeLayout {
                pattern: "%a %b %e %H:%M:%S %Y",
                fraction: false,
                zone: false,
            },
            Self::Rfc3339 => TimeLayout {
                pattern: "%Y-%m-%dT%H:%M:%S",
                fraction: false,
                zone: true,
            },
            Self::Rfc3339Nano => TimeLayout {
                pattern: "%Y-%m-%dT%H:%M:%S",
                fraction: true,
                zone: true,
            },
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "ansi" => Ok(Self::Ansi),
            "rfc3339" => Ok(Self::Rfc3339),
            "rfc3339nano" => Ok(Self::Rfc3339Nano),
            other => Err(ConfigError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal rendering recipe for one [`TimeFormat`].
///
/// `pattern` is a strftime string covering the date and time of day. RFC 3339
/// layouts additionally append a nanosecond fraction with trailing zeros
/// trimmed (`fraction`) and a zone designator, `Z` for a zero offset and
/// `+hh:mm` otherwise (`zone`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeLayout {
    pub pattern: &'static str,
    pub fraction: bool,
    pub zone: bool,
}

impl TimeLayout {
    pub fn render<Tz>(&self, at: &DateTime<Tz>, out: &mut String)
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let _ = write!(out, "{}", at.format(self.pattern));

        if self.fraction {
            // leap seconds are reported as nanos >= 1e9
            let nanos = at.nanosecond() % 1_000_000_000;
            if nanos != 0 {
                let digits = format!("{nanos:09}");
                out.push('.');
                out.push_str(digits.trim_end_matches('0'));
            }
        }

        if self.zone {
            if at.offset().fix().local_minus_utc() == 0 {
                out.push('Z');
            } else {
                let _ = write!(out, "{}", at.format("%:z"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn render<Tz>(format: TimeFormat, at: DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut out = String::new();
        format.layout().render(&at, &mut out);
        out
    }

    fn afternoon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()
    }

    #[test]
    fn parses_every_identifier() {
        for id in TimeFormat::IDENTIFIERS {
            let tf: TimeFormat = id.parse().unwrap();
            assert_eq!(tf.as_str(), id);
        }
    }

    #[test]
    fn rejects_unknown_identifier() {
        let err = "illegal".parse::<TimeFormat>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFormat(ref v) if v == "illegal"));
        assert!(err.to_string().contains("illegal"));
    }

    #[test]
    fn default_layout_is_24_hour() {
        assert_eq!(render(TimeFormat::Default, afternoon()), "2024/03/05 14:07:09");
    }

    #[test]
    fn ansi_layout_pads_day_with_space() {
        assert_eq!(render(TimeFormat::Ansi, afternoon()), "Tue Mar  5 14:07:09 2024");
    }

    #[test]
    fn rfc3339_uses_z_for_utc() {
        assert_eq!(render(TimeFormat::Rfc3339, afternoon()), "2024-03-05T14:07:09Z");
    }

    #[test]
    fn rfc3339_writes_numeric_offset() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let at = afternoon().with_timezone(&cet);
        assert_eq!(render(TimeFormat::Rfc3339, at), "2024-03-05T15:07:09+01:00");

        let west = FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap();
        let at = afternoon().with_timezone(&west);
        assert_eq!(render(TimeFormat::Rfc3339, at), "2024-03-05T08:37:09-05:30");
    }

    #[test]
    fn rfc3339nano_trims_trailing_zeros() {
        let at = afternoon().with_nanosecond(500_000_000).unwrap();
        assert_eq!(render(TimeFormat::Rfc3339Nano, at), "2024-03-05T14:07:09.5Z");

        let at = afternoon().with_nanosecond(123_456_789).unwrap();
        assert_eq!(
            render(TimeFormat::Rfc3339Nano, at),
            "2024-03-05T14:07:09.123456789Z"
        );

        let at = afternoon().with_nanosecond(1_000).unwrap();
        assert_eq!(render(TimeFormat::Rfc3339Nano, at), "2024-03-05T14:07:09.000001Z");
    }

    #[test]
    fn rfc3339nano_omits_zero_fraction() {
        assert_eq!(render(TimeFormat::Rfc3339Nano, afternoon()), "2024-03-05T14:07:09Z");
    }
}
