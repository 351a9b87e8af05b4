//! Temporal text formats: ISO-8601 periods and lenient date-time parsing.
//!
//! Wire payloads carry durations as ISO-8601 periods (`PT1H`, `P3DT4M`),
//! date-times as RFC 3339 with the occasional sloppy variant, calendar dates
//! as `YYYY-MM-DD` and clock times as `HH:MM:SS` with optional fractions.
//! Parsers here answer `Error::Format` — the value was present, its content
//! was not — never absence; kind checks happen at the parse-node layer.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;

// Calendar components use the fixed conversions of the source convention:
// a year is 365 days, a month 30. Periods are durations here, not dates.
const DAYS_PER_YEAR: i64 = 365;
const DAYS_PER_MONTH: i64 = 30;
const DAYS_PER_WEEK: i64 = 7;

static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        ^(?P<neg>-)?P
        (?:(?P<years>\d+)Y)?
        (?:(?P<months>\d+)M)?
        (?:(?P<weeks>\d+)W)?
        (?:(?P<days>\d+)D)?
        (?:T
            (?:(?P<hours>\d+)H)?
            (?:(?P<minutes>\d+)M)?
            (?:(?P<seconds>\d+(?:\.\d+)?)S)?
        )?$",
    )
    .expect("period pattern is valid")
});

/// Parse an ISO-8601 period into a duration.
pub fn parse_duration(text: &str) -> Result<Duration, Error> {
    let captures = PERIOD
        .captures(text)
        .ok_or_else(|| Error::format("duration", text.to_string()))?;

    let component = |name: &str| -> i64 {
        captures
            .name(name)
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .unwrap_or(0)
    };

    // "P" with no components at all is not a period.
    let named = ["years", "months", "weeks", "days", "hours", "minutes", "seconds"];
    if named.iter().all(|n| captures.name(n).is_none()) {
        return Err(Error::format("duration", text.to_string()));
    }

    let days = component("years") * DAYS_PER_YEAR
        + component("months") * DAYS_PER_MONTH
        + component("weeks") * DAYS_PER_WEEK
        + component("days");
    let mut seconds = days * 86_400 + component("hours") * 3_600 + component("minutes") * 60;
    let mut nanos = 0i64;
    if let Some(sec) = captures.name("seconds") {
        let value: f64 = sec
            .as_str()
            .parse()
            .map_err(|_| Error::format("duration", text.to_string()))?;
        seconds += value.trunc() as i64;
        nanos = (value.fract() * 1e9).round() as i64;
    }

    let mut duration = Duration::seconds(seconds) + Duration::nanoseconds(nanos);
    if captures.name("neg").is_some() {
        duration = -duration;
    }
    Ok(duration)
}

/// Format a duration as an ISO-8601 period: `PT1H`, `P3DT4M5.5S`, `PT0S`.
pub fn format_duration(duration: Duration) -> String {
    let negative = duration < Duration::zero();
    let duration = if negative { -duration } else { duration };

    let total_seconds = duration.num_seconds();
    let nanos = (duration - Duration::seconds(total_seconds))
        .num_nanoseconds()
        .unwrap_or(0);

    let days = total_seconds / 86_400;
    let hours = total_seconds % 86_400 / 3_600;
    let minutes = total_seconds % 3_600 / 60;
    let seconds = total_seconds % 60;

    let mut out = String::from(if negative { "-P" } else { "P" });
    if days > 0 {
        out.push_str(&format!("{days}D"));
    }
    if hours > 0 || minutes > 0 || seconds > 0 || nanos > 0 {
        out.push('T');
        if hours > 0 {
            out.push_str(&format!("{hours}H"));
        }
        if minutes > 0 {
            out.push_str(&format!("{minutes}M"));
        }
        if nanos > 0 {
            let fractional = seconds as f64 + nanos as f64 / 1e9;
            out.push_str(&format!("{fractional}S"));
        } else if seconds > 0 {
            out.push_str(&format!("{seconds}S"));
        }
    } else if days == 0 {
        out.push_str("T0S");
    }
    out
}

/// Parse a date-time with offset: strict RFC 3339 first, then progressively
/// lenient fallbacks (offset-free forms are taken as UTC; stray whitespace is
/// squashed and retried once).
pub fn parse_date_time_offset(text: &str) -> Result<DateTime<FixedOffset>, Error> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(text) {
        return Ok(parsed);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }
    if text.contains(char::is_whitespace) {
        let squashed: String = text.split_whitespace().collect();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&squashed) {
            return Ok(parsed);
        }
    }
    Err(Error::format("date-time", text.to_string()))
}

/// Parse a calendar date; a full date-time is accepted and truncated.
pub fn parse_date(text: &str) -> Result<NaiveDate, Error> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    parse_date_time_offset(text)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| Error::format("date", text.to_string()))
}

/// Parse a clock time with optional fractional seconds.
pub fn parse_time(text: &str) -> Result<NaiveTime, Error> {
    for format in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(text, format) {
            return Ok(time);
        }
    }
    Err(Error::format("time", text.to_string()))
}

// --------------------------------- Tests ---------------------------------- //
