use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Parse an RFC 3339 range bound (e.g. `2025-07-17T07:00:00.000Z`)
pub fn parse_timestamp(ts: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .with_context(|| format!("Failed to parse timestamp: {}", ts))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check that `start..=end` is a well-formed, non-empty range
pub fn validate_range(start: &str, end: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_dt = parse_timestamp(start).context("Invalid --start")?;
    let end_dt = parse_timestamp(end).context("Invalid --end")?;
    if end_dt < start_dt {
        bail!("Range end {} is before range start {}", end, start);
    }
    Ok((start_dt, end_dt))
}

/// Check that `name` is a known IANA timezone
pub fn validate_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("Unknown IANA timezone: {}", name))
}

/// Calculate duration between two timestamps in human-readable format
pub fn duration_human(start: &DateTime<Utc>, end: &DateTime<Utc>) -> String {
    let duration = end.signed_duration_since(*start);
    let seconds = duration.num_seconds();

    if seconds < 60 {
        format!("{} seconds", seconds)
    } else if seconds < 3600 {
        format!("{} minutes", seconds / 60)
    } else if seconds < 86400 {
        format!("{:.1} hours", seconds as f64 / 3600.0)
    } else {
        format!("{:.1} days", seconds as f64 / 86400.0)
    }
}
