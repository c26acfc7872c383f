//! Commitment-date display formatting.
//!
//! The host stores the timestamp as fixed-width UTC (`YYYY-MM-DD HH:mm:ss`);
//! the form shows it in the viewer's timezone as `DD/MM/YYYY HH:mm:ss`.

use chrono::{Local, NaiveDateTime, TimeZone, Utc};

pub const STORED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Parse a stored UTC timestamp and render it for display in `tz`.
pub fn format_display<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<String, chrono::ParseError>
where
    Tz::Offset: std::fmt::Display,
{
    let naive = NaiveDateTime::parse_from_str(raw.trim(), STORED_FORMAT)?;
    let utc = Utc.from_utc_datetime(&naive);
    Ok(utc.with_timezone(tz).format(DISPLAY_FORMAT).to_string())
}

/// Render in the runtime's local timezone.
pub fn format_local(raw: &str) -> Result<String, chrono::ParseError> {
    format_display(raw, &Local)
}
