//! Publish-date formatting for article cards and comment timestamps.
//!
//! Upstream dates arrive in several shapes: `{seconds, nanoseconds}` objects
//! from the document store, RFC 3339 or `YYYY-MM-DD` strings, and epoch
//! milliseconds. All of them render through one token pattern.

use chrono::{Datelike, Timelike};
use chrono_tz::Tz;
use serde_json::Value;
use time::{
    Date, OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description,
};

use super::timezone::localized_datetime;

/// Parse any supported upstream date shape into an instant.
pub fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    match value {
        Value::Object(map) => {
            let seconds = map.get("seconds").and_then(Value::as_i64)?;
            OffsetDateTime::from_unix_timestamp(seconds).ok()
        }
        Value::String(text) => parse_date_string(text.trim()),
        Value::Number(number) => {
            let millis = number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value as i64))?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
        }
        _ => None,
    }
}

fn parse_date_string(text: &str) -> Option<OffsetDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(parsed);
    }
    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Render `value` with `pattern`, in `tz`. Unparseable input yields `""`.
///
/// The first occurrence of `dd`, `MM`, `yyyy`, `HH` and `mm` is replaced, in
/// that order, then `:ss` is dropped.
pub fn format_date(value: &Value, pattern: &str, tz: Tz) -> String {
    let Some(local) = parse_timestamp(value).and_then(|instant| localized_datetime(instant, tz))
    else {
        return String::new();
    };

    pattern
        .replacen("dd", &format!("{:02}", local.day()), 1)
        .replacen("MM", &format!("{:02}", local.month()), 1)
        .replacen("yyyy", &local.year().to_string(), 1)
        .replacen("HH", &format!("{:02}", local.hour()), 1)
        .replacen("mm", &format!("{:02}", local.minute()), 1)
        .replacen(":ss", "", 1)
}
