// File: ./src/model/adapter.rs
// Lenient JSON field decoding and timestamp display
use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// `null` and absent both mean "no text".
pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Category ids arrive as numbers, or as numeric strings when the record was
/// written by a form. Entries that are neither are dropped.
pub fn category_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .iter()
        .filter_map(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .collect())
}

/// Parses the timestamp shapes the backend stores: RFC 3339, or the
/// `datetime-local` form (`2024-03-10T19:00`, optionally with seconds).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Human-readable form of a stored timestamp; unknown shapes pass through.
pub fn display_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}
