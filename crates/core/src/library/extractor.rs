use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::debug;

use crate::{error::ImportError, models::GameRecord};

use super::json_path::{bool_at, lookup, str_at, strings_at};

/// Top-level array holding GOG entries.
const GAMES_KEY: &str = "games";
/// Top-level array holding Epic (Legendary) and Amazon (Nile) entries.
const LIBRARY_KEY: &str = "library";

const GIB_SUFFIX: &str = " GiB";

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

/// Parse a library document into canonical records.
///
/// Entries under `games` come first, then entries under `library`, each in
/// source order. Only a document that is not JSON at all is an error.
pub fn extract_records(json: &str) -> Result<Vec<GameRecord>, ImportError> {
    let document: Value = serde_json::from_str(json)?;

    let records = [GAMES_KEY, LIBRARY_KEY]
        .iter()
        .filter_map(|key| document.get(*key).and_then(Value::as_array))
        .flatten()
        .map(parse_record)
        .collect::<Vec<_>>();

    debug!("extracted {} records from library document", records.len());
    Ok(records)
}

/// Map one source element onto a [`GameRecord`], degrading bad fields to defaults.
pub fn parse_record(entry: &Value) -> GameRecord {
    GameRecord {
        title: key_text(entry, "title"),
        runner: key_text(entry, "runner"),
        can_run_offline: bool_at(entry, &["canRunOffline"]).unwrap_or(false),
        is_linux_native: bool_at(entry, &["is_linux_native"]).unwrap_or(false),
        install_size: lookup(entry, &["install", "install_size"])
            .and_then(parse_install_size)
            .unwrap_or(0.0),
        description: owned_str(entry, &["extra", "about", "description"]),
        short_description: owned_str(entry, &["extra", "about", "shortDescription"]),
        store_url: owned_str(entry, &["store_url"])
            .or_else(|| owned_str(entry, &["extra", "storeUrl"])),
        genres: strings_at(entry, &["extra", "genres"]),
        release_date: str_at(entry, &["extra", "releaseDate"]).and_then(|raw| {
            let parsed = parse_release_date(raw);
            if parsed.is_none() {
                debug!("discarding unreadable release date {raw:?}");
            }
            parsed
        }),
    }
}

fn owned_str(entry: &Value, path: &[&str]) -> Option<String> {
    str_at(entry, path).map(str::to_string)
}

/// Text of a natural-key field. Scalars keep their JSON text so `1942` and
/// `1943` stay distinct; missing, null and structured values become `""`.
fn key_text(entry: &Value, key: &str) -> String {
    match entry.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}

/// Install size in GiB from either a `"45.2 GiB"` string or a bare number.
fn parse_install_size(value: &Value) -> Option<f64> {
    let size = match value {
        Value::String(raw) => raw.replace(GIB_SUFFIX, "").trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    size.is_finite().then_some(size)
}

/// Best-effort release date parsing across the formats stores emit.
///
/// Offsets are ignored: the calendar day is taken as written.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.date_naive());
        }
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}
