//! Whole-file JSON persistence with tolerant reads.
//!
//! The data file is one JSON array of record objects, rewritten in full on
//! every mutation. [`load`] is best-effort and never fails its caller: an
//! absent, undecodable, or unparseable file degrades to an empty collection
//! with a log diagnostic. Strict per-record validation happens later, in the
//! store — this layer only gets bytes into record mappings.

use crate::error::Result;
use log::warn;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// A record in its raw persisted form: one JSON object.
pub type RawRecord = Map<String, Value>;

/// Fields that must hold integers but may arrive as strings from form input.
const ID_FIELDS: [&str; 3] = ["id", "client_id", "airline_id"];

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Read the full record collection from `path`.
///
/// Every failure path returns an empty vector: missing or unreadable file,
/// undecodable bytes, blank content, or unparseable JSON (after one salvage
/// retry with line breaks stripped, for files mangled by manual edits).
/// Integer-coercible id fields are normalized on every element; values that
/// cannot be coerced are left for the store's validator to reject.
pub fn load(path: &Path) -> Vec<RawRecord> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                warn!("could not read {}: {}", path.display(), e);
            }
            return Vec::new();
        }
    };

    let text = match decode(&bytes) {
        Some(text) => text,
        None => {
            warn!("{} is not valid UTF-8, starting empty", path.display());
            return Vec::new();
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let document = match parse_with_salvage(text) {
        Some(document) => document,
        None => {
            warn!("could not parse {}, starting empty", path.display());
            return Vec::new();
        }
    };

    let items = match document {
        Value::Array(items) => items,
        other => {
            warn!(
                "{} does not hold a JSON array (found {}), starting empty",
                path.display(),
                type_name(&other)
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(mut map) => {
                coerce_id_fields(&mut map);
                Some(map)
            }
            other => {
                warn!("skipping non-object entry in {}: {}", path.display(), other);
                None
            }
        })
        .collect()
}

/// Rewrite the full record collection to `path`, normalizing id fields in
/// place first. Unlike [`load`], write failures propagate.
pub fn save(records: &mut [RawRecord], path: &Path) -> Result<()> {
    for record in records.iter_mut() {
        coerce_id_fields(record);
    }
    let content = serde_json::to_string_pretty(records)?;
    fs::write(path, content)?;
    Ok(())
}

/// Coerce the known id fields of one record to integers where possible.
pub fn coerce_id_fields(record: &mut RawRecord) {
    for field in ID_FIELDS {
        if let Some(value) = record.get_mut(field) {
            if let Some(n) = as_integer(value) {
                *value = Value::from(n);
            }
        }
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode file bytes as UTF-8, tolerating a leading BOM. ASCII is a UTF-8
/// subset, so this covers the encodings the data file has historically used.
fn decode(bytes: &[u8]) -> Option<&str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    std::str::from_utf8(bytes).ok()
}

fn parse_with_salvage(text: &str) -> Option<Value> {
    match serde_json::from_str(text) {
        Ok(document) => Some(document),
        Err(e) => {
            // Manual edits tend to break string literals across lines.
            let cleaned: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
            match serde_json::from_str(&cleaned) {
                Ok(document) => {
                    warn!("recovered record data after stripping line breaks ({})", e);
                    Some(document)
                }
                Err(_) => None,
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
