//! Null-safe traversal of nested JSON values.
//!
//! Scraper snapshots arrive with arbitrary gaps: whole sub-objects missing,
//! fields present but null, or intermediate values that are not objects at
//! all. Every raw read goes through `pluck` so a gap anywhere on the path
//! reads as absence instead of a panic.

use serde_json::Value;

/// Walk `value` by the ordered key `path`. Returns `None` when any
/// intermediate value is missing, null, or not an object.
pub fn pluck<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.as_object()?.get(*key)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

pub fn pluck_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    pluck(value, path).and_then(Value::as_str)
}

pub fn pluck_i64(value: &Value, path: &[&str]) -> Option<i64> {
    pluck(value, path).and_then(Value::as_i64)
}

pub fn pluck_f64(value: &Value, path: &[&str]) -> Option<f64> {
    pluck(value, path).and_then(Value::as_f64)
}

pub fn pluck_bool(value: &Value, path: &[&str]) -> Option<bool> {
    pluck(value, path).and_then(Value::as_bool)
}

/// String-array fields (hashtags). Non-string elements are skipped.
pub fn pluck_string_list(value: &Value, path: &[&str]) -> Option<Vec<String>> {
    let items = pluck(value, path)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}
