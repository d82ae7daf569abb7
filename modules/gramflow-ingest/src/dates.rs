//! Date dimension minting.
//!
//! Every mint produces a fresh surrogate key; semantically identical dates
//! minted twice yield two distinct rows. Deduplicating by value would change
//! the warehouse contract, so there is deliberately no cache here.

use chrono::{DateTime, Datelike, Weekday};
use uuid::Uuid;

use gramflow_warehouse::DimDate;

/// Build a date-dimension row from an RFC 3339 timestamp string.
///
/// A trailing `Z` designator is rewritten to an explicit `+00:00` offset
/// before parsing. Parse failure is recoverable: the caller decides whether
/// to fall back to another key (comments) or leave the allocated key without
/// a persisted row (posts).
pub fn mint_date_row(timestamp: &str) -> Result<DimDate, chrono::ParseError> {
    let normalized = match timestamp.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => timestamp.to_string(),
    };
    let parsed = DateTime::parse_from_rfc3339(&normalized)?;
    let weekday = parsed.weekday();

    Ok(DimDate {
        date_sk: Uuid::new_v4(),
        date: parsed.format("%Y-%m-%d").to_string(),
        day: parsed.day(),
        month: parsed.month(),
        year: parsed.year(),
        weekday: parsed.format("%A").to_string(),
        is_weekend: matches!(weekday, Weekday::Sat | Weekday::Sun),
    })
}
