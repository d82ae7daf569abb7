//! Validation and normalization of inference output.
//!
//! Validation never fails: unrecognized labels fall back to their defaults,
//! scores are coerced and clamped, keyword lists are cleaned. The model's
//! creativity ends here; what reaches the warehouse is always well-formed.

use serde_json::Value;

use gramflow_warehouse::{CommentEnrichment, PostEnrichment};

const VALID_SENTIMENT_LABELS: [&str; 4] = ["positive", "negative", "neutral", "mixed"];
const VALID_INTENTS: [&str; 6] = ["praise", "complaint", "question", "mention", "spam", "other"];
const VALID_CONTENT_TOPICS: [&str; 4] = ["sales", "educational", "lifestyle", "humor"];

/// Validate a raw comment enrichment object field by field.
pub fn comment_enrichment(raw: &Value) -> CommentEnrichment {
    CommentEnrichment {
        sentiment_label: normalize_label(raw.get("sentiment_label"), &VALID_SENTIMENT_LABELS, "neutral"),
        sentiment_score: normalize_score(raw.get("sentiment_score")),
        intent: normalize_label(raw.get("intent"), &VALID_INTENTS, "other"),
        keywords: normalize_keywords(raw.get("keywords")),
    }
}

/// Validate a raw post enrichment object. Tone and call-to-action are free
/// text and pass through unvalidated.
pub fn post_enrichment(raw: &Value) -> PostEnrichment {
    PostEnrichment {
        content_topic: normalize_label(raw.get("content_topic"), &VALID_CONTENT_TOPICS, "lifestyle"),
        tone: raw.get("tone").and_then(Value::as_str).map(String::from),
        call_to_action_type: raw
            .get("call_to_action_type")
            .and_then(Value::as_str)
            .map(String::from),
    }
}

fn normalize_label(value: Option<&Value>, valid: &[&str], default: &str) -> String {
    match value.and_then(Value::as_str) {
        Some(label) => {
            let lowered = label.to_lowercase();
            if valid.contains(&lowered.as_str()) {
                lowered
            } else {
                default.to_string()
            }
        }
        None => default.to_string(),
    }
}

/// Coerce a number or numeric string to f64 and clamp to [-1.0, 1.0];
/// anything else is neutral 0.0.
fn normalize_score(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    coerced.map(|score| score.clamp(-1.0, 1.0)).unwrap_or(0.0)
}

/// Stringify and trim each element; drop nulls and blanks. Anything that is
/// not a list at all becomes an empty list.
fn normalize_keywords(value: Option<&Value>) -> Vec<String> {
    let Some(items) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let text = match item {
                Value::Null => return None,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
