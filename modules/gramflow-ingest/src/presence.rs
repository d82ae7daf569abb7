//! Fact presence policies.
//!
//! A fact row is worth emitting when at least one of its source fields is
//! non-null. The predicates run against the raw input, before any
//! defaulting, so a snapshot of all-zero counts (explicitly present) still
//! emits while a snapshot of all-missing fields does not.

use serde_json::Value;

use gramflow_common::pluck;

fn any_present(fields: &[Option<&Value>]) -> bool {
    fields.iter().any(Option::is_some)
}

/// Account snapshot fact: followers/follows counts, business flag, category,
/// biography.
pub fn snapshot_fact_present(account: &Value) -> bool {
    any_present(&[
        pluck(account, &["followers_count"]),
        pluck(account, &["follows_count"]),
        pluck(account, &["is_business"]),
        pluck(account, &["category"]),
        pluck(account, &["biography"]),
    ])
}

/// Post metrics fact: comment/like counts and video view/play counts.
pub fn post_metrics_present(post: &Value) -> bool {
    any_present(&[
        pluck(post, &["commentsCount"]),
        pluck(post, &["likesCount"]),
        pluck(post, &["video", "viewCount"]),
        pluck(post, &["video", "playCount"]),
    ])
}

/// Comment metrics fact: text, owner picture URL, replies/likes counts.
pub fn comment_metrics_present(comment: &Value) -> bool {
    any_present(&[
        pluck(comment, &["text"]),
        pluck(comment, &["ownerProfilePicUrl"]),
        pluck(comment, &["repliesCount"]),
        pluck(comment, &["likesCount"]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn all_null_fields_suppress_the_fact() {
        let account = json!({
            "name": "someone",
            "followers_count": null,
            "follows_count": null,
            "is_business": null,
            "category": null,
            "biography": null,
        });
        assert!(!snapshot_fact_present(&account));
    }

    #[test]
    fn missing_fields_count_as_null() {
        assert!(!snapshot_fact_present(&json!({"name": "someone"})));
    }

    #[test]
    fn a_single_populated_field_is_enough() {
        assert!(snapshot_fact_present(&json!({"biography": "hello"})));
        assert!(snapshot_fact_present(&json!({"followers_count": 0})));
    }

    #[test]
    fn post_metrics_look_inside_the_video_object() {
        assert!(!post_metrics_present(&json!({"caption": "x"})));
        assert!(post_metrics_present(&json!({"video": {"viewCount": 3}})));
        assert!(!post_metrics_present(&json!({"video": {"url": "v.mp4"}})));
    }

    #[test]
    fn comment_metrics_ignore_unrelated_fields() {
        assert!(!comment_metrics_present(&json!({"ownerUsername": "a"})));
        assert!(comment_metrics_present(&json!({"likesCount": 1})));
    }
}
