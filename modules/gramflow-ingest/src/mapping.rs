//! Raw scraper items to the ingest wire shape.
//!
//! The upstream actor returns flat camelCase fields with gaps anywhere;
//! every read goes through the null-safe accessor so a missing field lands
//! as an explicit null in the mapped record.

use serde_json::{json, Value};

use gramflow_common::pluck;

fn field(value: &Value, path: &[&str]) -> Value {
    pluck(value, path).cloned().unwrap_or(Value::Null)
}

/// Map one raw account-details item to the `account` wire object.
pub fn map_account_detail(account: &Value) -> Value {
    json!({
        "name": field(account, &["username"]),
        "nick_name": field(account, &["fullName"]),
        "url": field(account, &["url"]),
        "followers_count": field(account, &["followersCount"]),
        "follows_count": field(account, &["followsCount"]),
        "is_business": field(account, &["isBusinessAccount"]),
        "category": field(account, &["businessCategoryName"]),
        "biography": field(account, &["biography"]),
    })
}

/// Map one raw post item (with its latest comments) to the post wire object.
pub fn map_post(post: &Value) -> Value {
    let comments: Vec<Value> = pluck(post, &["latestComments"])
        .and_then(Value::as_array)
        .map(|items| items.iter().map(map_comment).collect())
        .unwrap_or_default();

    json!({
        "shortCode": field(post, &["shortCode"]),
        "caption": field(post, &["caption"]),
        "hashtags": field(post, &["hashtags"]),
        "audioUrl": field(post, &["audioUrl"]),
        "musicInfo": {
            "artistName": field(post, &["musicInfo", "artistName"]),
            "songName": field(post, &["musicInfo", "songName"]),
        },
        "commentsCount": field(post, &["commentsCount"]),
        "likesCount": field(post, &["likesCount"]),
        "dimensions": {
            "height": field(post, &["dimensionsHeight"]),
            "width": field(post, &["dimensionsWidth"]),
        },
        "video": {
            "url": field(post, &["videoUrl"]),
            "viewCount": field(post, &["videoViewCount"]),
            "playCount": field(post, &["videoPlayCount"]),
            "duration": field(post, &["videoDuration"]),
        },
        "locationName": field(post, &["locationName"]),
        "timestamp": field(post, &["timestamp"]),
        "latest_comments": comments,
    })
}

fn map_comment(comment: &Value) -> Value {
    json!({
        "text": field(comment, &["text"]),
        "ownerUsername": field(comment, &["ownerUsername"]),
        "ownerProfilePicUrl": field(comment, &["ownerProfilePicUrl"]),
        "repliesCount": field(comment, &["repliesCount"]),
        "likesCount": field(comment, &["likesCount"]),
        "timestamp": field(comment, &["timestamp"]),
    })
}
