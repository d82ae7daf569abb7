//! Star-schema row types.
//!
//! Field names match the warehouse column names one-to-one; rows serialize
//! straight to the insert payload. Surrogate keys are v4 UUIDs generated at
//! row-creation time and never reused or rewritten. Rows are insert-only,
//! with a single exception: the enrichment columns on posts and
//! comment-metrics, which the enrichment pass fills in later.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Instagram account dimension. One per processed account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimInstagramAccount {
    pub account_sk: Uuid,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub url: Option<String>,
}

/// Account snapshot fact. Zero-or-one per account, emitted only when at
/// least one source field was populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactInstagramAccountSnapshot {
    pub account_sk: Uuid,
    pub followers_count: i64,
    pub follows_count: i64,
    pub is_business: bool,
    pub category: Option<String>,
    pub biography: Option<String>,
}

/// Date dimension. Minted fresh per post (and conditionally per comment);
/// identical calendar dates are never deduplicated across rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimDate {
    pub date_sk: Uuid,
    pub date: String,
    pub day: u32,
    pub month: u32,
    pub year: i32,
    pub weekday: String,
    pub is_weekend: bool,
}

/// Instagram post dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimInstagramPost {
    pub post_sk: Uuid,
    pub account_sk: Uuid,
    pub date_sk: Uuid,
    pub external_code: Option<String>,
    pub caption: Option<String>,
    pub hash_tags: Option<Vec<String>>,
    pub audio_url: Option<String>,
    pub music_name: Option<String>,
    pub owner_music_name: Option<String>,
    pub video_url: Option<String>,
    pub video_duration: Option<f64>,
    pub dim_height: Option<i64>,
    pub dim_width: Option<i64>,
    pub location: Option<String>,
    // Filled by the enrichment pass; null at ingest.
    pub enrichment_content_topic: Option<String>,
    pub enrichment_tone: Option<String>,
    pub enrichment_call_to_action_type: Option<String>,
}

/// Post metrics fact. The non-metric columns exist in the table schema but
/// are never populated from source and stay null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactInstagramPostMetrics {
    pub account_sk: Uuid,
    pub post_sk: Uuid,
    pub date_sk: Uuid,
    pub comments_count: i64,
    pub likes_count: i64,
    pub video_view_count: i64,
    pub video_play_count: i64,
    pub video_url: Option<String>,
    pub video_duration: Option<f64>,
    pub dim_height: Option<i64>,
    pub dim_width: Option<i64>,
    pub location: Option<String>,
}

/// Instagram comment dimension. `date_sk` is either the comment's own freshly
/// minted date key or exactly the parent post's, never a third value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimInstagramComment {
    pub comment_sk: Uuid,
    pub post_sk: Uuid,
    pub account_sk: Uuid,
    pub owner_username: Option<String>,
    pub date_sk: Uuid,
}

/// Comment metrics fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactInstagramCommentMetrics {
    pub account_sk: Uuid,
    pub post_sk: Uuid,
    pub comment_sk: Uuid,
    pub date_sk: Uuid,
    pub text: Option<String>,
    pub owner_pic_url: Option<String>,
    pub replies_count: i64,
    pub likes_count: i64,
    // Filled by the enrichment pass; null at ingest.
    pub enrichment_sentiment_label: Option<String>,
    pub enrichment_sentiment_score: Option<f64>,
    pub enrichment_intent: Option<String>,
    pub enrichment_keywords: Option<Vec<String>>,
}

/// Validated comment annotations written back by the enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentEnrichment {
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub intent: String,
    pub keywords: Vec<String>,
}

/// Validated post annotations written back by the enrichment pass.
/// Tone and call-to-action pass through as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostEnrichment {
    pub content_topic: String,
    pub tone: Option<String>,
    pub call_to_action_type: Option<String>,
}
