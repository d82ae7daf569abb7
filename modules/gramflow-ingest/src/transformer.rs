//! Ingest transformer: raw account/post/comment snapshots to warehouse rows.
//!
//! Traversal is sequential per account: account dimension, optional snapshot
//! fact, then each post (date row, post dimension, optional metrics fact)
//! and its comments. Warehouse-write failures propagate immediately: the
//! rest of the batch is not attempted and already-committed rows stay put.
//! After an account completes, a completion event hands it to the
//! enrichment stage.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use gramflow_common::events::{AccountLoaded, EventPublisher, TOPIC_ACCOUNT_LOADED};
use gramflow_common::{
    pluck, pluck_bool, pluck_f64, pluck_i64, pluck_str, pluck_string_list, GramflowError,
};
use gramflow_warehouse::{
    DimInstagramAccount, DimInstagramComment, DimInstagramPost, FactInstagramAccountSnapshot,
    FactInstagramCommentMetrics, FactInstagramPostMetrics, WarehouseWriter,
};

use crate::dates::mint_date_row;
use crate::presence::{comment_metrics_present, post_metrics_present, snapshot_fact_present};

pub struct IngestTransformer {
    warehouse: Arc<dyn WarehouseWriter>,
    publisher: Arc<dyn EventPublisher>,
}

impl IngestTransformer {
    pub fn new(warehouse: Arc<dyn WarehouseWriter>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            warehouse,
            publisher,
        }
    }

    /// Load one raw batch blob: a JSON array of `{account, posts}` records.
    pub async fn run(&self, raw: &[u8]) -> Result<()> {
        let records: Vec<Value> = serde_json::from_slice(raw)
            .map_err(|err| GramflowError::Ingest(format!("batch blob is not a JSON array: {err}")))?;

        info!(accounts = records.len(), "Loading raw account batch");

        for record in &records {
            self.process_record(record).await?;
        }

        Ok(())
    }

    async fn process_record(&self, record: &Value) -> Result<()> {
        let account = pluck(record, &["account"]).unwrap_or(&Value::Null);
        let account_sk = Uuid::new_v4();

        self.warehouse
            .insert_account(DimInstagramAccount {
                account_sk,
                name: pluck_str(account, &["name"]).map(String::from),
                nickname: pluck_str(account, &["nick_name"]).map(String::from),
                url: pluck_str(account, &["url"]).map(String::from),
            })
            .await?;

        if snapshot_fact_present(account) {
            self.warehouse
                .insert_account_snapshot(FactInstagramAccountSnapshot {
                    account_sk,
                    followers_count: pluck_i64(account, &["followers_count"]).unwrap_or(0),
                    follows_count: pluck_i64(account, &["follows_count"]).unwrap_or(0),
                    is_business: pluck_bool(account, &["is_business"]).unwrap_or(false),
                    category: pluck_str(account, &["category"]).map(String::from),
                    biography: pluck_str(account, &["biography"]).map(String::from),
                })
                .await?;
        }

        if let Some(posts) = pluck(record, &["posts"]).and_then(Value::as_array) {
            for post in posts {
                self.process_post(account_sk, post).await?;
            }
        }

        self.publisher
            .publish(
                TOPIC_ACCOUNT_LOADED,
                serde_json::to_value(AccountLoaded { account_sk })?,
            )
            .await?;

        info!(%account_sk, "Account loaded");
        Ok(())
    }

    async fn process_post(&self, account_sk: Uuid, post: &Value) -> Result<()> {
        // A date key is allocated either way; without a parseable timestamp
        // no date row is persisted and the key dangles. Known quirk, kept.
        let date_sk = match pluck_str(post, &["timestamp"]) {
            Some(ts) => match mint_date_row(ts) {
                Ok(row) => {
                    let date_sk = row.date_sk;
                    self.warehouse.insert_date(row).await?;
                    date_sk
                }
                Err(err) => {
                    warn!(timestamp = ts, error = %err, "Unparseable post timestamp; date key left dangling");
                    Uuid::new_v4()
                }
            },
            None => {
                warn!("Post has no timestamp; date key left dangling");
                Uuid::new_v4()
            }
        };

        let post_sk = Uuid::new_v4();
        self.warehouse
            .insert_post(DimInstagramPost {
                post_sk,
                account_sk,
                date_sk,
                external_code: pluck_str(post, &["shortCode"]).map(String::from),
                caption: pluck_str(post, &["caption"]).map(String::from),
                hash_tags: pluck_string_list(post, &["hashtags"]),
                audio_url: pluck_str(post, &["audioUrl"]).map(String::from),
                music_name: pluck_str(post, &["musicInfo", "songName"]).map(String::from),
                owner_music_name: pluck_str(post, &["musicInfo", "artistName"]).map(String::from),
                video_url: pluck_str(post, &["video", "url"]).map(String::from),
                video_duration: pluck_f64(post, &["video", "duration"]),
                dim_height: pluck_i64(post, &["dimensions", "height"]),
                dim_width: pluck_i64(post, &["dimensions", "width"]),
                location: pluck_str(post, &["locationName"]).map(String::from),
                enrichment_content_topic: None,
                enrichment_tone: None,
                enrichment_call_to_action_type: None,
            })
            .await?;

        if post_metrics_present(post) {
            self.warehouse
                .insert_post_metrics(FactInstagramPostMetrics {
                    account_sk,
                    post_sk,
                    date_sk,
                    comments_count: pluck_i64(post, &["commentsCount"]).unwrap_or(0),
                    likes_count: pluck_i64(post, &["likesCount"]).unwrap_or(0),
                    video_view_count: pluck_i64(post, &["video", "viewCount"]).unwrap_or(0),
                    video_play_count: pluck_i64(post, &["video", "playCount"]).unwrap_or(0),
                    // Schema columns not sourced from raw input.
                    video_url: None,
                    video_duration: None,
                    dim_height: None,
                    dim_width: None,
                    location: None,
                })
                .await?;
        }

        if let Some(comments) = pluck(post, &["latest_comments"]).and_then(Value::as_array) {
            for comment in comments {
                self.process_comment(account_sk, post_sk, date_sk, comment)
                    .await?;
            }
        }

        Ok(())
    }

    async fn process_comment(
        &self,
        account_sk: Uuid,
        post_sk: Uuid,
        post_date_sk: Uuid,
        comment: &Value,
    ) -> Result<()> {
        // Own date row when the comment timestamp parses; otherwise exactly
        // the parent post's key.
        let date_sk = match pluck_str(comment, &["timestamp"]).map(mint_date_row) {
            Some(Ok(row)) => {
                let date_sk = row.date_sk;
                self.warehouse.insert_date(row).await?;
                date_sk
            }
            Some(Err(err)) => {
                warn!(error = %err, "Unparseable comment timestamp; reusing post date key");
                post_date_sk
            }
            None => post_date_sk,
        };

        let comment_sk = Uuid::new_v4();
        self.warehouse
            .insert_comment(DimInstagramComment {
                comment_sk,
                post_sk,
                account_sk,
                owner_username: pluck_str(comment, &["ownerUsername"]).map(String::from),
                date_sk,
            })
            .await?;

        if comment_metrics_present(comment) {
            self.warehouse
                .insert_comment_metrics(FactInstagramCommentMetrics {
                    account_sk,
                    post_sk,
                    comment_sk,
                    date_sk,
                    text: pluck_str(comment, &["text"]).map(String::from),
                    owner_pic_url: pluck_str(comment, &["ownerProfilePicUrl"]).map(String::from),
                    replies_count: pluck_i64(comment, &["repliesCount"]).unwrap_or(0),
                    likes_count: pluck_i64(comment, &["likesCount"]).unwrap_or(0),
                    enrichment_sentiment_label: None,
                    enrichment_sentiment_score: None,
                    enrichment_intent: None,
                    enrichment_keywords: None,
                })
                .await?;
        }

        Ok(())
    }
}
