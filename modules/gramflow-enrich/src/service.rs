//! Enrichment orchestrator.
//!
//! Pulls rows that still lack their annotation, enriches them in batches
//! (batch after batch in strict sequence, every item inside a batch
//! concurrently), and writes validated annotations back. Per-item outcomes
//! are explicit: a failed item is counted and logged, never allowed to
//! abort its siblings or cross the batch boundary as an error.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use gramflow_warehouse::{EnrichmentStore, PendingRow};
use ollama_client::OllamaClient;

use crate::validate;

pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_ROW_LIMIT: usize = 100;

/// Inference seam. `None` means the text could not be enriched after the
/// client's own retries; the orchestrator records it as a failure.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich_comment(&self, text: &str) -> Option<Value>;
    async fn enrich_post(&self, caption: &str) -> Option<Value>;
}

#[async_trait]
impl Enricher for OllamaClient {
    async fn enrich_comment(&self, text: &str) -> Option<Value> {
        OllamaClient::enrich_comment(self, text).await
    }

    async fn enrich_post(&self, caption: &str) -> Option<Value> {
        OllamaClient::enrich_post(self, caption).await
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub processed: usize,
    pub failed: usize,
    pub total: usize,
}

enum ItemOutcome {
    Processed,
    Failed,
}

pub struct EnrichmentService {
    store: Arc<dyn EnrichmentStore>,
    enricher: Arc<dyn Enricher>,
    batch_size: usize,
}

impl EnrichmentService {
    pub fn new(store: Arc<dyn EnrichmentStore>, enricher: Arc<dyn Enricher>) -> Self {
        Self {
            store,
            enricher,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Enrich both streams for an account, concurrently, logging per-stream
    /// outcomes. Entry point for the account-loaded event.
    pub async fn enrich_account(&self, account_sk: Uuid) {
        info!(%account_sk, "Starting enrichment");

        let (comments, posts) = tokio::join!(
            self.process_comments(account_sk, DEFAULT_ROW_LIMIT),
            self.process_posts(account_sk, DEFAULT_ROW_LIMIT),
        );

        match comments {
            Ok(stats) => info!(
                %account_sk,
                processed = stats.processed,
                failed = stats.failed,
                total = stats.total,
                "Comment enrichment finished"
            ),
            Err(err) => error!(%account_sk, error = %err, "Comment enrichment errored"),
        }
        match posts {
            Ok(stats) => info!(
                %account_sk,
                processed = stats.processed,
                failed = stats.failed,
                total = stats.total,
                "Post enrichment finished"
            ),
            Err(err) => error!(%account_sk, error = %err, "Post enrichment errored"),
        }
    }

    /// Enrich up to `limit` comment-metrics rows lacking a sentiment label.
    pub async fn process_comments(
        &self,
        account_sk: Uuid,
        limit: usize,
    ) -> Result<EnrichmentStats> {
        let pending = self
            .store
            .fetch_unenriched_comments(account_sk, limit)
            .await?;
        if pending.is_empty() {
            info!(%account_sk, "No comments to enrich");
            return Ok(EnrichmentStats::default());
        }

        info!(%account_sk, count = pending.len(), "Enriching comments");

        let mut stats = EnrichmentStats {
            total: pending.len(),
            ..Default::default()
        };
        for (index, batch) in pending.chunks(self.batch_size).enumerate() {
            info!(batch = index + 1, size = batch.len(), "Processing comment batch");
            let outcomes = join_all(batch.iter().map(|row| self.enrich_one_comment(row))).await;
            tally(&mut stats, outcomes);
        }

        Ok(stats)
    }

    /// Enrich up to `limit` post rows lacking a content topic.
    pub async fn process_posts(&self, account_sk: Uuid, limit: usize) -> Result<EnrichmentStats> {
        let pending = self.store.fetch_unenriched_posts(account_sk, limit).await?;
        if pending.is_empty() {
            info!(%account_sk, "No posts to enrich");
            return Ok(EnrichmentStats::default());
        }

        info!(%account_sk, count = pending.len(), "Enriching posts");

        let mut stats = EnrichmentStats {
            total: pending.len(),
            ..Default::default()
        };
        for (index, batch) in pending.chunks(self.batch_size).enumerate() {
            info!(batch = index + 1, size = batch.len(), "Processing post batch");
            let outcomes = join_all(batch.iter().map(|row| self.enrich_one_post(row))).await;
            tally(&mut stats, outcomes);
        }

        Ok(stats)
    }

    async fn enrich_one_comment(&self, row: &PendingRow) -> ItemOutcome {
        let Some(enrichment) = usable_object(self.enricher.enrich_comment(&row.text).await) else {
            warn!(comment_sk = %row.row_sk, "Could not enrich comment");
            return ItemOutcome::Failed;
        };

        let validated = validate::comment_enrichment(&enrichment);
        match self
            .store
            .update_comment_enrichment(row.row_sk, validated)
            .await
        {
            Ok(()) => ItemOutcome::Processed,
            Err(err) => {
                error!(comment_sk = %row.row_sk, error = %err, "Failed to write comment enrichment");
                ItemOutcome::Failed
            }
        }
    }

    async fn enrich_one_post(&self, row: &PendingRow) -> ItemOutcome {
        let Some(enrichment) = usable_object(self.enricher.enrich_post(&row.text).await) else {
            warn!(post_sk = %row.row_sk, "Could not enrich post");
            return ItemOutcome::Failed;
        };

        let validated = validate::post_enrichment(&enrichment);
        match self.store.update_post_enrichment(row.row_sk, validated).await {
            Ok(()) => ItemOutcome::Processed,
            Err(err) => {
                error!(post_sk = %row.row_sk, error = %err, "Failed to write post enrichment");
                ItemOutcome::Failed
            }
        }
    }
}

/// An enrichment result is only usable when it is a non-empty JSON object.
fn usable_object(result: Option<Value>) -> Option<Value> {
    result.filter(|value| value.as_object().is_some_and(|obj| !obj.is_empty()))
}

fn tally(stats: &mut EnrichmentStats, outcomes: Vec<ItemOutcome>) {
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Processed => stats.processed += 1,
            ItemOutcome::Failed => stats.failed += 1,
        }
    }
}
