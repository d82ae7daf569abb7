//! Deterministic fakes for orchestrator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use uuid::Uuid;

use gramflow_warehouse::{CommentEnrichment, EnrichmentStore, PendingRow, PostEnrichment};

use crate::service::Enricher;

/// Enricher with canned responses, plus in-flight tracking so tests can
/// observe intra-batch concurrency and inter-batch sequencing.
#[derive(Default)]
pub struct ScriptedEnricher {
    overrides: Mutex<HashMap<String, Option<Value>>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedEnricher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to this exact text with the given result (use `None` for an
    /// exhausted-retries absence).
    pub fn with_response(self, text: &str, response: Option<Value>) -> Self {
        self.overrides
            .lock()
            .unwrap()
            .insert(text.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of enrichments observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, text: &str, default: Value) -> Option<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        // Let sibling futures start so the high-water mark is meaningful.
        tokio::time::sleep(Duration::from_millis(10)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.overrides.lock().unwrap().get(text) {
            Some(scripted) => scripted.clone(),
            None => Some(default),
        }
    }
}

#[async_trait]
impl Enricher for ScriptedEnricher {
    async fn enrich_comment(&self, text: &str) -> Option<Value> {
        self.respond(
            text,
            json!({
                "sentiment_label": "positive",
                "sentiment_score": 0.5,
                "intent": "praise",
                "keywords": ["service"],
            }),
        )
        .await
    }

    async fn enrich_post(&self, caption: &str) -> Option<Value> {
        self.respond(
            caption,
            json!({
                "content_topic": "sales",
                "tone": "upbeat",
                "call_to_action_type": "link_bio",
            }),
        )
        .await
    }
}

/// Store that serves pending rows but rejects every write-back.
pub struct WriteFailingStore {
    pending: Vec<PendingRow>,
}

impl WriteFailingStore {
    pub fn new(pending: Vec<PendingRow>) -> Self {
        Self { pending }
    }
}

#[async_trait]
impl EnrichmentStore for WriteFailingStore {
    async fn fetch_unenriched_comments(
        &self,
        _account_sk: Uuid,
        limit: usize,
    ) -> Result<Vec<PendingRow>> {
        Ok(self.pending.iter().take(limit).cloned().collect())
    }

    async fn fetch_unenriched_posts(
        &self,
        _account_sk: Uuid,
        limit: usize,
    ) -> Result<Vec<PendingRow>> {
        Ok(self.pending.iter().take(limit).cloned().collect())
    }

    async fn update_comment_enrichment(
        &self,
        comment_sk: Uuid,
        _enrichment: CommentEnrichment,
    ) -> Result<()> {
        bail!("injected update failure for comment {comment_sk}")
    }

    async fn update_post_enrichment(
        &self,
        post_sk: Uuid,
        _enrichment: PostEnrichment,
    ) -> Result<()> {
        bail!("injected update failure for post {post_sk}")
    }
}
