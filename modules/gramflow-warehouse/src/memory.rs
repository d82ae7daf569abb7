//! In-memory warehouse backend.
//!
//! Implements both warehouse seams over plain Vecs behind a Mutex. Used by
//! the ingest and enrichment tests, and works as a local backend for dev
//! runs without warehouse credentials. Supports fault injection so callers
//! can exercise the write-failure path.

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::rows::{
    CommentEnrichment, DimDate, DimInstagramAccount, DimInstagramComment, DimInstagramPost,
    FactInstagramAccountSnapshot, FactInstagramCommentMetrics, FactInstagramPostMetrics,
    PostEnrichment,
};
use crate::traits::{EnrichmentStore, PendingRow, WarehouseWriter};

#[derive(Default)]
struct Tables {
    accounts: Vec<DimInstagramAccount>,
    account_snapshots: Vec<FactInstagramAccountSnapshot>,
    dates: Vec<DimDate>,
    posts: Vec<DimInstagramPost>,
    post_metrics: Vec<FactInstagramPostMetrics>,
    comments: Vec<DimInstagramComment>,
    comment_metrics: Vec<FactInstagramCommentMetrics>,
    inserts_seen: usize,
}

pub struct MemoryWarehouse {
    tables: Mutex<Tables>,
    /// When set, the Nth insert (1-based) and every one after it fail.
    fail_from_insert: Option<usize>,
}

impl MemoryWarehouse {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_from_insert: None,
        }
    }

    /// A warehouse that accepts `n - 1` inserts and fails from the nth on.
    pub fn failing_from_insert(n: usize) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            fail_from_insert: Some(n),
        }
    }

    fn admit(&self, tables: &mut Tables) -> Result<()> {
        tables.inserts_seen += 1;
        if let Some(n) = self.fail_from_insert {
            if tables.inserts_seen >= n {
                bail!("injected warehouse insert failure (insert #{})", tables.inserts_seen);
            }
        }
        Ok(())
    }

    // --- snapshots for assertions ---

    pub async fn accounts(&self) -> Vec<DimInstagramAccount> {
        self.tables.lock().await.accounts.clone()
    }

    pub async fn account_snapshots(&self) -> Vec<FactInstagramAccountSnapshot> {
        self.tables.lock().await.account_snapshots.clone()
    }

    pub async fn dates(&self) -> Vec<DimDate> {
        self.tables.lock().await.dates.clone()
    }

    pub async fn posts(&self) -> Vec<DimInstagramPost> {
        self.tables.lock().await.posts.clone()
    }

    pub async fn post_metrics(&self) -> Vec<FactInstagramPostMetrics> {
        self.tables.lock().await.post_metrics.clone()
    }

    pub async fn comments(&self) -> Vec<DimInstagramComment> {
        self.tables.lock().await.comments.clone()
    }

    pub async fn comment_metrics(&self) -> Vec<FactInstagramCommentMetrics> {
        self.tables.lock().await.comment_metrics.clone()
    }
}

impl Default for MemoryWarehouse {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WarehouseWriter for MemoryWarehouse {
    async fn insert_account(&self, row: DimInstagramAccount) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.accounts.push(row);
        Ok(())
    }

    async fn insert_account_snapshot(&self, row: FactInstagramAccountSnapshot) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.account_snapshots.push(row);
        Ok(())
    }

    async fn insert_date(&self, row: DimDate) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.dates.push(row);
        Ok(())
    }

    async fn insert_post(&self, row: DimInstagramPost) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.posts.push(row);
        Ok(())
    }

    async fn insert_post_metrics(&self, row: FactInstagramPostMetrics) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.post_metrics.push(row);
        Ok(())
    }

    async fn insert_comment(&self, row: DimInstagramComment) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.comments.push(row);
        Ok(())
    }

    async fn insert_comment_metrics(&self, row: FactInstagramCommentMetrics) -> Result<()> {
        let mut tables = self.tables.lock().await;
        self.admit(&mut tables)?;
        tables.comment_metrics.push(row);
        Ok(())
    }
}

#[async_trait]
impl EnrichmentStore for MemoryWarehouse {
    async fn fetch_unenriched_comments(
        &self,
        account_sk: Uuid,
        limit: usize,
    ) -> Result<Vec<PendingRow>> {
        let tables = self.tables.lock().await;
        let pending: Vec<PendingRow> = tables
            .comment_metrics
            .iter()
            .filter(|row| {
                row.account_sk == account_sk
                    && row.text.as_deref().is_some_and(|t| !t.is_empty())
                    && row.enrichment_sentiment_label.is_none()
            })
            .take(limit)
            .map(|row| PendingRow {
                row_sk: row.comment_sk,
                text: row.text.clone().unwrap_or_default(),
            })
            .collect();
        Ok(pending)
    }

    async fn fetch_unenriched_posts(
        &self,
        account_sk: Uuid,
        limit: usize,
    ) -> Result<Vec<PendingRow>> {
        let tables = self.tables.lock().await;
        let pending: Vec<PendingRow> = tables
            .posts
            .iter()
            .filter(|row| {
                row.account_sk == account_sk
                    && row.caption.as_deref().is_some_and(|c| !c.is_empty())
                    && row.enrichment_content_topic.is_none()
            })
            .take(limit)
            .map(|row| PendingRow {
                row_sk: row.post_sk,
                text: row.caption.clone().unwrap_or_default(),
            })
            .collect();
        Ok(pending)
    }

    async fn update_comment_enrichment(
        &self,
        comment_sk: Uuid,
        enrichment: CommentEnrichment,
    ) -> Result<()> {
        let mut tables = self.tables.lock().await;
        match tables
            .comment_metrics
            .iter_mut()
            .find(|row| row.comment_sk == comment_sk)
        {
            Some(row) => {
                row.enrichment_sentiment_label = Some(enrichment.sentiment_label);
                row.enrichment_sentiment_score = Some(enrichment.sentiment_score);
                row.enrichment_intent = Some(enrichment.intent);
                row.enrichment_keywords = Some(enrichment.keywords);
            }
            // Same as an UPDATE matching zero rows: applied, nothing changed.
            None => tracing::warn!(%comment_sk, "enrichment update matched no comment row"),
        }
        Ok(())
    }

    async fn update_post_enrichment(
        &self,
        post_sk: Uuid,
        enrichment: PostEnrichment,
    ) -> Result<()> {
        let mut tables = self.tables.lock().await;
        match tables.posts.iter_mut().find(|row| row.post_sk == post_sk) {
            Some(row) => {
                row.enrichment_content_topic = Some(enrichment.content_topic);
                row.enrichment_tone = enrichment.tone;
                row.enrichment_call_to_action_type = enrichment.call_to_action_type;
            }
            None => tracing::warn!(%post_sk, "enrichment update matched no post row"),
        }
        Ok(())
    }
}
