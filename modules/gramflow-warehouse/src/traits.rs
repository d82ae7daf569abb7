//! Warehouse seams.
//!
//! `WarehouseWriter` has one typed insert per table. Inserts either commit
//! or error; there is no internal retry, and the ingest layer treats a
//! failure as fatal for the account being traversed.
//!
//! `EnrichmentStore` is the read/write contract of the enrichment pass:
//! fetch rows lacking their sentinel annotation column, write validated
//! annotations back by surrogate key.
//!
//! Both enable deterministic testing against `MemoryWarehouse`: no BigQuery,
//! no credentials, `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::rows::{
    CommentEnrichment, DimDate, DimInstagramAccount, DimInstagramComment, DimInstagramPost,
    FactInstagramAccountSnapshot, FactInstagramCommentMetrics, FactInstagramPostMetrics,
    PostEnrichment,
};

#[async_trait]
pub trait WarehouseWriter: Send + Sync {
    async fn insert_account(&self, row: DimInstagramAccount) -> Result<()>;
    async fn insert_account_snapshot(&self, row: FactInstagramAccountSnapshot) -> Result<()>;
    async fn insert_date(&self, row: DimDate) -> Result<()>;
    async fn insert_post(&self, row: DimInstagramPost) -> Result<()>;
    async fn insert_post_metrics(&self, row: FactInstagramPostMetrics) -> Result<()>;
    async fn insert_comment(&self, row: DimInstagramComment) -> Result<()>;
    async fn insert_comment_metrics(&self, row: FactInstagramCommentMetrics) -> Result<()>;
}

/// A row waiting for enrichment: its surrogate key plus the text to analyze
/// (comment text or post caption).
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRow {
    pub row_sk: Uuid,
    pub text: String,
}

#[async_trait]
pub trait EnrichmentStore: Send + Sync {
    /// Comment-metrics rows for the account with non-empty text and no
    /// sentiment label yet.
    async fn fetch_unenriched_comments(
        &self,
        account_sk: Uuid,
        limit: usize,
    ) -> Result<Vec<PendingRow>>;

    /// Post rows for the account with a non-empty caption and no content
    /// topic yet.
    async fn fetch_unenriched_posts(&self, account_sk: Uuid, limit: usize)
        -> Result<Vec<PendingRow>>;

    /// Blocks until applied; errors propagate to the caller.
    async fn update_comment_enrichment(
        &self,
        comment_sk: Uuid,
        enrichment: CommentEnrichment,
    ) -> Result<()>;

    /// Blocks until applied; errors propagate to the caller.
    async fn update_post_enrichment(&self, post_sk: Uuid, enrichment: PostEnrichment)
        -> Result<()>;
}
