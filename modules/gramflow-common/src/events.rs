//! Pipeline events: facts about batches moving between stages.
//!
//! Topic names and payload shapes are wire contract: the intake service
//! publishes them and the loader/enricher consumers subscribe by name.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk of scraped account snapshots was written to object storage.
pub const TOPIC_ACCOUNT_BATCH_STORED: &str = "batch_info_account_instagram";

/// All warehouse rows for one account were loaded; enrichment may start.
pub const TOPIC_ACCOUNT_LOADED: &str = "batch_info_account_instagram_success";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBatchStored {
    pub bucket_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountLoaded {
    pub account_sk: Uuid,
}

/// Message-queue publish seam. The real transport (Kafka) lives outside this
/// workspace; tests use the recording implementation in `gramflow-ingest`.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: serde_json::Value) -> Result<()>;
}
