//! Trait abstractions for intake collaborators.
//!
//! The real implementations (Apify actor runs, GCS buckets) live outside
//! this workspace; `testing` provides deterministic fakes so the intake
//! pipeline runs with no network and no cloud credentials.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Social-media scraping seam. Both calls return raw scraper items in
/// whatever shape the upstream actor produces; `mapping` reduces them to the
/// ingest wire format.
#[async_trait]
pub trait AccountScraper: Send + Sync {
    /// Profile-level details for an account. Usually a single item.
    async fn account_details(&self, account_name: &str) -> Result<Vec<Value>>;

    /// Recent posts with their latest comments.
    async fn account_posts(&self, account_name: &str) -> Result<Vec<Value>>;
}

/// Object-storage seam. Returns the saved path (`bucket/object`) that gets
/// published to the loader stage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, bucket: &str, object_name: &str, bytes: Vec<u8>) -> Result<String>;
}
