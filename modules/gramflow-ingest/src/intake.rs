//! Batch intake: CSV of account names to stored snapshot batches.
//!
//! The file lists one account per line under an `account` header. Accounts
//! are scraped in chunks of 10 with at most 5 fetches in flight; a failed
//! scrape drops that account from the chunk and the rest carries on. Each
//! chunk lands in object storage and is announced on the batch topic for the
//! loader stage.

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use anyhow::Result;

use gramflow_common::events::{AccountBatchStored, EventPublisher, TOPIC_ACCOUNT_BATCH_STORED};
use gramflow_common::GramflowError;

use crate::mapping::{map_account_detail, map_post};
use crate::traits::{AccountScraper, ObjectStore};

const CHUNK_SIZE: usize = 10;
const SCRAPE_CONCURRENCY: usize = 5;

pub struct BatchIntake {
    scraper: Arc<dyn AccountScraper>,
    store: Arc<dyn ObjectStore>,
    publisher: Arc<dyn EventPublisher>,
    bucket: String,
}

impl BatchIntake {
    pub fn new(
        scraper: Arc<dyn AccountScraper>,
        store: Arc<dyn ObjectStore>,
        publisher: Arc<dyn EventPublisher>,
        bucket: &str,
    ) -> Self {
        Self {
            scraper,
            store,
            publisher,
            bucket: bucket.to_string(),
        }
    }

    /// Process one uploaded CSV. Malformed input (bad encoding or header) is
    /// logged and skipped without surfacing an error; storage and publish
    /// failures propagate.
    pub async fn run(&self, file_content: &[u8]) -> Result<()> {
        let text = match std::str::from_utf8(file_content) {
            Ok(text) => text,
            Err(err) => {
                error!(error = %err, "Batch file is not valid UTF-8; skipping");
                return Ok(());
            }
        };

        let mut lines: Vec<&str> = text.lines().collect();
        if lines.first().map(|line| line.trim()) != Some("account") {
            error!("Batch file has an invalid header; skipping");
            return Ok(());
        }
        lines.remove(0);

        let semaphore = Arc::new(Semaphore::new(SCRAPE_CONCURRENCY));
        let mut pointer = 0;

        while pointer < lines.len() {
            let chunk = &lines[pointer..(pointer + CHUNK_SIZE).min(lines.len())];

            let fetches = chunk.iter().map(|name| {
                let name = name.trim().to_string();
                let semaphore = Arc::clone(&semaphore);
                async move {
                    let _permit = semaphore.acquire().await?;
                    self.fetch_account(&name).await
                }
            });
            let results = join_all(fetches).await;

            pointer += CHUNK_SIZE;

            let valid: Vec<Value> = results
                .into_iter()
                .filter_map(|result| match result {
                    Ok(record) => Some(record),
                    Err(err) => {
                        warn!(error = %err, "Account scrape failed; excluded from batch");
                        None
                    }
                })
                .collect();

            let object_name = format!("instagram_account_batch({pointer})");
            let saved_path = self
                .store
                .put(&self.bucket, &object_name, serde_json::to_vec(&valid)?)
                .await?;

            info!(path = %saved_path, accounts = valid.len(), "Batch chunk stored");

            self.publisher
                .publish(
                    TOPIC_ACCOUNT_BATCH_STORED,
                    serde_json::to_value(AccountBatchStored {
                        bucket_path: saved_path,
                    })?,
                )
                .await?;
        }

        Ok(())
    }

    /// Scrape one account and assemble its `{account, posts}` wire record.
    async fn fetch_account(&self, account_name: &str) -> Result<Value> {
        let details = self.scraper.account_details(account_name).await?;
        let posts = self.scraper.account_posts(account_name).await?;

        let detail = details.first().ok_or_else(|| {
            GramflowError::Scraping(format!("no account details returned for {account_name}"))
        })?;

        Ok(serde_json::json!({
            "account": map_account_detail(detail),
            "posts": posts.iter().map(map_post).collect::<Vec<Value>>(),
        }))
    }
}
