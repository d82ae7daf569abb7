//! Deterministic fakes for intake and transformer tests.
//!
//! No network, no queue, no object store. Everything records in memory so
//! tests can assert on exactly what was published and stored.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value;

use gramflow_common::events::EventPublisher;

use crate::traits::{AccountScraper, ObjectStore};

/// Captures published events for assertions.
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<(String, Value)>>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, Value)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Value) -> Result<()> {
        self.events.lock().unwrap().push((topic.to_string(), payload));
        Ok(())
    }
}

/// Stores objects in memory, keyed by `bucket/object`.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> Vec<(String, Vec<u8>)> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, bucket: &str, object_name: &str, bytes: Vec<u8>) -> Result<String> {
        let path = format!("{bucket}/{object_name}");
        self.objects.lock().unwrap().push((path.clone(), bytes));
        Ok(path)
    }
}

/// Serves canned scraper items per account name; unknown accounts and
/// explicitly failing ones error like a dead actor run.
#[derive(Default)]
pub struct StaticScraper {
    accounts: HashMap<String, (Vec<Value>, Vec<Value>)>,
    failing: Vec<String>,
}

impl StaticScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, name: &str, details: Vec<Value>, posts: Vec<Value>) -> Self {
        self.accounts.insert(name.to_string(), (details, posts));
        self
    }

    pub fn with_failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }
}

#[async_trait]
impl AccountScraper for StaticScraper {
    async fn account_details(&self, account_name: &str) -> Result<Vec<Value>> {
        if self.failing.iter().any(|n| n == account_name) {
            bail!("scrape run failed for {account_name}");
        }
        match self.accounts.get(account_name) {
            Some((details, _)) => Ok(details.clone()),
            None => bail!("unknown account {account_name}"),
        }
    }

    async fn account_posts(&self, account_name: &str) -> Result<Vec<Value>> {
        if self.failing.iter().any(|n| n == account_name) {
            bail!("scrape run failed for {account_name}");
        }
        match self.accounts.get(account_name) {
            Some((_, posts)) => Ok(posts.clone()),
            None => bail!("unknown account {account_name}"),
        }
    }
}
