//! Batch intake behavior: header validation, chunking, per-account isolation.

use std::sync::Arc;

use serde_json::{json, Value};

use gramflow_common::events::TOPIC_ACCOUNT_BATCH_STORED;
use gramflow_ingest::testing::{MemoryObjectStore, RecordingPublisher, StaticScraper};
use gramflow_ingest::BatchIntake;

fn intake(
    scraper: StaticScraper,
    store: &Arc<MemoryObjectStore>,
    publisher: &Arc<RecordingPublisher>,
) -> BatchIntake {
    BatchIntake::new(Arc::new(scraper), store.clone(), publisher.clone(), "raw-instagram")
}

fn detail(name: &str) -> Value {
    json!({"username": name, "fullName": name.to_uppercase(), "followersCount": 10})
}

#[tokio::test]
async fn invalid_header_skips_the_whole_file_without_error() {
    let store = Arc::new(MemoryObjectStore::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let result = intake(StaticScraper::new(), &store, &publisher)
        .run(b"profile\nacme\n")
        .await;

    assert!(result.is_ok());
    assert!(store.objects().is_empty());
    assert!(publisher.events().is_empty());
}

#[tokio::test]
async fn non_utf8_file_is_skipped_without_error() {
    let store = Arc::new(MemoryObjectStore::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let result = intake(StaticScraper::new(), &store, &publisher)
        .run(&[0xff, 0xfe, 0x00])
        .await;

    assert!(result.is_ok());
    assert!(store.objects().is_empty());
}

#[tokio::test]
async fn twelve_accounts_store_two_chunks_with_one_event_each() {
    let store = Arc::new(MemoryObjectStore::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let mut scraper = StaticScraper::new();
    let mut csv = String::from("account\n");
    for i in 0..12 {
        let name = format!("acct{i}");
        scraper = scraper.with_account(&name, vec![detail(&name)], vec![]);
        csv.push_str(&name);
        csv.push('\n');
    }

    intake(scraper, &store, &publisher)
        .run(csv.as_bytes())
        .await
        .unwrap();

    let objects = store.objects();
    assert_eq!(objects.len(), 2);
    assert_eq!(objects[0].0, "raw-instagram/instagram_account_batch(10)");
    assert_eq!(objects[1].0, "raw-instagram/instagram_account_batch(20)");

    let first: Vec<Value> = serde_json::from_slice(&objects[0].1).unwrap();
    let second: Vec<Value> = serde_json::from_slice(&objects[1].1).unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 2);

    let events = publisher.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(t, _)| t == TOPIC_ACCOUNT_BATCH_STORED));
    assert_eq!(
        events[0].1["bucket_path"],
        json!("raw-instagram/instagram_account_batch(10)")
    );
    assert_eq!(
        events[1].1["bucket_path"],
        json!("raw-instagram/instagram_account_batch(20)")
    );
}

#[tokio::test]
async fn failed_scrape_is_excluded_and_the_chunk_still_lands() {
    let store = Arc::new(MemoryObjectStore::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let scraper = StaticScraper::new()
        .with_account("good1", vec![detail("good1")], vec![])
        .with_failing("broken")
        .with_account("good2", vec![detail("good2")], vec![]);

    intake(scraper, &store, &publisher)
        .run(b"account\ngood1\nbroken\ngood2\n")
        .await
        .unwrap();

    let objects = store.objects();
    assert_eq!(objects.len(), 1);
    let records: Vec<Value> = serde_json::from_slice(&objects[0].1).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["account"]["name"], json!("good1"));
    assert_eq!(records[1]["account"]["name"], json!("good2"));
    assert_eq!(publisher.events().len(), 1);
}

#[tokio::test]
async fn stored_records_carry_the_mapped_wire_shape() {
    let store = Arc::new(MemoryObjectStore::new());
    let publisher = Arc::new(RecordingPublisher::new());

    let post = json!({
        "shortCode": "p1",
        "caption": "hello",
        "videoViewCount": 9,
        "latestComments": [{"text": "hi", "ownerUsername": "fan"}],
    });
    let scraper = StaticScraper::new().with_account("acme", vec![detail("acme")], vec![post]);

    intake(scraper, &store, &publisher)
        .run(b"account\nacme\n")
        .await
        .unwrap();

    let records: Vec<Value> = serde_json::from_slice(&store.objects()[0].1).unwrap();
    let record = &records[0];
    assert_eq!(record["account"]["name"], json!("acme"));
    assert_eq!(record["account"]["nick_name"], json!("ACME"));
    assert_eq!(record["posts"][0]["shortCode"], json!("p1"));
    assert_eq!(record["posts"][0]["video"]["viewCount"], json!(9));
    assert_eq!(record["posts"][0]["video"]["url"], Value::Null);
    assert_eq!(record["posts"][0]["latest_comments"][0]["text"], json!("hi"));
}
