//! Orchestrator behavior: batching, isolation, validation, write-back.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use gramflow_enrich::testing::{ScriptedEnricher, WriteFailingStore};
use gramflow_enrich::{EnrichmentService, EnrichmentStats};
use gramflow_warehouse::{
    DimInstagramPost, FactInstagramCommentMetrics, MemoryWarehouse, PendingRow, WarehouseWriter,
};

async fn seed_comments(warehouse: &MemoryWarehouse, account_sk: Uuid, count: usize) {
    for i in 0..count {
        warehouse
            .insert_comment_metrics(FactInstagramCommentMetrics {
                account_sk,
                post_sk: Uuid::new_v4(),
                comment_sk: Uuid::new_v4(),
                date_sk: Uuid::new_v4(),
                text: Some(format!("comment {i}")),
                owner_pic_url: None,
                replies_count: 0,
                likes_count: 0,
                enrichment_sentiment_label: None,
                enrichment_sentiment_score: None,
                enrichment_intent: None,
                enrichment_keywords: None,
            })
            .await
            .unwrap();
    }
}

async fn seed_post(warehouse: &MemoryWarehouse, account_sk: Uuid, caption: &str) -> Uuid {
    let post_sk = Uuid::new_v4();
    warehouse
        .insert_post(DimInstagramPost {
            post_sk,
            account_sk,
            date_sk: Uuid::new_v4(),
            external_code: Some("code".into()),
            caption: Some(caption.to_string()),
            hash_tags: None,
            audio_url: None,
            music_name: None,
            owner_music_name: None,
            video_url: None,
            video_duration: None,
            dim_height: None,
            dim_width: None,
            location: None,
            enrichment_content_topic: None,
            enrichment_tone: None,
            enrichment_call_to_action_type: None,
        })
        .await
        .unwrap();
    post_sk
}

#[tokio::test]
async fn twenty_five_comments_run_as_three_sequential_batches() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    seed_comments(&warehouse, account_sk, 25).await;

    let enricher = Arc::new(ScriptedEnricher::new());
    let service = EnrichmentService::new(warehouse.clone(), enricher.clone());

    let stats = service.process_comments(account_sk, 100).await.unwrap();

    assert_eq!(
        stats,
        EnrichmentStats {
            processed: 25,
            failed: 0,
            total: 25
        }
    );
    assert_eq!(enricher.calls(), 25);
    // Full concurrency inside a batch, never across batches: the high-water
    // mark is exactly one batch of 10, not 25.
    assert_eq!(enricher.max_in_flight(), 10);

    // Nothing left pending.
    let remaining = service.process_comments(account_sk, 100).await.unwrap();
    assert_eq!(remaining.total, 0);
}

#[tokio::test]
async fn no_pending_rows_returns_zero_stats_without_calling_the_model() {
    let warehouse = Arc::new(MemoryWarehouse::new());
    let enricher = Arc::new(ScriptedEnricher::new());
    let service = EnrichmentService::new(warehouse, enricher.clone());

    let stats = service.process_comments(Uuid::new_v4(), 100).await.unwrap();

    assert_eq!(stats, EnrichmentStats::default());
    assert_eq!(enricher.calls(), 0);
}

#[tokio::test]
async fn row_limit_caps_the_fetch() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    seed_comments(&warehouse, account_sk, 5).await;

    let service = EnrichmentService::new(warehouse, Arc::new(ScriptedEnricher::new()));
    let stats = service.process_comments(account_sk, 3).await.unwrap();

    assert_eq!(stats.total, 3);
    assert_eq!(stats.processed, 3);
}

#[tokio::test]
async fn absent_and_empty_enrichments_fail_without_touching_siblings() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    seed_comments(&warehouse, account_sk, 4).await;

    let enricher = Arc::new(
        ScriptedEnricher::new()
            .with_response("comment 1", None)
            .with_response("comment 2", Some(json!({}))),
    );
    let service = EnrichmentService::new(warehouse.clone(), enricher);

    let stats = service.process_comments(account_sk, 100).await.unwrap();

    assert_eq!(
        stats,
        EnrichmentStats {
            processed: 2,
            failed: 2,
            total: 4
        }
    );

    // Only the failed rows stay pending.
    let still_pending = service.process_comments(account_sk, 100).await.unwrap();
    assert_eq!(still_pending.total, 2);
}

#[tokio::test]
async fn write_back_failure_counts_as_failed_not_as_an_error() {
    let pending = vec![
        PendingRow {
            row_sk: Uuid::new_v4(),
            text: "a".into(),
        },
        PendingRow {
            row_sk: Uuid::new_v4(),
            text: "b".into(),
        },
    ];
    let service = EnrichmentService::new(
        Arc::new(WriteFailingStore::new(pending)),
        Arc::new(ScriptedEnricher::new()),
    );

    let stats = service.process_comments(Uuid::new_v4(), 100).await.unwrap();

    assert_eq!(
        stats,
        EnrichmentStats {
            processed: 0,
            failed: 2,
            total: 2
        }
    );
}

#[tokio::test]
async fn comment_annotations_are_validated_before_write_back() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    seed_comments(&warehouse, account_sk, 1).await;

    let enricher = Arc::new(ScriptedEnricher::new().with_response(
        "comment 0",
        Some(json!({
            "sentiment_label": "FURIOUS",
            "sentiment_score": 7.5,
            "intent": "rant",
            "keywords": ["  late delivery ", "", null],
        })),
    ));
    let service = EnrichmentService::new(warehouse.clone(), enricher);

    let stats = service.process_comments(account_sk, 100).await.unwrap();
    assert_eq!(stats.processed, 1);

    let rows = warehouse.comment_metrics().await;
    assert_eq!(rows[0].enrichment_sentiment_label.as_deref(), Some("neutral"));
    assert_eq!(rows[0].enrichment_sentiment_score, Some(1.0));
    assert_eq!(rows[0].enrichment_intent.as_deref(), Some("other"));
    assert_eq!(
        rows[0].enrichment_keywords,
        Some(vec!["late delivery".to_string()])
    );
}

#[tokio::test]
async fn post_stream_annotates_captions() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    let post_sk = seed_post(&warehouse, account_sk, "Big discount today").await;

    let service = EnrichmentService::new(warehouse.clone(), Arc::new(ScriptedEnricher::new()));
    let stats = service.process_posts(account_sk, 100).await.unwrap();

    assert_eq!(stats.processed, 1);

    let posts = warehouse.posts().await;
    let post = posts.iter().find(|p| p.post_sk == post_sk).unwrap();
    assert_eq!(post.enrichment_content_topic.as_deref(), Some("sales"));
    assert_eq!(post.enrichment_tone.as_deref(), Some("upbeat"));
    assert_eq!(
        post.enrichment_call_to_action_type.as_deref(),
        Some("link_bio")
    );

    // Annotated posts drop out of the pending set.
    let remaining = service.process_posts(account_sk, 100).await.unwrap();
    assert_eq!(remaining.total, 0);
}

#[tokio::test]
async fn enrich_account_runs_both_streams() {
    let account_sk = Uuid::new_v4();
    let warehouse = Arc::new(MemoryWarehouse::new());
    seed_comments(&warehouse, account_sk, 2).await;
    seed_post(&warehouse, account_sk, "caption here").await;

    let service = EnrichmentService::new(warehouse.clone(), Arc::new(ScriptedEnricher::new()));
    service.enrich_account(account_sk).await;

    let comments = warehouse.comment_metrics().await;
    assert!(comments
        .iter()
        .all(|c| c.enrichment_sentiment_label.is_some()));
    let posts = warehouse.posts().await;
    assert!(posts.iter().all(|p| p.enrichment_content_topic.is_some()));
}
