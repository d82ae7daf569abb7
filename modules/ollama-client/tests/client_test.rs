//! Inference client behavior against a mock HTTP server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ollama_client::OllamaClient;

#[tokio::test]
async fn successful_generation_returns_the_parsed_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "format": "json",
            "stream": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"sentiment_label\": \"positive\", \"sentiment_score\": 0.9}",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3");
    let result = client.generate_json("analyze this", 3).await.unwrap();

    assert_eq!(result["sentiment_label"], json!("positive"));
    assert_eq!(result["sentiment_score"], json!(0.9));
}

#[tokio::test]
async fn fenced_response_text_is_unwrapped_before_parsing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "```json\n{\"content_topic\": \"sales\"}\n```",
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3");
    let result = client.generate_json("analyze this", 3).await.unwrap();

    assert_eq!(result["content_topic"], json!("sales"));
}

#[tokio::test]
async fn three_server_errors_exhaust_retries_and_yield_absence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .expect(3)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3");
    assert!(client.generate_json("analyze this", 3).await.is_none());
}

#[tokio::test]
async fn transport_failure_yields_absence_not_an_error() {
    // Nothing is listening here.
    let client = OllamaClient::new("http://127.0.0.1:9", "llama3");
    assert!(client.generate_json("analyze this", 3).await.is_none());
}

#[tokio::test]
async fn an_error_followed_by_success_recovers_within_the_bound() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "{\"intent\": \"praise\"}",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3");
    let result = client.generate_json("analyze this", 3).await.unwrap();

    assert_eq!(result["intent"], json!("praise"));
}

#[tokio::test]
async fn unparseable_response_text_burns_attempts_until_absence() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "I'm sorry, I can't produce JSON today.",
        })))
        .expect(3)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "llama3");
    assert!(client.generate_json("analyze this", 3).await.is_none());
}
