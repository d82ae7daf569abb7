use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Object storage
    pub bucket_instagram: String,

    // Scraping
    pub apify_token: String,
    pub actor_instagram: String,

    // Messaging
    pub kafka_cluster_host: String,

    // Warehouse
    pub gcp_project_id: String,

    // Inference
    pub ollama_base_url: String,
    pub ollama_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            bucket_instagram: required_env("BUCKET_INSTAGRAM"),
            apify_token: required_env("APIFY_TOKEN"),
            actor_instagram: required_env("ACTOR_INSTAGRAM"),
            kafka_cluster_host: required_env("KAFKA_CLUSTER_HOST"),
            gcp_project_id: required_env("GCP_PROJECT_ID"),
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
        }
    }

    /// Load a minimal config for the enriching consumer (no scraping or
    /// object-storage credentials needed).
    pub fn enrich_from_env() -> Self {
        Self {
            bucket_instagram: String::new(),
            apify_token: String::new(),
            actor_instagram: String::new(),
            kafka_cluster_host: required_env("KAFKA_CLUSTER_HOST"),
            gcp_project_id: required_env("GCP_PROJECT_ID"),
            ollama_base_url: env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
