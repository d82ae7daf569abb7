use thiserror::Error;

#[derive(Error, Debug)]
pub enum GramflowError {
    #[error("Warehouse error: {0}")]
    Warehouse(String),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Object storage error: {0}")]
    Storage(String),

    #[error("Messaging error: {0}")]
    Messaging(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
