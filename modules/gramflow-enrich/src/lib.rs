pub mod service;
pub mod testing;
pub mod validate;

pub use service::{EnrichmentService, EnrichmentStats, Enricher, DEFAULT_ROW_LIMIT};
