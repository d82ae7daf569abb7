pub mod memory;
pub mod rows;
pub mod traits;

pub use memory::MemoryWarehouse;
pub use rows::{
    CommentEnrichment, DimDate, DimInstagramAccount, DimInstagramComment, DimInstagramPost,
    FactInstagramAccountSnapshot, FactInstagramCommentMetrics, FactInstagramPostMetrics,
    PostEnrichment,
};
pub use traits::{EnrichmentStore, PendingRow, WarehouseWriter};
