pub mod dates;
pub mod intake;
pub mod mapping;
pub mod presence;
pub mod testing;
pub mod traits;
pub mod transformer;

pub use intake::BatchIntake;
pub use traits::{AccountScraper, ObjectStore};
pub use transformer::IngestTransformer;
