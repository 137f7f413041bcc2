// Service exports
pub mod directory;
pub mod simulated;
pub mod store;

use crate::models::{DetailResult, SearchResultPage};
use async_trait::async_trait;

pub use directory::{DirectoryClient, DirectoryError};
pub use simulated::SimulatedDirectory;
pub use store::{ResultStore, StoreError};

/// Paginated search against the directory
///
/// Implementations contain every transport or API failure and report it as
/// an unsuccessful page with a diagnostic message.
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, keywords: &str, location: &str, offset: u64) -> SearchResultPage;
}

/// Detail fetch for one identifier, with the same containment contract
#[async_trait]
pub trait EnrichmentClient: Send + Sync {
    async fn get_details(&self, identifier: &str) -> DetailResult;
}
