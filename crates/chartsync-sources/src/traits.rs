use async_trait::async_trait;
use chartsync_models::{Account, CatalogCandidate, ListSpec, ListSummary, MediaType, TokenPair};

use crate::error::SourceError;
use crate::trakt::api::ItemsPayload;

/// Result of probing the catalog's identity endpoint with a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityStatus {
    Valid,
    Unauthorized,
    Other(u16),
}

/// Outcome of a single remote write attempt, as seen by the retry executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// The remote acknowledged the write (200/201).
    Created,
    /// Nothing to write; no network call was made.
    NoOp,
    /// The remote refused the write with this status.
    Rejected(u16),
}

/// The catalog service seam. Every call takes the acting account
/// explicitly; there is no default-credential fallback.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn check_identity(&self, account: &Account) -> Result<IdentityStatus, SourceError>;

    async fn exchange_refresh_token(&self, account: &Account) -> Result<TokenPair, SourceError>;

    async fn user_lists(&self, account: &Account) -> Result<Vec<ListSummary>, SourceError>;

    async fn create_list(
        &self,
        account: &Account,
        spec: &ListSpec,
    ) -> Result<WriteStatus, SourceError>;

    async fn delete_list(&self, account: &Account, slug: &str) -> Result<(), SourceError>;

    async fn list_items(&self, account: &Account, slug: &str)
        -> Result<ItemsPayload, SourceError>;

    async fn remove_items(
        &self,
        account: &Account,
        slug: &str,
        items: &ItemsPayload,
    ) -> Result<(), SourceError>;

    async fn add_items(
        &self,
        account: &Account,
        slug: &str,
        items: &ItemsPayload,
    ) -> Result<WriteStatus, SourceError>;

    /// Free-text search, optionally scoped to one media type, with
    /// extended metadata so results carry slugs.
    async fn search(
        &self,
        account: &Account,
        query: &str,
        scope: Option<MediaType>,
    ) -> Result<Vec<CatalogCandidate>, SourceError>;
}

/// Fetches one chart page as raw markup.
#[async_trait]
pub trait ChartFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}
