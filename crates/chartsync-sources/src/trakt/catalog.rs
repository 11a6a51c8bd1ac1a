use std::time::Duration;

use async_trait::async_trait;
use chartsync_models::{Account, CatalogCandidate, ListSpec, ListSummary, MediaType, TokenPair};
use reqwest::Client;

use crate::error::SourceError;
use crate::traits::{Catalog, IdentityStatus, WriteStatus};
use crate::trakt::{api, auth};

/// Trakt.tv implementation of the catalog seam. Holds only the HTTP
/// client; credentials arrive with every call.
pub struct TraktCatalog {
    client: Client,
}

impl TraktCatalog {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: auth::create_catalog_client(timeout)?,
        })
    }
}

#[async_trait]
impl Catalog for TraktCatalog {
    async fn check_identity(&self, account: &Account) -> Result<IdentityStatus, SourceError> {
        auth::check_identity(&self.client, account).await
    }

    async fn exchange_refresh_token(&self, account: &Account) -> Result<TokenPair, SourceError> {
        auth::exchange_refresh_token(&self.client, account).await
    }

    async fn user_lists(&self, account: &Account) -> Result<Vec<ListSummary>, SourceError> {
        api::user_lists(&self.client, account).await
    }

    async fn create_list(
        &self,
        account: &Account,
        spec: &ListSpec,
    ) -> Result<WriteStatus, SourceError> {
        api::create_list(&self.client, account, spec).await
    }

    async fn delete_list(&self, account: &Account, slug: &str) -> Result<(), SourceError> {
        api::delete_list(&self.client, account, slug).await
    }

    async fn list_items(
        &self,
        account: &Account,
        slug: &str,
    ) -> Result<api::ItemsPayload, SourceError> {
        api::list_items(&self.client, account, slug).await
    }

    async fn remove_items(
        &self,
        account: &Account,
        slug: &str,
        items: &api::ItemsPayload,
    ) -> Result<(), SourceError> {
        api::remove_items(&self.client, account, slug, items).await
    }

    async fn add_items(
        &self,
        account: &Account,
        slug: &str,
        items: &api::ItemsPayload,
    ) -> Result<WriteStatus, SourceError> {
        api::add_items(&self.client, account, slug, items).await
    }

    async fn search(
        &self,
        account: &Account,
        query: &str,
        scope: Option<MediaType>,
    ) -> Result<Vec<CatalogCandidate>, SourceError> {
        api::search(&self.client, account, query, scope).await
    }
}
