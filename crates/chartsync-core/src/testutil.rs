use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chartsync_models::{
    Account, AccountName, CatalogCandidate, ListSpec, ListSummary, MediaType, TokenPair,
};
use chartsync_sources::{
    Catalog, ChartFetcher, IdentityStatus, ItemsPayload, SourceError, WriteStatus,
};

pub(crate) fn account(name: AccountName, access_token: &str) -> Account {
    Account {
        name,
        client_id: format!("{}-client", name),
        client_secret: format!("{}-secret", name),
        access_token: access_token.to_string(),
        refresh_token: format!("{}-refresh", name),
    }
}

pub(crate) fn candidate(
    media_type: MediaType,
    trakt_id: u64,
    title: &str,
    slug: &str,
) -> CatalogCandidate {
    CatalogCandidate {
        media_type,
        trakt_id,
        title: title.to_string(),
        slug: slug.to_string(),
    }
}

#[derive(Default)]
pub(crate) struct MockState {
    /// Scripted identity probe responses per account, drained front-first;
    /// Valid once exhausted.
    pub identity_responses: HashMap<AccountName, Vec<IdentityStatus>>,
    /// Some(pair) succeeds the exchange, None fails it.
    pub refresh_results: HashMap<AccountName, Option<TokenPair>>,
    pub user_lists_results: HashMap<AccountName, Vec<ListSummary>>,
    pub search_results: HashMap<String, Vec<CatalogCandidate>>,
    pub search_fails: bool,
    /// Remote list contents by slug.
    pub lists: HashMap<String, ItemsPayload>,
    pub add_rejects_with: Option<u16>,
    pub remove_fails: bool,
    pub calls: Vec<String>,
    pub tokens_seen: Vec<String>,
}

impl MockState {
    pub fn seed_list(&mut self, slug: &str, items: ItemsPayload) {
        self.lists.insert(slug.to_string(), items);
    }
}

#[derive(Default)]
pub(crate) struct MockCatalog {
    pub state: Mutex<MockState>,
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn check_identity(&self, acct: &Account) -> Result<IdentityStatus, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("identity:{}", acct.name));
        let response = state
            .identity_responses
            .get_mut(&acct.name)
            .filter(|queue| !queue.is_empty())
            .map(|queue| queue.remove(0))
            .unwrap_or(IdentityStatus::Valid);
        Ok(response)
    }

    async fn exchange_refresh_token(&self, acct: &Account) -> Result<TokenPair, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("refresh:{}", acct.name));
        match state.refresh_results.get(&acct.name) {
            Some(Some(pair)) => Ok(pair.clone()),
            _ => Err(SourceError::Status {
                context: "token refresh",
                status: 401,
            }),
        }
    }

    async fn user_lists(&self, acct: &Account) -> Result<Vec<ListSummary>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("lists:{}", acct.name));
        Ok(state
            .user_lists_results
            .get(&acct.name)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_list(
        &self,
        acct: &Account,
        spec: &ListSpec,
    ) -> Result<WriteStatus, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("create:{}", spec.slug));
        state
            .user_lists_results
            .entry(acct.name)
            .or_default()
            .push(ListSummary {
                slug: spec.slug.clone(),
                trakt_id: 1000,
            });
        Ok(WriteStatus::Created)
    }

    async fn delete_list(&self, acct: &Account, slug: &str) -> Result<(), SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("delete:{}", slug));
        state.lists.remove(slug);
        if let Some(lists) = state.user_lists_results.get_mut(&acct.name) {
            lists.retain(|list| list.slug != slug);
        }
        Ok(())
    }

    async fn list_items(&self, acct: &Account, slug: &str) -> Result<ItemsPayload, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("items:{}", slug));
        Ok(state.lists.get(slug).cloned().unwrap_or_default())
    }

    async fn remove_items(
        &self,
        acct: &Account,
        slug: &str,
        items: &ItemsPayload,
    ) -> Result<(), SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("remove:{}", slug));
        if state.remove_fails {
            return Err(SourceError::Status {
                context: "list clear",
                status: 500,
            });
        }
        let remote = state.lists.entry(slug.to_string()).or_default();
        remote.movies.retain(|m| !items.movies.contains(m));
        remote.shows.retain(|s| !items.shows.contains(s));
        Ok(())
    }

    async fn add_items(
        &self,
        acct: &Account,
        slug: &str,
        items: &ItemsPayload,
    ) -> Result<WriteStatus, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("add:{}", slug));
        if let Some(status) = state.add_rejects_with {
            return Ok(WriteStatus::Rejected(status));
        }
        let remote = state.lists.entry(slug.to_string()).or_default();
        remote.movies.extend(items.movies.iter().cloned());
        remote.shows.extend(items.shows.iter().cloned());
        Ok(WriteStatus::Created)
    }

    async fn search(
        &self,
        acct: &Account,
        query: &str,
        _scope: Option<MediaType>,
    ) -> Result<Vec<CatalogCandidate>, SourceError> {
        let mut state = self.state.lock().unwrap();
        state.tokens_seen.push(acct.access_token.clone());
        state.calls.push(format!("search:{}", query));
        if state.search_fails {
            return Err(SourceError::Status {
                context: "search",
                status: 500,
            });
        }
        Ok(state.search_results.get(query).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct MockChartFetcher {
    /// url -> Some(markup) for a page, None for a transport failure.
    pub pages: Mutex<HashMap<String, Option<String>>>,
}

impl MockChartFetcher {
    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Some(html.to_string()));
        self
    }

    pub fn with_failure(self, url: &str) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), None);
        self
    }
}

#[async_trait]
impl ChartFetcher for MockChartFetcher {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        match self.pages.lock().unwrap().get(url) {
            Some(Some(html)) => Ok(html.clone()),
            _ => Err(SourceError::Status {
                context: "chart page",
                status: 503,
            }),
        }
    }
}
