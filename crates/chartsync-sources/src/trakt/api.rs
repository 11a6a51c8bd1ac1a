use chartsync_models::{
    Account, CatalogCandidate, DesiredSet, ListSpec, ListSummary, MediaType,
};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SourceError;
use crate::traits::WriteStatus;
use crate::trakt::auth::API_BASE;

/// Wire shape of a list add/remove payload:
/// `{ "movies": [{"ids": {"trakt": id}}], "shows": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemsPayload {
    pub movies: Vec<ItemRef>,
    pub shows: Vec<ItemRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemRef {
    pub ids: ItemIds,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemIds {
    pub trakt: u64,
}

impl ItemRef {
    pub fn new(trakt: u64) -> Self {
        Self {
            ids: ItemIds { trakt },
        }
    }
}

impl ItemsPayload {
    pub fn from_desired(desired: &DesiredSet) -> Self {
        Self {
            movies: desired.movies.iter().copied().map(ItemRef::new).collect(),
            shows: desired.shows.iter().copied().map(ItemRef::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.shows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.movies.len() + self.shows.len()
    }
}

fn authed(request: RequestBuilder, account: &Account) -> RequestBuilder {
    request
        .header("Authorization", format!("Bearer {}", account.access_token))
        .header("trakt-api-version", "2")
        .header("trakt-api-key", &account.client_id)
        .header("Content-Type", "application/json")
}

#[derive(Debug, Deserialize)]
struct ListRow {
    ids: ListRowIds,
}

#[derive(Debug, Deserialize)]
struct ListRowIds {
    trakt: u64,
    slug: String,
}

/// All lists owned by the account's user.
pub async fn user_lists(client: &Client, account: &Account) -> Result<Vec<ListSummary>, SourceError> {
    let response = authed(client.get(format!("{}/users/me/lists", API_BASE)), account)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SourceError::status("list collection", response.status()));
    }

    let rows: Vec<ListRow> = response.json().await?;
    Ok(rows
        .into_iter()
        .map(|row| ListSummary {
            slug: row.ids.slug,
            trakt_id: row.ids.trakt,
        })
        .collect())
}

#[derive(Debug, Serialize)]
struct CreateListBody<'a> {
    name: &'a str,
    description: &'a str,
    privacy: &'a str,
    display_numbers: bool,
}

pub async fn create_list(
    client: &Client,
    account: &Account,
    spec: &ListSpec,
) -> Result<WriteStatus, SourceError> {
    let body = CreateListBody {
        name: &spec.name,
        description: &spec.description,
        privacy: &spec.privacy,
        display_numbers: spec.display_numbers,
    };

    let response = authed(client.post(format!("{}/users/me/lists", API_BASE)), account)
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        debug!(list = spec.slug, "List created");
        Ok(WriteStatus::Created)
    } else {
        Ok(WriteStatus::Rejected(status.as_u16()))
    }
}

pub async fn delete_list(client: &Client, account: &Account, slug: &str) -> Result<(), SourceError> {
    let response = authed(
        client.delete(format!("{}/users/me/lists/{}", API_BASE, slug)),
        account,
    )
    .send()
    .await?;

    if !response.status().is_success() {
        return Err(SourceError::status("list delete", response.status()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct ListItemRow {
    #[serde(rename = "type")]
    item_type: String,
    movie: Option<ListItemBody>,
    show: Option<ListItemBody>,
}

#[derive(Debug, Deserialize)]
struct ListItemBody {
    ids: ListItemIds,
}

#[derive(Debug, Deserialize)]
struct ListItemIds {
    trakt: Option<u64>,
}

/// Current contents of a list, in the add/remove payload shape.
pub async fn list_items(
    client: &Client,
    account: &Account,
    slug: &str,
) -> Result<ItemsPayload, SourceError> {
    let response = authed(
        client.get(format!("{}/users/me/lists/{}/items", API_BASE, slug)),
        account,
    )
    .send()
    .await?;

    if !response.status().is_success() {
        return Err(SourceError::status("list items", response.status()));
    }

    let rows: Vec<ListItemRow> = response.json().await?;
    let mut payload = ItemsPayload::default();
    for row in rows {
        let (body, ids) = match row.item_type.as_str() {
            "movie" => (row.movie, &mut payload.movies),
            "show" => (row.show, &mut payload.shows),
            _ => continue,
        };
        if let Some(trakt) = body.and_then(|b| b.ids.trakt) {
            ids.push(ItemRef::new(trakt));
        }
    }

    debug!(
        list = slug,
        movies = payload.movies.len(),
        shows = payload.shows.len(),
        "Fetched list items"
    );
    Ok(payload)
}

pub async fn remove_items(
    client: &Client,
    account: &Account,
    slug: &str,
    items: &ItemsPayload,
) -> Result<(), SourceError> {
    let response = authed(
        client.post(format!("{}/users/me/lists/{}/items/remove", API_BASE, slug)),
        account,
    )
    .json(items)
    .send()
    .await?;

    if !response.status().is_success() {
        return Err(SourceError::status("list clear", response.status()));
    }
    Ok(())
}

pub async fn add_items(
    client: &Client,
    account: &Account,
    slug: &str,
    items: &ItemsPayload,
) -> Result<WriteStatus, SourceError> {
    let response = authed(
        client.post(format!("{}/users/me/lists/{}/items", API_BASE, slug)),
        account,
    )
    .json(items)
    .send()
    .await?;

    let status = response.status();
    if status.is_success() {
        Ok(WriteStatus::Created)
    } else {
        Ok(WriteStatus::Rejected(status.as_u16()))
    }
}

#[derive(Debug, Deserialize)]
struct SearchRow {
    #[serde(rename = "type")]
    item_type: String,
    movie: Option<SearchMedia>,
    show: Option<SearchMedia>,
}

#[derive(Debug, Deserialize)]
struct SearchMedia {
    title: String,
    ids: SearchIds,
}

#[derive(Debug, Deserialize)]
struct SearchIds {
    trakt: Option<u64>,
    slug: Option<String>,
}

fn scope_segment(scope: Option<MediaType>) -> &'static str {
    match scope {
        Some(media_type) => media_type.as_str(),
        None => "movie,show",
    }
}

/// Free-text search with extended metadata, ordered as the catalog ranks
/// the results. Rows missing an id or slug are dropped.
pub async fn search(
    client: &Client,
    account: &Account,
    query: &str,
    scope: Option<MediaType>,
) -> Result<Vec<CatalogCandidate>, SourceError> {
    let url = format!(
        "{}/search/{}?query={}&extended=full",
        API_BASE,
        scope_segment(scope),
        urlencoding::encode(query)
    );

    let response = authed(client.get(url), account).send().await?;

    if !response.status().is_success() {
        return Err(SourceError::status("search", response.status()));
    }

    let rows: Vec<SearchRow> = response.json().await?;
    let mut candidates = Vec::new();
    for row in rows {
        let (media_type, media) = match row.item_type.as_str() {
            "movie" => (MediaType::Movie, row.movie),
            "show" => (MediaType::Show, row.show),
            _ => continue,
        };
        let media = match media {
            Some(media) => media,
            None => continue,
        };
        if let (Some(trakt_id), Some(slug)) = (media.ids.trakt, media.ids.slug) {
            candidates.push(CatalogCandidate {
                media_type,
                trakt_id,
                title: media.title,
                slug,
            });
        }
    }

    debug!(query, results = candidates.len(), "Catalog search");
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chartsync_models::ResolvedEntry;

    #[test]
    fn test_items_payload_wire_shape() {
        let mut desired = DesiredSet::new();
        desired.push(ResolvedEntry {
            media_type: MediaType::Movie,
            trakt_id: 42,
            rank: 1,
        });
        desired.push(ResolvedEntry {
            media_type: MediaType::Show,
            trakt_id: 7,
            rank: 2,
        });

        let payload = ItemsPayload::from_desired(&desired);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "movies": [{"ids": {"trakt": 42}}],
                "shows": [{"ids": {"trakt": 7}}],
            })
        );
    }

    #[test]
    fn test_items_payload_preserves_rank_order() {
        let mut desired = DesiredSet::new();
        for (rank, id) in [(1, 300), (2, 100), (3, 200)] {
            desired.push(ResolvedEntry {
                media_type: MediaType::Movie,
                trakt_id: id,
                rank,
            });
        }

        let payload = ItemsPayload::from_desired(&desired);
        let ids: Vec<u64> = payload.movies.iter().map(|m| m.ids.trakt).collect();
        assert_eq!(ids, vec![300, 100, 200]);
    }

    #[test]
    fn test_search_row_deserialization() {
        let body = r#"[
            {"type": "movie", "score": 100.0,
             "movie": {"title": "Avatar", "year": 2009,
                       "ids": {"trakt": 12345, "slug": "avatar-2009", "imdb": "tt0499549"}}},
            {"type": "show",
             "show": {"title": "Avatar: The Last Airbender", "year": 2005,
                      "ids": {"trakt": 678, "slug": "avatar-the-last-airbender"}}},
            {"type": "person", "person": {"name": "Someone"}}
        ]"#;

        let rows: Vec<SearchRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].item_type, "movie");
        assert_eq!(rows[0].movie.as_ref().unwrap().ids.trakt, Some(12345));
        assert_eq!(
            rows[1].show.as_ref().unwrap().ids.slug.as_deref(),
            Some("avatar-the-last-airbender")
        );
        assert!(rows[2].movie.is_none() && rows[2].show.is_none());
    }

    #[test]
    fn test_list_item_rows_split_by_type() {
        let body = r#"[
            {"rank": 1, "type": "movie", "movie": {"title": "A", "ids": {"trakt": 1}}},
            {"rank": 2, "type": "show", "show": {"title": "B", "ids": {"trakt": 2}}},
            {"rank": 3, "type": "episode", "episode": {"ids": {"trakt": 3}}}
        ]"#;

        let rows: Vec<ListItemRow> = serde_json::from_str(body).unwrap();
        let mut payload = ItemsPayload::default();
        for row in rows {
            let (item, ids) = match row.item_type.as_str() {
                "movie" => (row.movie, &mut payload.movies),
                "show" => (row.show, &mut payload.shows),
                _ => continue,
            };
            if let Some(trakt) = item.and_then(|b| b.ids.trakt) {
                ids.push(ItemRef::new(trakt));
            }
        }

        assert_eq!(payload.movies, vec![ItemRef::new(1)]);
        assert_eq!(payload.shows, vec![ItemRef::new(2)]);
    }

    #[test]
    fn test_scope_segment() {
        assert_eq!(scope_segment(Some(MediaType::Movie)), "movie");
        assert_eq!(scope_segment(Some(MediaType::Show)), "show");
        assert_eq!(scope_segment(None), "movie,show");
    }
}
