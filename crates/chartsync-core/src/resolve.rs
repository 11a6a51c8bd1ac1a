use chartsync_models::{Account, MediaType, RankedItem, ResolvedEntry};
use chartsync_sources::Catalog;
use tracing::{debug, error, warn};

/// The chart site prints "&" where the catalog spells out "and".
pub fn normalize_title(title: &str) -> String {
    title.replace('&', "and")
}

/// Approximate identity check between a chart slug and a candidate slug,
/// hyphens stripped: the candidate slug contains the chart tag, or the tag
/// extends the candidate slug. Prefix/substring matching can pair titles
/// that merely share a stem; that looseness is accepted in exchange for
/// never dropping a chart entry over slug formatting.
pub fn slug_compatible(tag: &str, slug: &str) -> bool {
    let tag = tag.replace('-', "");
    let slug = slug.replace('-', "");
    slug.contains(&tag) || tag.starts_with(&slug)
}

/// Resolve one chart row to a canonical catalog id.
///
/// The first search result with a compatible slug wins; title equality is
/// not required for a match. When no candidate is compatible the first
/// result is taken anyway: producing some id for every charted title beats
/// leaving a rank unresolved, at the cost of an occasional wrong pick.
/// Returns None only when the search fails or returns nothing.
pub async fn resolve(
    catalog: &dyn Catalog,
    account: &Account,
    item: &RankedItem,
    scope: Option<MediaType>,
) -> Option<ResolvedEntry> {
    let query = normalize_title(&item.title);

    let results = match catalog.search(account, &query, scope).await {
        Ok(results) => results,
        Err(e) => {
            error!(title = item.title, error = %e, "Catalog search failed");
            return None;
        }
    };

    if results.is_empty() {
        warn!(title = item.title, "No catalog results");
        return None;
    }

    for candidate in &results {
        if slug_compatible(&item.slug, &candidate.slug) {
            debug!(
                title = item.title,
                candidate = candidate.title,
                slug = candidate.slug,
                trakt_id = candidate.trakt_id,
                "Matched chart entry"
            );
            return Some(ResolvedEntry {
                media_type: candidate.media_type,
                trakt_id: candidate.trakt_id,
                rank: item.rank,
            });
        }
    }

    let first = &results[0];
    warn!(
        title = item.title,
        fallback = first.title,
        "No compatible candidate, taking first result"
    );
    Some(ResolvedEntry {
        media_type: first.media_type,
        trakt_id: first.trakt_id,
        rank: item.rank,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{account, candidate, MockCatalog};
    use chartsync_models::AccountName;

    fn ranked(rank: u32, title: &str, slug: &str) -> RankedItem {
        RankedItem {
            rank,
            title: title.to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn test_normalize_title_replaces_ampersand() {
        assert_eq!(normalize_title("Tom & Jerry"), "Tom and Jerry");
        assert_eq!(normalize_title("Plain Title"), "Plain Title");
    }

    #[test]
    fn test_slug_compatible_prefix_both_directions() {
        assert!(slug_compatible("avatar", "avatarthewayofwater"));
        assert!(slug_compatible("avatarthewayofwater", "avatar"));
    }

    #[test]
    fn test_slug_compatible_ignores_hyphens() {
        assert!(slug_compatible("tom-and-jerry", "tom-and-jerry"));
        assert!(slug_compatible("the-night-agent", "thenightagent"));
    }

    #[test]
    fn test_slug_compatible_substring() {
        assert!(slug_compatible("jawan", "jawan-2023"));
        assert!(!slug_compatible("jawan", "pathaan"));
    }

    #[tokio::test]
    async fn test_ampersand_title_resolves() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().search_results.insert(
            "Tom and Jerry".to_string(),
            vec![candidate(
                MediaType::Show,
                91,
                "Tom and Jerry",
                "tom-and-jerry",
            )],
        );
        let netflix = account(AccountName::Netflix, "acc");

        let entry = resolve(
            &catalog,
            &netflix,
            &ranked(4, "Tom & Jerry", "tom-and-jerry"),
            Some(MediaType::Show),
        )
        .await
        .unwrap();

        assert_eq!(entry.trakt_id, 91);
        assert_eq!(entry.rank, 4);
        assert_eq!(entry.media_type, MediaType::Show);
    }

    #[tokio::test]
    async fn test_first_compatible_candidate_wins() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().search_results.insert(
            "Avatar".to_string(),
            vec![
                candidate(MediaType::Movie, 1, "Avtaar", "avtaar-1992"),
                candidate(MediaType::Movie, 2, "Avatar", "avatar-the-way-of-water"),
                candidate(MediaType::Movie, 3, "Avatar", "avatar-2009"),
            ],
        );
        let netflix = account(AccountName::Netflix, "acc");

        let entry = resolve(
            &catalog,
            &netflix,
            &ranked(1, "Avatar", "avatar"),
            Some(MediaType::Movie),
        )
        .await
        .unwrap();

        // avtaar-1992 is not compatible; avatar-the-way-of-water is.
        assert_eq!(entry.trakt_id, 2);
    }

    #[tokio::test]
    async fn test_falls_back_to_first_result() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().search_results.insert(
            "Obscure Film".to_string(),
            vec![
                candidate(MediaType::Movie, 11, "Unrelated", "totally-different"),
                candidate(MediaType::Movie, 12, "Also Unrelated", "something-else"),
            ],
        );
        let netflix = account(AccountName::Netflix, "acc");

        let entry = resolve(
            &catalog,
            &netflix,
            &ranked(9, "Obscure Film", "obscure-film"),
            Some(MediaType::Movie),
        )
        .await
        .unwrap();

        assert_eq!(entry.trakt_id, 11);
    }

    #[tokio::test]
    async fn test_zero_results_is_none() {
        let catalog = MockCatalog::default();
        let netflix = account(AccountName::Netflix, "acc");

        let entry = resolve(
            &catalog,
            &netflix,
            &ranked(1, "Nothing Matches", "nothing-matches"),
            None,
        )
        .await;

        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_search_failure_is_none() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().search_fails = true;
        let netflix = account(AccountName::Netflix, "acc");

        let entry = resolve(
            &catalog,
            &netflix,
            &ranked(1, "Any Title", "any-title"),
            Some(MediaType::Movie),
        )
        .await;

        assert!(entry.is_none());
    }

    #[tokio::test]
    async fn test_mixed_scope_takes_result_type() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().search_results.insert(
            "Wednesday".to_string(),
            vec![candidate(MediaType::Show, 55, "Wednesday", "wednesday")],
        );
        let others = account(AccountName::Others, "acc");

        let entry = resolve(
            &catalog,
            &others,
            &ranked(2, "Wednesday", "wednesday"),
            None,
        )
        .await
        .unwrap();

        assert_eq!(entry.media_type, MediaType::Show);
        assert_eq!(entry.rank, 2);
    }
}
