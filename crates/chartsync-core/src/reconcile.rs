use chartsync_models::{Account, DesiredSet};
use chartsync_sources::{Catalog, ItemsPayload, WriteStatus};
use tracing::{info, warn};

use crate::retry::{self, RetryOutcome, RetryPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Updated,
    /// The desired set was empty; the remote list was left untouched. An
    /// empty set signals upstream scrape/resolution failure, not a request
    /// to empty the list.
    Skipped,
    Failed,
}

/// Replace a list's remote contents with the desired set.
///
/// The whole replace (fetch current, best-effort clear, add) runs as one
/// retried operation. There is no remote transaction around the two
/// writes; a failure between clear and add leaves the list empty until
/// the next attempt, never mixed.
pub async fn reconcile(
    catalog: &dyn Catalog,
    account: &Account,
    slug: &str,
    desired: &DesiredSet,
    policy: &RetryPolicy,
) -> ReconcileOutcome {
    let payload = ItemsPayload::from_desired(desired);
    let label = format!("update list {}", slug);

    let payload_ref = &payload;
    let outcome = retry::execute(policy, &label, move || async move {
        if payload_ref.is_empty() {
            warn!(list = slug, "Desired set is empty, leaving list untouched");
            return Ok(WriteStatus::NoOp);
        }

        let current = catalog.list_items(account, slug).await?;
        if let Err(e) = catalog.remove_items(account, slug, &current).await {
            warn!(list = slug, error = %e, "Best-effort clear failed");
        }

        catalog.add_items(account, slug, payload_ref).await
    })
    .await;

    match outcome {
        RetryOutcome::Completed(WriteStatus::NoOp) => ReconcileOutcome::Skipped,
        RetryOutcome::Completed(_) => {
            info!(list = slug, items = payload.len(), "List updated");
            ReconcileOutcome::Updated
        }
        RetryOutcome::Exhausted => ReconcileOutcome::Failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{account, MockCatalog};
    use chartsync_models::{AccountName, MediaType, ResolvedEntry};

    fn desired_movies(ids: &[u64]) -> DesiredSet {
        let mut desired = DesiredSet::new();
        for (i, id) in ids.iter().enumerate() {
            desired.push(ResolvedEntry {
                media_type: MediaType::Movie,
                trakt_id: *id,
                rank: i as u32 + 1,
            });
        }
        desired
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_base: 2,
        }
    }

    #[tokio::test]
    async fn test_empty_desired_set_skips_without_remote_calls() {
        let catalog = MockCatalog::default();
        let netflix = account(AccountName::Netflix, "acc");

        let outcome = reconcile(
            &catalog,
            &netflix,
            "top-india-netflix-movies",
            &DesiredSet::new(),
            &fast_policy(),
        )
        .await;

        assert_eq!(outcome, ReconcileOutcome::Skipped);
        assert!(catalog.state.lock().unwrap().calls.is_empty());
    }

    #[tokio::test]
    async fn test_replace_clears_then_fills() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().seed_list(
            "top-india-netflix-movies",
            ItemsPayload::from_desired(&desired_movies(&[1, 2, 3])),
        );
        let netflix = account(AccountName::Netflix, "acc");

        let outcome = reconcile(
            &catalog,
            &netflix,
            "top-india-netflix-movies",
            &desired_movies(&[4, 5]),
            &fast_policy(),
        )
        .await;

        assert_eq!(outcome, ReconcileOutcome::Updated);
        let state = catalog.state.lock().unwrap();
        let remote = state.lists.get("top-india-netflix-movies").unwrap();
        let ids: Vec<u64> = remote.movies.iter().map(|m| m.ids.trakt).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(
            state.calls,
            vec![
                "items:top-india-netflix-movies",
                "remove:top-india-netflix-movies",
                "add:top-india-netflix-movies",
            ]
        );
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let catalog = MockCatalog::default();
        let netflix = account(AccountName::Netflix, "acc");
        let desired = desired_movies(&[10, 20, 30]);

        let first = reconcile(&catalog, &netflix, "slug", &desired, &fast_policy()).await;
        let after_first = catalog.state.lock().unwrap().lists.get("slug").cloned();

        let second = reconcile(&catalog, &netflix, "slug", &desired, &fast_policy()).await;
        let after_second = catalog.state.lock().unwrap().lists.get("slug").cloned();

        assert_eq!(first, ReconcileOutcome::Updated);
        assert_eq!(second, ReconcileOutcome::Updated);
        assert_eq!(after_first, after_second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_persistent_rejection_exhausts_and_fails() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().add_rejects_with = Some(420);
        let netflix = account(AccountName::Netflix, "acc");

        let outcome = reconcile(
            &catalog,
            &netflix,
            "slug",
            &desired_movies(&[1]),
            &fast_policy(),
        )
        .await;

        assert_eq!(outcome, ReconcileOutcome::Failed);
        let state = catalog.state.lock().unwrap();
        let adds = state.calls.iter().filter(|c| c.starts_with("add:")).count();
        assert_eq!(adds, 3);
    }

    #[tokio::test]
    async fn test_clear_failure_is_not_fatal() {
        let catalog = MockCatalog::default();
        catalog.state.lock().unwrap().remove_fails = true;
        let netflix = account(AccountName::Netflix, "acc");

        let outcome = reconcile(
            &catalog,
            &netflix,
            "slug",
            &desired_movies(&[7]),
            &fast_policy(),
        )
        .await;

        assert_eq!(outcome, ReconcileOutcome::Updated);
    }
}
