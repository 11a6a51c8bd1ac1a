use chartsync_models::Account;
use chartsync_sources::{Catalog, IdentityStatus};
use tracing::{error, info};

/// Result of one credential probe/refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValidation {
    Valid,
    /// The token pair was replaced in place; the caller should persist it.
    Refreshed,
    Failed,
}

/// Probe the identity endpoint and refresh the token pair if it has
/// expired. On refresh the account is mutated in place, so every later
/// call in the run carries the new access token.
pub async fn validate_account(catalog: &dyn Catalog, account: &mut Account) -> TokenValidation {
    match catalog.check_identity(account).await {
        Ok(IdentityStatus::Valid) => {
            info!(account = %account.name, "Access token is valid");
            TokenValidation::Valid
        }
        Ok(IdentityStatus::Unauthorized) => {
            info!(account = %account.name, "Access token expired, attempting refresh");
            match catalog.exchange_refresh_token(account).await {
                Ok(tokens) => {
                    account.apply_tokens(tokens);
                    TokenValidation::Refreshed
                }
                Err(e) => {
                    error!(account = %account.name, error = %e, "Token refresh failed");
                    TokenValidation::Failed
                }
            }
        }
        Ok(IdentityStatus::Other(status)) => {
            error!(account = %account.name, status, "Token check failed");
            TokenValidation::Failed
        }
        Err(e) => {
            error!(account = %account.name, error = %e, "Token check failed");
            TokenValidation::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{account, MockCatalog};
    use chartsync_models::{AccountName, TokenPair};

    #[tokio::test]
    async fn test_valid_token_leaves_account_untouched() {
        let catalog = MockCatalog::default();
        let mut netflix = account(AccountName::Netflix, "acc-old");

        let result = validate_account(&catalog, &mut netflix).await;

        assert_eq!(result, TokenValidation::Valid);
        assert_eq!(netflix.access_token, "acc-old");
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_in_place() {
        let catalog = MockCatalog::default();
        {
            let mut state = catalog.state.lock().unwrap();
            state
                .identity_responses
                .insert(AccountName::Prime, vec![IdentityStatus::Unauthorized]);
            state.refresh_results.insert(
                AccountName::Prime,
                Some(TokenPair {
                    access_token: "acc-new".to_string(),
                    refresh_token: "ref-new".to_string(),
                }),
            );
        }
        let mut prime = account(AccountName::Prime, "acc-old");

        let result = validate_account(&catalog, &mut prime).await;

        assert_eq!(result, TokenValidation::Refreshed);
        assert_eq!(prime.access_token, "acc-new");
        assert_eq!(prime.refresh_token, "ref-new");
    }

    #[tokio::test]
    async fn test_new_token_used_for_subsequent_calls() {
        let catalog = MockCatalog::default();
        {
            let mut state = catalog.state.lock().unwrap();
            state
                .identity_responses
                .insert(AccountName::Prime, vec![IdentityStatus::Unauthorized]);
            state.refresh_results.insert(
                AccountName::Prime,
                Some(TokenPair {
                    access_token: "acc-new".to_string(),
                    refresh_token: "ref-new".to_string(),
                }),
            );
        }
        let mut prime = account(AccountName::Prime, "acc-old");
        validate_account(&catalog, &mut prime).await;

        catalog.user_lists(&prime).await.unwrap();

        let state = catalog.state.lock().unwrap();
        let last_token = state.tokens_seen.last().unwrap();
        assert_eq!(last_token, "acc-new");
        assert!(!state.tokens_seen[1..].contains(&"acc-old".to_string()));
    }

    #[tokio::test]
    async fn test_failed_refresh_is_failed() {
        let catalog = MockCatalog::default();
        {
            let mut state = catalog.state.lock().unwrap();
            state
                .identity_responses
                .insert(AccountName::Others, vec![IdentityStatus::Unauthorized]);
            state.refresh_results.insert(AccountName::Others, None);
        }
        let mut others = account(AccountName::Others, "acc-old");

        let result = validate_account(&catalog, &mut others).await;

        assert_eq!(result, TokenValidation::Failed);
        assert_eq!(others.access_token, "acc-old");
    }

    #[tokio::test]
    async fn test_unexpected_status_is_failed() {
        let catalog = MockCatalog::default();
        {
            let mut state = catalog.state.lock().unwrap();
            state
                .identity_responses
                .insert(AccountName::Netflix, vec![IdentityStatus::Other(503)]);
        }
        let mut netflix = account(AccountName::Netflix, "acc-old");

        assert_eq!(
            validate_account(&catalog, &mut netflix).await,
            TokenValidation::Failed
        );
    }
}
