pub mod config;
pub mod daemon;
pub mod lists;
pub mod run;

use chartsync_config::{Config, CredentialStore, PathManager};
use chartsync_models::{Account, AccountName, AccountSet};
use color_eyre::Result;

pub(crate) struct AppContext {
    pub config: Config,
    pub cred_store: CredentialStore,
}

/// Load config and credentials from the platform config directory.
pub(crate) fn load_context() -> Result<AppContext> {
    let paths = PathManager::default();

    let config_file = paths.config_file();
    let config = Config::load_from_file(&config_file).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e)
    })?;

    let credentials_file = paths.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store.load().map_err(|e| {
        color_eyre::eyre::eyre!(
            "Failed to load credentials from {}: {}",
            credentials_file.display(),
            e
        )
    })?;

    Ok(AppContext { config, cred_store })
}

/// Assemble the three in-memory accounts from config keys plus stored
/// tokens. A missing token is a setup error, not a runtime condition.
pub(crate) fn build_accounts(config: &Config, cred_store: &CredentialStore) -> Result<AccountSet> {
    let build = |name: AccountName| -> Result<Account> {
        let keys = config.accounts.get(name);
        let access_token = cred_store.get_access_token(name).ok_or_else(|| {
            color_eyre::eyre::eyre!("No access token stored for account '{}'", name)
        })?;
        let refresh_token = cred_store.get_refresh_token(name).ok_or_else(|| {
            color_eyre::eyre::eyre!("No refresh token stored for account '{}'", name)
        })?;
        Ok(Account {
            name,
            client_id: keys.client_id.clone(),
            client_secret: keys.client_secret.clone(),
            access_token: access_token.clone(),
            refresh_token: refresh_token.clone(),
        })
    };

    Ok(AccountSet {
        netflix: build(AccountName::Netflix)?,
        prime: build(AccountName::Prime)?,
        others: build(AccountName::Others)?,
    })
}

/// Write the (possibly refreshed) token pairs back to the credential
/// store so the next run presents current tokens.
pub(crate) fn persist_tokens(cred_store: &mut CredentialStore, accounts: &AccountSet) -> Result<()> {
    for account in accounts.iter() {
        cred_store.set_tokens(
            account.name,
            &chartsync_models::TokenPair {
                access_token: account.access_token.clone(),
                refresh_token: account.refresh_token.clone(),
            },
        );
    }
    cred_store
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save credentials: {}", e))
}
