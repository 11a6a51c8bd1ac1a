use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chartsync_models::{AccountName, TokenPair};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Flat key/value TOML store for the per-account token pairs. Refreshed
/// tokens must be written back here after a run, or the next run will
/// present a token the catalog has already rotated away.
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    // Per-account token accessors

    pub fn get_access_token(&self, account: AccountName) -> Option<&String> {
        self.get(&format!("{}_access_token", account))
    }

    pub fn get_refresh_token(&self, account: AccountName) -> Option<&String> {
        self.get(&format!("{}_refresh_token", account))
    }

    pub fn set_tokens(&mut self, account: AccountName, tokens: &TokenPair) {
        self.set(
            format!("{}_access_token", account),
            tokens.access_token.clone(),
        );
        self.set(
            format!("{}_refresh_token", account),
            tokens.refresh_token.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_tokens(
            AccountName::Netflix,
            &TokenPair {
                access_token: "acc-1".to_string(),
                refresh_token: "ref-1".to_string(),
            },
        );
        store.save().unwrap();

        let mut loaded = CredentialStore::new(path);
        loaded.load().unwrap();
        assert_eq!(
            loaded.get_access_token(AccountName::Netflix),
            Some(&"acc-1".to_string())
        );
        assert_eq!(
            loaded.get_refresh_token(AccountName::Netflix),
            Some(&"ref-1".to_string())
        );
        assert_eq!(loaded.get_access_token(AccountName::Prime), None);
    }

    #[test]
    fn test_set_tokens_overwrites_pair() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/unused"));
        store.set_tokens(
            AccountName::Others,
            &TokenPair {
                access_token: "old-acc".to_string(),
                refresh_token: "old-ref".to_string(),
            },
        );
        store.set_tokens(
            AccountName::Others,
            &TokenPair {
                access_token: "new-acc".to_string(),
                refresh_token: "new-ref".to_string(),
            },
        );

        assert_eq!(
            store.get_access_token(AccountName::Others),
            Some(&"new-acc".to_string())
        );
        assert_eq!(
            store.get_refresh_token(AccountName::Others),
            Some(&"new-ref".to_string())
        );
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let mut store = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        store.load().unwrap();
        assert_eq!(store.get_access_token(AccountName::Netflix), None);
    }
}
