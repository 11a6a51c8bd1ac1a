use serde::{Deserialize, Serialize};

/// Logical credential groupings. Each owns a subset of the remote lists.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccountName {
    Netflix,
    Prime,
    /// Shared account for the remaining services (Hotstar, Zee5).
    Others,
}

impl AccountName {
    pub const ALL: [AccountName; 3] = [AccountName::Netflix, AccountName::Prime, AccountName::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountName::Netflix => "netflix",
            AccountName::Prime => "prime",
            AccountName::Others => "others",
        }
    }
}

impl std::fmt::Display for AccountName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AccountName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "netflix" => Ok(AccountName::Netflix),
            "prime" => Ok(AccountName::Prime),
            "others" => Ok(AccountName::Others),
            other => Err(format!(
                "Unknown account '{}'. Use 'netflix', 'prime', or 'others'",
                other
            )),
        }
    }
}

/// An access/refresh token pair from a token exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// One set of catalog API credentials. The token pair is mutable state:
/// the credential lifecycle replaces it in place after a refresh, and the
/// in-memory value is the source of truth for the rest of the run.
#[derive(Debug, Clone)]
pub struct Account {
    pub name: AccountName,
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Account {
    pub fn apply_tokens(&mut self, tokens: TokenPair) {
        self.access_token = tokens.access_token;
        self.refresh_token = tokens.refresh_token;
    }
}

/// All three accounts of a run, addressable by name.
#[derive(Debug, Clone)]
pub struct AccountSet {
    pub netflix: Account,
    pub prime: Account,
    pub others: Account,
}

impl AccountSet {
    pub fn get(&self, name: AccountName) -> &Account {
        match name {
            AccountName::Netflix => &self.netflix,
            AccountName::Prime => &self.prime,
            AccountName::Others => &self.others,
        }
    }

    pub fn get_mut(&mut self, name: AccountName) -> &mut Account {
        match name {
            AccountName::Netflix => &mut self.netflix,
            AccountName::Prime => &mut self.prime,
            AccountName::Others => &mut self.others,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        [&self.netflix, &self.prime, &self.others].into_iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Account> {
        [&mut self.netflix, &mut self.prime, &mut self.others].into_iter()
    }
}
