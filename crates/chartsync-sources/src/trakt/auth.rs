use std::time::Duration;

use chartsync_models::{Account, TokenPair};
use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::SourceError;
use crate::traits::IdentityStatus;

pub const API_BASE: &str = "https://api.trakt.tv";
const TOKEN_URL: &str = "https://api.trakt.tv/oauth/token";
const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

/// Create a reqwest Client with browser-like headers to get past Cloudflare.
pub fn create_catalog_client(timeout: Duration) -> Result<Client, SourceError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

/// Probe the identity endpoint with the account's current access token.
pub async fn check_identity(
    client: &Client,
    account: &Account,
) -> Result<IdentityStatus, SourceError> {
    let response = client
        .get(format!("{}/users/me", API_BASE))
        .header("Authorization", format!("Bearer {}", account.access_token))
        .header("trakt-api-version", "2")
        .header("trakt-api-key", &account.client_id)
        .header("Content-Type", "application/json")
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        Ok(IdentityStatus::Valid)
    } else if status.as_u16() == 401 {
        Ok(IdentityStatus::Unauthorized)
    } else {
        Ok(IdentityStatus::Other(status.as_u16()))
    }
}

/// Exchange the account's refresh token for a new access/refresh pair.
pub async fn exchange_refresh_token(
    client: &Client,
    account: &Account,
) -> Result<TokenPair, SourceError> {
    let payload = serde_json::json!({
        "refresh_token": account.refresh_token,
        "client_id": account.client_id,
        "client_secret": account.client_secret,
        "redirect_uri": REDIRECT_URI,
        "grant_type": "refresh_token",
    });

    let response = client
        .post(TOKEN_URL)
        .json(&payload)
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SourceError::status("token refresh", response.status()));
    }

    let token_response: TokenResponse = response.json().await?;
    info!(account = %account.name, "Access token refreshed");

    Ok(TokenPair {
        access_token: token_response.access_token,
        refresh_token: token_response.refresh_token,
    })
}
