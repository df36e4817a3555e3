//! Access-token cache for the document service.
//!
//! A cached token is reused until shortly before it expires. After that, a
//! refresh-token grant is attempted if OAuth credentials are configured; without them
//! there is no way to re-authenticate from a server process and the caller gets
//! `AuthError::InteractiveUnavailable` before any export work starts.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are treated as already expired.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No valid access token and interactive authentication is unavailable")]
    InteractiveUnavailable,

    #[error("Token refresh rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("HTTP error during token refresh: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - Duration::seconds(EXPIRY_SKEW_SECS)
    }
}

/// OAuth client + long-lived refresh token.
#[derive(Debug, Clone)]
pub struct RefreshCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct TokenProvider {
    client: Client,
    token_url: String,
    refresh: Option<RefreshCredentials>,
    cache: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(
        client: Client,
        token_url: String,
        seed: Option<CachedToken>,
        refresh: Option<RefreshCredentials>,
    ) -> Self {
        Self {
            client,
            token_url,
            refresh,
            cache: Mutex::new(seed),
        }
    }

    /// Returns a token valid for at least the skew window, refreshing if possible.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        self.access_token_at(Utc::now()).await
    }

    async fn access_token_at(&self, now: DateTime<Utc>) -> Result<String, AuthError> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.as_ref().filter(|t| t.is_valid_at(now)) {
            return Ok(token.access_token.clone());
        }

        let Some(credentials) = &self.refresh else {
            return Err(AuthError::InteractiveUnavailable);
        };

        let fresh = self.refresh_grant(credentials, now).await?;
        info!("Access token refreshed, expires at {}", fresh.expires_at);
        let access_token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(access_token)
    }

    async fn refresh_grant(
        &self,
        credentials: &RefreshCredentials,
        now: DateTime<Utc>,
    ) -> Result<CachedToken, AuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("refresh_token", credentials.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        })
    }
}
