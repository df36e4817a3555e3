use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Duration, Utc};

use crate::docs_client::auth::{CachedToken, RefreshCredentials, DEFAULT_TOKEN_URL};
use crate::docs_client::{Endpoints, DEFAULT_DOCS_API_BASE, DEFAULT_DRIVE_API_BASE};
use crate::export::orchestrator::{ExportLimits, DEFAULT_CONTENT_BATCH_SIZE};
use crate::layout::snake_grid::DEFAULT_ITEMS_PER_PAGE;

/// Lifetime assumed for a pre-seeded token that comes without an expiry.
const SEEDED_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub google_access_token: Option<String>,
    pub google_access_token_expires_at: Option<DateTime<Utc>>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_refresh_token: Option<String>,
    pub docs_api_base: String,
    pub drive_api_base: String,
    pub oauth_token_url: String,
    pub content_batch_size: usize,
    pub board_items_per_page: usize,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            google_access_token: None,
            google_access_token_expires_at: None,
            google_client_id: None,
            google_client_secret: None,
            google_refresh_token: None,
            docs_api_base: DEFAULT_DOCS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
            oauth_token_url: DEFAULT_TOKEN_URL.to_string(),
            content_batch_size: DEFAULT_CONTENT_BATCH_SIZE,
            board_items_per_page: DEFAULT_ITEMS_PER_PAGE,
            http_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            google_access_token: optional_env("GOOGLE_ACCESS_TOKEN"),
            google_access_token_expires_at: optional_env("GOOGLE_ACCESS_TOKEN_EXPIRES_AT")
                .map(|raw| {
                    DateTime::parse_from_rfc3339(&raw)
                        .map(|ts| ts.with_timezone(&Utc))
                        .context("GOOGLE_ACCESS_TOKEN_EXPIRES_AT must be an RFC 3339 timestamp")
                })
                .transpose()?,
            google_client_id: optional_env("GOOGLE_CLIENT_ID"),
            google_client_secret: optional_env("GOOGLE_CLIENT_SECRET"),
            google_refresh_token: optional_env("GOOGLE_REFRESH_TOKEN"),
            docs_api_base: optional_env("DOCS_API_BASE").unwrap_or(defaults.docs_api_base),
            drive_api_base: optional_env("DRIVE_API_BASE").unwrap_or(defaults.drive_api_base),
            oauth_token_url: optional_env("OAUTH_TOKEN_URL").unwrap_or(defaults.oauth_token_url),
            content_batch_size: parse_env("CONTENT_BATCH_SIZE", defaults.content_batch_size)?,
            board_items_per_page: parse_env("BOARD_ITEMS_PER_PAGE", defaults.board_items_per_page)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
        };

        ensure!(config.content_batch_size >= 1, "CONTENT_BATCH_SIZE must be at least 1");
        ensure!(
            config.board_items_per_page >= 2,
            "BOARD_ITEMS_PER_PAGE must be at least 2"
        );
        Ok(config)
    }

    /// Pre-seeded access token, if one is configured.
    pub fn seeded_token(&self, now: DateTime<Utc>) -> Option<CachedToken> {
        let access_token = self.google_access_token.clone()?;
        let expires_at = self
            .google_access_token_expires_at
            .unwrap_or_else(|| now + Duration::seconds(SEEDED_TOKEN_LIFETIME_SECS));
        Some(CachedToken {
            access_token,
            expires_at,
        })
    }

    /// Refresh-token grant credentials; all three must be set.
    pub fn refresh_credentials(&self) -> Option<RefreshCredentials> {
        Some(RefreshCredentials {
            client_id: self.google_client_id.clone()?,
            client_secret: self.google_client_secret.clone()?,
            refresh_token: self.google_refresh_token.clone()?,
        })
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            docs_api_base: self.docs_api_base.trim_end_matches('/').to_string(),
            drive_api_base: self.drive_api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn export_limits(&self) -> ExportLimits {
        ExportLimits {
            content_batch_size: self.content_batch_size,
            items_per_page: self.board_items_per_page,
        }
    }
}

/// Unset and blank variables both read as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        None => Ok(default),
    }
}
