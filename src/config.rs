//! Configuration management for the DreamStreamer client.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage the catalog
//! API location, the asset bucket, the identity provider coordinates and other
//! runtime parameters.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::error::{CatalogError, Result};

pub const APP_DIR: &str = "dreamstreamer";

const DEFAULT_DEBOUNCE_MS: u64 = 300;
const MIN_DEBOUNCE_MS: u64 = 300;
const MAX_DEBOUNCE_MS: u64 = 500;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `dreamstreamer/.env`. A missing file is not an
/// error: every value can also come straight from the process environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/dreamstreamer/.env`
/// - macOS: `~/Library/Application Support/dreamstreamer/.env`
/// - Windows: `%LOCALAPPDATA%/dreamstreamer/.env`
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| CatalogError::Config(e.to_string()))?;
    }
    Ok(())
}

/// Root of everything the client stores locally.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn require(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CatalogError::Config(format!("{} must be set", key))),
    }
}

/// Returns the catalog API base URL, without a trailing slash.
///
/// Retrieves the `DREAMSTREAMER_API_URL` environment variable.
///
/// # Example
///
/// ```
/// let url = api_url()?; // e.g., "https://abc.execute-api.ap-southeast-1.amazonaws.com/prod"
/// ```
pub fn api_url() -> Result<String> {
    Ok(require("DREAMSTREAMER_API_URL")?
        .trim_end_matches('/')
        .to_string())
}

/// Returns the name of the bucket holding catalog assets.
///
/// Retrieves the `DREAMSTREAMER_S3_BUCKET` environment variable. Public asset
/// URLs are synthesized from this name and the key issued by the backend.
pub fn bucket_name() -> Result<String> {
    require("DREAMSTREAMER_S3_BUCKET")
}

/// Returns the region of the identity provider's user pool.
pub fn cognito_region() -> Result<String> {
    require("DREAMSTREAMER_COGNITO_REGION")
}

/// Returns the identity provider's user pool id.
pub fn cognito_user_pool_id() -> Result<String> {
    require("DREAMSTREAMER_COGNITO_USER_POOL_ID")
}

/// Returns the app client id registered with the user pool.
pub fn cognito_client_id() -> Result<String> {
    require("DREAMSTREAMER_COGNITO_CLIENT_ID")
}

/// Returns the idle window used to debounce search input.
///
/// Reads `DREAMSTREAMER_SEARCH_DEBOUNCE_MS`, clamped to 300..=500 ms. Falls back
/// to 300 ms when unset or unparsable.
pub fn search_debounce() -> Duration {
    let ms = env::var("DREAMSTREAMER_SEARCH_DEBOUNCE_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_DEBOUNCE_MS)
        .clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS);
    Duration::from_millis(ms)
}

/// Resolved runtime settings shared by the catalog and identity clients.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub bucket_name: String,
    pub identity: IdentitySettings,
}

#[derive(Debug, Clone)]
pub struct IdentitySettings {
    /// Base endpoint of the user pool service, e.g.
    /// `https://cognito-idp.ap-southeast-1.amazonaws.com`.
    pub endpoint: String,
    pub user_pool_id: String,
    pub client_id: String,
}

impl Settings {
    /// Reads every setting from the environment.
    pub fn from_env() -> Result<Self> {
        let region = cognito_region()?;
        Ok(Self {
            api_url: api_url()?,
            bucket_name: bucket_name()?,
            identity: IdentitySettings {
                endpoint: format!("https://cognito-idp.{}.amazonaws.com", region),
                user_pool_id: cognito_user_pool_id()?,
                client_id: cognito_client_id()?,
            },
        })
    }

    /// Public URL under which an object stored with `key` is served.
    pub fn public_asset_url(&self, key: &str) -> String {
        format!(
            "https://{bucket}.s3.amazonaws.com/{key}",
            bucket = self.bucket_name,
            key = key.trim_start_matches('/')
        )
    }
}
