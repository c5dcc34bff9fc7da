//! # Catalog Integration Module
//!
//! This module is the client side of the DreamStreamer catalog API. It covers the
//! four catalog entities (albums, artists, genres, tracks), the object store that
//! holds their artwork and audio, and the engagement endpoints (favorites,
//! recently played, search, popular content).
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management)
//!          ↓
//! Catalog Integration Layer
//!     ├── Entity repositories (albums, artists, genres, tracks)
//!     ├── Lifecycle orchestration (upload → mutate → clean up)
//!     ├── Object store (pre-signed uploads, server-side deletes)
//!     └── Engagement (favorites, recently played, search, popular content)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! DreamStreamer REST API
//! ```
//!
//! ## Authentication
//!
//! Reads are public. Every mutating call, and every per-user read, carries an
//! `Authorization: Bearer <id token>` header obtained from the
//! [`CredentialProvider`] the client was built with.
//!
//! ## Error Handling
//!
//! Non-success responses become [`CatalogError::RecordOperation`] carrying the
//! backend's own `message` when it sent one. No request is retried.

pub mod albums;
pub mod artists;
pub mod favorites;
pub mod genres;
pub mod lifecycle;
pub mod popular;
pub mod recently_played;
pub mod search;
pub mod storage;
pub mod tracks;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Settings,
    error::{CatalogError, Result},
};

pub use albums::Albums;
pub use artists::Artists;
pub use genres::Genres;
pub use lifecycle::{AssetSlot, Created, Edited, Outcome};
pub use storage::{AssetFile, ObjectStore};
pub use tracks::Tracks;

/// Source of the bearer token attached to authenticated requests.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// A fixed token, for scripts and tests.
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// HTTP client for the catalog API. Cheap to clone.
#[derive(Clone)]
pub struct CatalogClient {
    http: Client,
    settings: Arc<Settings>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl CatalogClient {
    pub fn new(settings: Settings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(format!("dreamstreamer/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            settings: Arc::new(settings),
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn albums(&self) -> Albums<'_> {
        Albums::new(self)
    }

    pub fn artists(&self) -> Artists<'_> {
        Artists::new(self)
    }

    pub fn genres(&self) -> Genres<'_> {
        Genres::new(self)
    }

    pub fn tracks(&self) -> Tracks<'_> {
        Tracks::new(self)
    }

    pub fn storage(&self) -> ObjectStore<'_> {
        ObjectStore::new(self)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.settings.api_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn token(&self) -> Result<String> {
        match &self.credentials {
            Some(credentials) => credentials.bearer_token().await,
            None => Err(CatalogError::Auth(
                "not signed in. Please run dreamstreamer auth sign-in".to_string(),
            )),
        }
    }

    /// Attaches the bearer token to a request.
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().await?;
        Ok(request.bearer_auth(token))
    }

    /// Sends a request and turns a non-success status into a record error.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        entity: &'static str,
        operation: &'static str,
    ) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(entity, operation, status = status.as_u16(), "catalog response");

        if status.is_success() {
            Ok(response)
        } else {
            let reason = backend_reason(response).await;
            Err(CatalogError::record(entity, operation, reason))
        }
    }

    /// Public read returning JSON.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        entity: &'static str,
    ) -> Result<T> {
        let request = self.http.get(self.url(path)).query(query);
        let response = self.send(request, entity, "fetch").await?;
        Ok(response.json::<T>().await?)
    }

    /// Per-user read returning JSON.
    pub(crate) async fn get_json_authed<T: DeserializeOwned>(
        &self,
        path: &str,
        entity: &'static str,
    ) -> Result<T> {
        let request = self.authorize(self.http.get(self.url(path))).await?;
        let response = self.send(request, entity, "fetch").await?;
        Ok(response.json::<T>().await?)
    }
}

/// Reads the body of a response as JSON, tolerating empty or non-JSON bodies.
pub(crate) async fn body_value(response: Response) -> Value {
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => serde_json::from_str(&text).unwrap_or(Value::Null),
        _ => Value::Null,
    }
}

async fn backend_reason(response: Response) -> Option<String> {
    let text = response.text().await.ok()?;
    if text.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => ["message", "error"]
            .iter()
            .find_map(|k| json.get(*k).and_then(Value::as_str))
            .map(str::to_string),
        Err(_) => Some(text),
    }
}
