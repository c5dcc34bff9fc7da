use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    catalog::CredentialProvider,
    config,
    error::{CatalogError, Result},
    identity::IdentityProvider,
    types::Session,
};

/// Seconds before expiry at which tokens are renewed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Owns the signed-in user's tokens: persists them between runs and renews
/// them shortly before they expire.
pub struct SessionManager {
    session: Mutex<Session>,
    identity: IdentityProvider,
    path: PathBuf,
}

impl SessionManager {
    pub fn new(session: Session, identity: IdentityProvider) -> Self {
        SessionManager {
            session: Mutex::new(session),
            identity,
            path: Self::session_path(),
        }
    }

    /// Stores the session file somewhere other than the data directory.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub async fn load(identity: IdentityProvider) -> Result<Self> {
        Self::load_from(Self::session_path(), identity).await
    }

    pub async fn load_from(path: PathBuf, identity: IdentityProvider) -> Result<Self> {
        let content = async_fs::read_to_string(&path).await?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Self {
            session: Mutex::new(session),
            identity,
            path,
        })
    }

    pub async fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&*self.session.lock().await)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Deletes the stored session file, if any.
    pub async fn forget(&self) -> Result<()> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn current(&self) -> Session {
        self.session.lock().await.clone()
    }

    /// The session with tokens that are good for at least a few more minutes.
    pub async fn valid_session(&self) -> Result<Session> {
        let mut session = self.session.lock().await;
        if Self::is_expired(&session) {
            debug!(user = %session.username, "refreshing identity tokens");
            let renewed = self.identity.refresh(&session).await.map_err(|e| {
                warn!(error = %e, "token refresh failed");
                CatalogError::Auth(
                    "session expired. Please run dreamstreamer auth sign-in".to_string(),
                )
            })?;
            *session = renewed;
            drop(session);

            if let Err(e) = self.persist().await {
                warn!(error = %e, "failed to persist refreshed session");
            }
            return Ok(self.current().await);
        }

        Ok(session.clone())
    }

    pub fn is_expired(session: &Session) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + REFRESH_MARGIN_SECS >= session.obtained_at + session.expires_in
    }

    pub fn session_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        path
    }
}

#[async_trait]
impl CredentialProvider for SessionManager {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.valid_session().await?.id_token)
    }
}
