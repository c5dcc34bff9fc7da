use tracing::debug;

use crate::{
    error::{CatalogError, Result},
    identity::UserProfile,
    management::SessionManager,
};

#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Loading,
    Anonymous,
    SignedIn(UserProfile),
}

/// Who is using the client, resolved once at startup and updated on sign-in
/// and sign-out. Commands receive it explicitly and gate on it.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    state: AuthState,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// A context resolved from a stored session.
    pub async fn initialize(session: Option<&SessionManager>) -> Self {
        let mut ctx = Self::new();
        ctx.resolve(session).await;
        ctx
    }

    /// Resolves the user from a stored session. Any failure, including an
    /// expired session that cannot be renewed, leaves the context anonymous.
    pub async fn resolve(&mut self, session: Option<&SessionManager>) {
        self.state = match session {
            Some(manager) => match manager.valid_session().await {
                Ok(session) => match UserProfile::from_id_token(&session.id_token) {
                    Ok(profile) => AuthState::SignedIn(profile),
                    Err(e) => {
                        debug!(error = %e, "stored identity token is unreadable");
                        AuthState::Anonymous
                    }
                },
                Err(e) => {
                    debug!(error = %e, "no usable session");
                    AuthState::Anonymous
                }
            },
            None => AuthState::Anonymous,
        };
    }

    pub fn signed_in(&mut self, profile: UserProfile) {
        self.state = AuthState::SignedIn(profile);
    }

    pub fn signed_out(&mut self) {
        self.state = AuthState::Anonymous;
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.state {
            AuthState::SignedIn(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(UserProfile::is_admin)
    }

    /// Fails until the stored session has been resolved, then for anonymous
    /// users.
    pub fn require_signed_in(&self) -> Result<&UserProfile> {
        match &self.state {
            AuthState::SignedIn(profile) => Ok(profile),
            AuthState::Loading => Err(CatalogError::Auth(
                "the stored session has not been checked yet".to_string(),
            )),
            AuthState::Anonymous => Err(CatalogError::Auth(
                "not signed in. Please run dreamstreamer auth sign-in".to_string(),
            )),
        }
    }

    /// Guard for catalog administration.
    pub fn require_admin(&self) -> Result<&UserProfile> {
        let user = self.require_signed_in()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(CatalogError::Forbidden(format!(
                "{} is not an administrator",
                user.name()
            )))
        }
    }
}
