//! # CLI Module
//!
//! This module provides the command-line interface layer for DreamStreamer, a
//! client for the DreamStreamer music catalog. It implements all user-facing
//! commands and coordinates between the catalog client, the identity provider
//! and the locally held session.
//!
//! ## Command Categories
//!
//! ### Account
//! - [`auth`] - Sign-up, confirmation, sign-in (including the new-password
//!   challenge), sign-out, profile and password changes
//!
//! ### Browsing
//! - [`albums`], [`artists`], [`genres`], [`tracks`] - List and inspect the catalog
//! - [`search`] - One-shot or interactive search-as-you-type
//! - [`play`] - Record a play and open the track's audio
//!
//! ### Library
//! - [`favorites`], [`toggle_favorite`] - The signed-in user's favorite tracks
//! - [`recently_played`] - Playback history
//!
//! ### Administration
//! - [`admin`] - Create, edit and delete albums, artists, genres and tracks
//! - [`dashboard`] - Engagement analytics
//!
//! Admin commands check the role carried by the identity token before any
//! request is made.
//!
//! ## Error Handling
//!
//! Every command returns a [`Result`](crate::error::Result); `main` turns a
//! failure into a single user-facing message. Cleanup problems after a
//! successful change are printed as warnings and do not fail the command.

mod admin;
mod auth;
mod browse;
mod dashboard;
mod library;
mod search;

pub use admin::{AdminAction, AdminEntity, RecordInput, admin};
pub use auth::{AuthAction, auth};
pub use browse::{albums, artists, genres, play, tracks};
pub use dashboard::dashboard;
pub use library::{favorites, recently_played, toggle_favorite};
pub use search::search;

use std::{sync::Arc, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    catalog::{CatalogClient, Outcome},
    config::Settings,
    error::Result,
    identity::IdentityProvider,
    management::{AuthContext, SessionManager},
    warning,
};

/// Everything a command needs, built once in `main`.
pub struct Context {
    pub settings: Settings,
    pub catalog: CatalogClient,
    pub identity: IdentityProvider,
    pub session: Option<Arc<SessionManager>>,
    pub auth: AuthContext,
}

impl Context {
    /// Wires the clients together and resolves the current user from the
    /// stored session, if there is one.
    pub async fn load(settings: Settings) -> Result<Self> {
        let identity = IdentityProvider::new(settings.identity.clone());
        let session = SessionManager::load(identity.clone()).await.ok().map(Arc::new);

        let mut catalog = CatalogClient::new(settings.clone())?;
        if let Some(session) = &session {
            catalog = catalog.with_credentials(session.clone());
        }
        let auth = AuthContext::initialize(session.as_deref()).await;

        Ok(Self {
            settings,
            catalog,
            identity,
            session,
            auth,
        })
    }
}

pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Prints the non-fatal cleanup problems of a finished mutation.
pub(crate) fn report_warnings<T>(outcome: &Outcome<T>) {
    for w in &outcome.warnings {
        warning!("{}", w.user_message());
    }
}
