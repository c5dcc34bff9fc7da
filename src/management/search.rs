//! Search-as-you-type.
//!
//! Input is debounced: every change restarts an idle timer and only the term
//! present when the timer fires is searched. Each issued search carries a
//! generation number; a response is applied only if it belongs to the latest
//! generation and its term still equals the current input. Requests are never
//! aborted, late answers are simply dropped.

use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::{sync::watch, time::sleep};
use tracing::debug;

use crate::{error::Result, types::Track};

/// What a search front end should currently display.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    pub term: String,
    pub tracks: Vec<Track>,
    pub loading: bool,
    pub error: Option<String>,
}

/// A running search session. Dropping it cancels any pending debounce.
pub struct SearchSession {
    input: watch::Sender<String>,
    view: watch::Receiver<SearchView>,
}

impl SearchSession {
    /// Starts the debounce task on the current runtime. `search` performs the
    /// actual request for a term.
    pub fn spawn<F, Fut>(window: Duration, search: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<Track>>> + Send + 'static,
    {
        let (input_tx, input_rx) = watch::channel(String::new());
        let (view_tx, view_rx) = watch::channel(SearchView::default());

        tokio::spawn(debounce(
            window,
            input_rx,
            Arc::new(view_tx),
            Arc::new(search),
        ));

        Self {
            input: input_tx,
            view: view_rx,
        }
    }

    /// Replaces the current input, as a keystroke would.
    pub fn input(&self, term: impl Into<String>) {
        self.input.send_replace(term.into());
    }

    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }
}

async fn debounce<F, Fut>(
    window: Duration,
    mut input: watch::Receiver<String>,
    view: Arc<watch::Sender<SearchView>>,
    search: Arc<F>,
) where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Track>>> + Send + 'static,
{
    let generation = Arc::new(AtomicU64::new(0));

    loop {
        if input.changed().await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = sleep(window) => break,
            }
        }

        let term = input.borrow_and_update().clone();
        let issued = generation.fetch_add(1, Ordering::SeqCst) + 1;

        if term.trim().is_empty() {
            view.send_replace(SearchView::default());
            continue;
        }

        debug!(term = %term, generation = issued, "issuing search");
        view.send_modify(|v| v.loading = true);

        let request = search(term.clone());
        let generation = Arc::clone(&generation);
        let current_input = input.clone();
        let view = Arc::clone(&view);
        tokio::spawn(async move {
            let result = request.await;

            let latest = generation.load(Ordering::SeqCst) == issued;
            if !latest || *current_input.borrow() != term {
                debug!(term = %term, generation = issued, "dropping stale search response");
                return;
            }

            view.send_replace(match result {
                Ok(tracks) => SearchView {
                    term,
                    tracks,
                    loading: false,
                    error: None,
                },
                Err(e) => SearchView {
                    term,
                    tracks: Vec::new(),
                    loading: false,
                    error: Some(e.user_message()),
                },
            });
        });
    }
}
