use std::collections::BTreeSet;

use tracing::warn;

use crate::{
    catalog::{self, CatalogClient},
    error::Result,
    types::Id,
};

/// Client-held favorite membership.
///
/// Toggles apply locally first and are reverted if the remote write fails.
/// There is no coordination with other clients; the last toggle wins.
pub struct FavoritesManager {
    catalog: CatalogClient,
    favorites: BTreeSet<Id>,
}

impl FavoritesManager {
    pub fn new(catalog: CatalogClient, favorites: impl IntoIterator<Item = Id>) -> Self {
        Self {
            catalog,
            favorites: favorites.into_iter().collect(),
        }
    }

    /// Starts from the user's stored favorites.
    pub async fn load(catalog: CatalogClient) -> Result<Self> {
        let tracks = catalog::favorites::list(&catalog).await?;
        Ok(Self::new(catalog, tracks.into_iter().map(|t| t.id)))
    }

    pub fn contains(&self, track_id: Id) -> bool {
        self.favorites.contains(&track_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.favorites.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Flips membership of `track_id` and returns the new state.
    pub async fn toggle(&mut self, track_id: Id) -> Result<bool> {
        let was_favorite = !self.favorites.insert(track_id);
        if was_favorite {
            self.favorites.remove(&track_id);
        }

        let written = if was_favorite {
            catalog::favorites::remove(&self.catalog, track_id).await
        } else {
            catalog::favorites::add(&self.catalog, track_id).await
        };

        match written {
            Ok(()) => Ok(!was_favorite),
            Err(e) => {
                warn!(track_id, error = %e, "favorite update failed, reverting");
                if was_favorite {
                    self.favorites.insert(track_id);
                } else {
                    self.favorites.remove(&track_id);
                }
                Err(e)
            }
        }
    }
}
