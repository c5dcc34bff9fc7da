use crate::{
    catalog::{
        AssetFile, CatalogClient, Created, Edited, Outcome,
        lifecycle::{self, AssetSlot, RecordKind},
    },
    error::{CatalogError, Result},
    types::{Album, AlbumFields, CatalogFilter, Id},
};

const KIND: RecordKind = RecordKind {
    entity: "album",
    resource: "albums",
    slots: &[AssetSlot::AlbumArtwork],
};

/// Album repository.
pub struct Albums<'a> {
    catalog: &'a CatalogClient,
}

impl<'a> Albums<'a> {
    pub(crate) fn new(catalog: &'a CatalogClient) -> Self {
        Self { catalog }
    }

    /// Lists albums, optionally narrowed by genre, artist or a title fragment.
    ///
    /// The title fragment is matched against both album and track titles.
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Album>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(genre_id) = filter.genre_id {
            query.push(("genreId", genre_id.to_string()));
        }
        if let Some(artist_id) = filter.artist_id {
            query.push(("artistId", artist_id.to_string()));
        }
        if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            query.push(("albumTitle", title.to_string()));
            query.push(("trackTitle", title.to_string()));
        }

        self.catalog.get_json(KIND.resource, &query, KIND.entity).await
    }

    /// Album details including its track list.
    pub async fn get(&self, id: Id) -> Result<Album> {
        self.catalog
            .get_json(KIND.resource, &[("albumId", id.to_string())], KIND.entity)
            .await
    }

    pub async fn create(
        &self,
        fields: &AlbumFields,
        artwork: Option<AssetFile>,
    ) -> Result<Created<Album>> {
        validate(fields)?;
        lifecycle::create(
            self.catalog,
            &KIND,
            fields,
            vec![(AssetSlot::AlbumArtwork, artwork)],
        )
        .await
    }

    /// Updates an album. Without `artwork` the stored artwork is kept.
    pub async fn edit(
        &self,
        id: Id,
        fields: &AlbumFields,
        artwork: Option<AssetFile>,
    ) -> Result<Outcome<Edited<Album>>> {
        validate(fields)?;
        lifecycle::edit(
            self.catalog,
            &KIND,
            id,
            fields,
            vec![(AssetSlot::AlbumArtwork, artwork)],
        )
        .await
    }

    /// Deletes an album, then its artwork. `artwork_url` must be captured
    /// before the call.
    pub async fn delete(&self, id: Id, artwork_url: Option<String>) -> Result<Outcome<()>> {
        lifecycle::delete(
            self.catalog,
            &KIND,
            id,
            vec![(AssetSlot::AlbumArtwork, artwork_url)],
        )
        .await
    }
}

fn validate(fields: &AlbumFields) -> Result<()> {
    if fields.title.trim().is_empty() {
        return Err(CatalogError::Validation("Album title is required".to_string()));
    }
    Ok(())
}
