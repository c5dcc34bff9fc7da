use crate::{
    catalog::{
        AssetFile, CatalogClient, Created, Edited, Outcome,
        lifecycle::{self, AssetSlot, RecordKind},
    },
    error::{CatalogError, Result},
    types::{CatalogFilter, Id, Track, TrackFields},
};

const KIND: RecordKind = RecordKind {
    entity: "track",
    resource: "tracks",
    slots: &[AssetSlot::TrackImage, AssetSlot::TrackSong],
};

/// Track repository. A track owns two assets: cover image and audio file.
pub struct Tracks<'a> {
    catalog: &'a CatalogClient,
}

impl<'a> Tracks<'a> {
    pub(crate) fn new(catalog: &'a CatalogClient) -> Self {
        Self { catalog }
    }

    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Track>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(genre_id) = filter.genre_id {
            query.push(("genreId", genre_id.to_string()));
        }
        if let Some(artist_id) = filter.artist_id {
            query.push(("artistId", artist_id.to_string()));
        }
        if let Some(title) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            query.push(("trackTitle", title.to_string()));
        }

        self.catalog.get_json(KIND.resource, &query, KIND.entity).await
    }

    pub async fn get(&self, id: Id) -> Result<Track> {
        self.catalog
            .get_json(KIND.resource, &[("trackId", id.to_string())], KIND.entity)
            .await
    }

    /// Creates a track. The song file is mandatory and is checked before
    /// anything is uploaded.
    pub async fn create(
        &self,
        fields: &TrackFields,
        image: Option<AssetFile>,
        song: Option<AssetFile>,
    ) -> Result<Created<Track>> {
        validate(fields)?;
        if song.is_none() {
            return Err(CatalogError::Validation(
                "A song file is required for a new track".to_string(),
            ));
        }

        lifecycle::create(
            self.catalog,
            &KIND,
            fields,
            vec![(AssetSlot::TrackImage, image), (AssetSlot::TrackSong, song)],
        )
        .await
    }

    pub async fn edit(
        &self,
        id: Id,
        fields: &TrackFields,
        image: Option<AssetFile>,
        song: Option<AssetFile>,
    ) -> Result<Outcome<Edited<Track>>> {
        validate(fields)?;
        lifecycle::edit(
            self.catalog,
            &KIND,
            id,
            fields,
            vec![(AssetSlot::TrackImage, image), (AssetSlot::TrackSong, song)],
        )
        .await
    }

    /// Deletes a track, then its image and song.
    pub async fn delete(
        &self,
        id: Id,
        image_url: Option<String>,
        song_url: Option<String>,
    ) -> Result<Outcome<()>> {
        lifecycle::delete(
            self.catalog,
            &KIND,
            id,
            vec![
                (AssetSlot::TrackImage, image_url),
                (AssetSlot::TrackSong, song_url),
            ],
        )
        .await
    }
}

fn validate(fields: &TrackFields) -> Result<()> {
    if fields.title.trim().is_empty() {
        return Err(CatalogError::Validation("Track title is required".to_string()));
    }
    Ok(())
}
