use crate::{
    catalog::{
        AssetFile, CatalogClient, Created, Edited, Outcome,
        lifecycle::{self, AssetSlot, RecordKind},
    },
    error::{CatalogError, Result},
    types::{CatalogFilter, Genre, GenreFields, Id, Track},
};

const KIND: RecordKind = RecordKind {
    entity: "genre",
    resource: "genres",
    slots: &[AssetSlot::GenreImage],
};

/// Genre repository.
pub struct Genres<'a> {
    catalog: &'a CatalogClient,
}

impl<'a> Genres<'a> {
    pub(crate) fn new(catalog: &'a CatalogClient) -> Self {
        Self { catalog }
    }

    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Genre>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(artist_id) = filter.artist_id {
            query.push(("artistId", artist_id.to_string()));
        }
        if let Some(name) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            query.push(("genreName", name.to_string()));
        }

        self.catalog.get_json(KIND.resource, &query, KIND.entity).await
    }

    /// A single genre. The API has no detail endpoint for genres, so this is
    /// answered from the full listing.
    pub async fn get(&self, id: Id) -> Result<Genre> {
        self.list(&CatalogFilter::default())
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| {
                CatalogError::record(KIND.entity, "fetch", Some(format!("Genre {} not found", id)))
            })
    }

    /// Tracks filed under a genre. The genre itself is not part of the answer;
    /// its name is repeated on every track as `genre_name`.
    pub async fn tracks(&self, id: Id) -> Result<Vec<Track>> {
        self.catalog
            .get_json(KIND.resource, &[("genreId", id.to_string())], KIND.entity)
            .await
    }

    pub async fn create(
        &self,
        fields: &GenreFields,
        image: Option<AssetFile>,
    ) -> Result<Created<Genre>> {
        validate(fields)?;
        lifecycle::create(
            self.catalog,
            &KIND,
            fields,
            vec![(AssetSlot::GenreImage, image)],
        )
        .await
    }

    pub async fn edit(
        &self,
        id: Id,
        fields: &GenreFields,
        image: Option<AssetFile>,
    ) -> Result<Outcome<Edited<Genre>>> {
        validate(fields)?;
        lifecycle::edit(
            self.catalog,
            &KIND,
            id,
            fields,
            vec![(AssetSlot::GenreImage, image)],
        )
        .await
    }

    pub async fn delete(&self, id: Id, image_url: Option<String>) -> Result<Outcome<()>> {
        lifecycle::delete(
            self.catalog,
            &KIND,
            id,
            vec![(AssetSlot::GenreImage, image_url)],
        )
        .await
    }
}

fn validate(fields: &GenreFields) -> Result<()> {
    if fields.name.trim().is_empty() {
        return Err(CatalogError::Validation("Genre name is required".to_string()));
    }
    Ok(())
}
