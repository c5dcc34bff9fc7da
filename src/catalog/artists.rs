use crate::{
    catalog::{
        AssetFile, CatalogClient, Created, Edited, Outcome,
        lifecycle::{self, AssetSlot, RecordKind},
    },
    error::{CatalogError, Result},
    types::{Artist, ArtistFields, CatalogFilter, Id},
};

const KIND: RecordKind = RecordKind {
    entity: "artist",
    resource: "artists",
    slots: &[AssetSlot::ArtistImage],
};

/// Artist repository.
pub struct Artists<'a> {
    catalog: &'a CatalogClient,
}

impl<'a> Artists<'a> {
    pub(crate) fn new(catalog: &'a CatalogClient) -> Self {
        Self { catalog }
    }

    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<Artist>> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(genre_id) = filter.genre_id {
            query.push(("genreId", genre_id.to_string()));
        }
        if let Some(artist_id) = filter.artist_id {
            query.push(("artistId", artist_id.to_string()));
        }
        if let Some(name) = filter.title.as_deref().filter(|t| !t.is_empty()) {
            query.push(("artistName", name.to_string()));
        }

        self.catalog.get_json(KIND.resource, &query, KIND.entity).await
    }

    pub async fn get(&self, id: Id) -> Result<Artist> {
        self.catalog
            .get_json(KIND.resource, &[("artistId", id.to_string())], KIND.entity)
            .await
    }

    pub async fn create(
        &self,
        fields: &ArtistFields,
        image: Option<AssetFile>,
    ) -> Result<Created<Artist>> {
        validate(fields)?;
        lifecycle::create(
            self.catalog,
            &KIND,
            fields,
            vec![(AssetSlot::ArtistImage, image)],
        )
        .await
    }

    pub async fn edit(
        &self,
        id: Id,
        fields: &ArtistFields,
        image: Option<AssetFile>,
    ) -> Result<Outcome<Edited<Artist>>> {
        validate(fields)?;
        lifecycle::edit(
            self.catalog,
            &KIND,
            id,
            fields,
            vec![(AssetSlot::ArtistImage, image)],
        )
        .await
    }

    pub async fn delete(&self, id: Id, image_url: Option<String>) -> Result<Outcome<()>> {
        lifecycle::delete(
            self.catalog,
            &KIND,
            id,
            vec![(AssetSlot::ArtistImage, image_url)],
        )
        .await
    }
}

fn validate(fields: &ArtistFields) -> Result<()> {
    if fields.name.trim().is_empty() {
        return Err(CatalogError::Validation("Artist name is required".to_string()));
    }
    Ok(())
}
