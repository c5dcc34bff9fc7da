//! Favorite tracks of the signed-in user.

use tracing::debug;

use crate::{
    catalog::CatalogClient,
    error::Result,
    types::{Id, Track, TrackReference},
};

const RESOURCE: &str = "favorites";
const ENTITY: &str = "favorite";

pub async fn list(catalog: &CatalogClient) -> Result<Vec<Track>> {
    catalog.get_json_authed(RESOURCE, ENTITY).await
}

pub async fn add(catalog: &CatalogClient, track_id: Id) -> Result<()> {
    let request = catalog
        .http()
        .post(catalog.url(RESOURCE))
        .json(&TrackReference { track_id });
    let request = catalog.authorize(request).await?;
    catalog.send(request, ENTITY, "add").await?;
    debug!(track_id, "favorite added");
    Ok(())
}

/// Removes a favorite. The track id travels in the request body.
pub async fn remove(catalog: &CatalogClient, track_id: Id) -> Result<()> {
    let request = catalog
        .http()
        .delete(catalog.url(RESOURCE))
        .json(&TrackReference { track_id });
    let request = catalog.authorize(request).await?;
    catalog.send(request, ENTITY, "remove").await?;
    debug!(track_id, "favorite removed");
    Ok(())
}
