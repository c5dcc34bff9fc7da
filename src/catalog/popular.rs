//! Engagement analytics and play recording.

use serde::de::DeserializeOwned;

use crate::{
    catalog::CatalogClient,
    error::Result,
    types::{Id, PopularAlbum, PopularArtist, PopularGenre, PopularTrack, TrackReference},
};

const RESOURCE: &str = "popular-content";

async fn fetch<T: DeserializeOwned>(catalog: &CatalogClient, kind: &str) -> Result<Vec<T>> {
    catalog
        .get_json(RESOURCE, &[("type", kind.to_string())], "popular content")
        .await
}

pub async fn albums(catalog: &CatalogClient) -> Result<Vec<PopularAlbum>> {
    fetch(catalog, "popularAlbums").await
}

pub async fn tracks(catalog: &CatalogClient) -> Result<Vec<PopularTrack>> {
    fetch(catalog, "popularTracks").await
}

pub async fn artists(catalog: &CatalogClient) -> Result<Vec<PopularArtist>> {
    fetch(catalog, "popularArtists").await
}

pub async fn genres(catalog: &CatalogClient) -> Result<Vec<PopularGenre>> {
    fetch(catalog, "popularGenres").await
}

/// Everything the engagement dashboard shows.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub albums: Vec<PopularAlbum>,
    pub tracks: Vec<PopularTrack>,
    pub artists: Vec<PopularArtist>,
    pub genres: Vec<PopularGenre>,
}

/// Fetches the four popular collections concurrently.
pub async fn dashboard(catalog: &CatalogClient) -> Result<Dashboard> {
    let (albums, tracks, artists, genres) = tokio::join!(
        albums(catalog),
        tracks(catalog),
        artists(catalog),
        genres(catalog)
    );

    Ok(Dashboard {
        albums: albums?,
        tracks: tracks?,
        artists: artists?,
        genres: genres?,
    })
}

/// Counts a play of `track_id` for the signed-in user.
pub async fn record_play(catalog: &CatalogClient, track_id: Id) -> Result<()> {
    let request = catalog
        .http()
        .post(catalog.url(RESOURCE))
        .json(&TrackReference { track_id });
    let request = catalog.authorize(request).await?;
    catalog.send(request, "track play", "record").await?;
    Ok(())
}
