use crate::{catalog::CatalogClient, error::Result, types::Track};

/// Full-text search over track, artist and album names.
pub async fn tracks(catalog: &CatalogClient, term: &str) -> Result<Vec<Track>> {
    catalog
        .get_json("search", &[("searchTerm", term.to_string())], "track")
        .await
}
