use crate::{catalog::CatalogClient, error::Result, types::RecentlyPlayed};

/// Tracks the signed-in user played most recently, newest first as ordered by
/// the backend.
pub async fn list(catalog: &CatalogClient) -> Result<Vec<RecentlyPlayed>> {
    catalog
        .get_json_authed("recently-played", "recently played track")
        .await
}
