use tabled::Table;

use crate::{
    catalog::{self, recently_played as history},
    cli::{Context, browse::print_tracks, spinner},
    error::Result,
    info,
    management::FavoritesManager,
    success,
    types::{Id, TrackTableRow},
};

pub async fn favorites(ctx: &Context) -> Result<()> {
    ctx.auth.require_signed_in()?;

    let pb = spinner("Fetching favorites...");
    let tracks = catalog::favorites::list(&ctx.catalog).await;
    pb.finish_and_clear();

    print_tracks(tracks?);
    Ok(())
}

/// Adds or removes `track_id` from the user's favorites, whichever applies.
pub async fn toggle_favorite(ctx: &Context, track_id: Id) -> Result<()> {
    ctx.auth.require_signed_in()?;

    let mut favorites = FavoritesManager::load(ctx.catalog.clone()).await?;
    if favorites.toggle(track_id).await? {
        success!("Added track {} to favorites", track_id);
    } else {
        success!("Removed track {} from favorites", track_id);
    }
    info!("{} favorite tracks", favorites.len());
    Ok(())
}

pub async fn recently_played(ctx: &Context) -> Result<()> {
    ctx.auth.require_signed_in()?;

    let pb = spinner("Fetching history...");
    let entries = history::list(&ctx.catalog).await;
    pb.finish_and_clear();
    let entries = entries?;

    if entries.is_empty() {
        info!("Nothing played yet.");
        return Ok(());
    }

    #[derive(tabled::Tabled)]
    struct HistoryRow {
        played: String,
        #[tabled(inline)]
        track: TrackTableRow,
    }

    let rows: Vec<HistoryRow> = entries
        .into_iter()
        .map(|e| HistoryRow {
            played: e.played_at.unwrap_or_default(),
            track: TrackTableRow::from(e.track),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}
