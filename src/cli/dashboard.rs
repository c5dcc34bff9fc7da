use colored::Colorize;
use tabled::Table;

use crate::{
    catalog::popular,
    cli::{Context, spinner},
    error::Result,
    info,
    types::PopularTableRow,
};

/// Prints the engagement dashboard. Admin only.
pub async fn dashboard(ctx: &Context, limit: usize) -> Result<()> {
    ctx.auth.require_admin()?;

    let pb = spinner("Fetching engagement data...");
    let data = popular::dashboard(&ctx.catalog).await;
    pb.finish_and_clear();
    let data = data?;

    section(
        "Popular albums",
        data.albums.into_iter().map(|a| {
            (a.title, a.artist_name.unwrap_or_default(), a.play_count)
        }),
        limit,
    );
    section(
        "Popular tracks",
        data.tracks.into_iter().map(|t| {
            (t.title, t.artist_names.unwrap_or_default(), t.play_count)
        }),
        limit,
    );
    section(
        "Popular artists",
        data.artists
            .into_iter()
            .map(|a| (a.name, String::new(), a.play_count)),
        limit,
    );
    section(
        "Popular genres",
        data.genres
            .into_iter()
            .map(|g| (g.name, String::new(), g.play_count)),
        limit,
    );
    Ok(())
}

fn section(
    title: &str,
    entries: impl Iterator<Item = (String, String, u64)>,
    limit: usize,
) {
    println!("\n{}", title.bold());

    let rows: Vec<PopularTableRow> = entries
        .take(limit)
        .enumerate()
        .map(|(i, (name, detail, plays))| PopularTableRow {
            rank: i + 1,
            name,
            detail,
            plays,
        })
        .collect();

    if rows.is_empty() {
        info!("No plays recorded yet.");
    } else {
        println!("{}", Table::new(rows));
    }
}
