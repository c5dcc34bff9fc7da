use tabled::Table;

use crate::{
    catalog::popular,
    cli::{Context, spinner},
    error::Result,
    info,
    types::{
        AlbumTableRow, ArtistTableRow, CatalogFilter, GenreTableRow, Id, Track, TrackTableRow,
    },
    utils, warning,
};

pub async fn albums(ctx: &Context, id: Option<Id>, filter: CatalogFilter) -> Result<()> {
    if let Some(id) = id {
        let pb = spinner("Fetching album...");
        let album = ctx.catalog.albums().get(id).await;
        pb.finish_and_clear();
        let mut album = album?;

        info!(
            "{}",
            utils::join_present(
                &[
                    Some(album.title.as_str()),
                    album.artist_names.as_deref(),
                    album.release_year.as_deref()
                ],
                " · "
            )
        );
        if let Some(url) = &album.artwork_url {
            info!("Artwork: {}", url);
        }
        utils::sort_tracks_by_title(&mut album.tracks);
        print_tracks(album.tracks);
        return Ok(());
    }

    let pb = spinner("Fetching albums...");
    let albums = ctx.catalog.albums().list(&filter).await;
    pb.finish_and_clear();
    let mut albums = albums?;

    if albums.is_empty() {
        info!("No albums found.");
        return Ok(());
    }
    albums.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    let rows: Vec<AlbumTableRow> = albums.into_iter().map(AlbumTableRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn artists(ctx: &Context, id: Option<Id>, filter: CatalogFilter) -> Result<()> {
    if let Some(id) = id {
        let pb = spinner("Fetching artist...");
        let artist = ctx.catalog.artists().get(id).await;
        pb.finish_and_clear();
        let artist = artist?;

        info!("{}", artist.name);
        if let Some(born) = &artist.birth_date {
            info!("Born: {}", born);
        }
        if let Some(listeners) = artist.monthly_listeners {
            info!("Monthly listeners: {}", listeners);
        }
        if let Some(bio) = &artist.biography {
            println!("\n{}\n", bio);
        }

        let tracks = ctx
            .catalog
            .tracks()
            .list(&CatalogFilter {
                artist_id: Some(id),
                ..Default::default()
            })
            .await?;
        print_tracks(tracks);
        return Ok(());
    }

    let pb = spinner("Fetching artists...");
    let artists = ctx.catalog.artists().list(&filter).await;
    pb.finish_and_clear();
    let mut artists = artists?;

    if artists.is_empty() {
        info!("No artists found.");
        return Ok(());
    }
    artists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let rows: Vec<ArtistTableRow> = artists.into_iter().map(ArtistTableRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn genres(ctx: &Context, id: Option<Id>, filter: CatalogFilter) -> Result<()> {
    if let Some(id) = id {
        let pb = spinner("Fetching genre...");
        let genre = ctx.catalog.genres().get(id).await;
        let tracks = ctx.catalog.genres().tracks(id).await;
        pb.finish_and_clear();

        let genre = genre?;
        info!("{}", genre.name);
        let mut tracks = tracks?;
        utils::sort_tracks_by_title(&mut tracks);
        print_tracks(tracks);
        return Ok(());
    }

    let pb = spinner("Fetching genres...");
    let genres = ctx.catalog.genres().list(&filter).await;
    pb.finish_and_clear();
    let mut genres = genres?;

    if genres.is_empty() {
        info!("No genres found.");
        return Ok(());
    }
    genres.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let rows: Vec<GenreTableRow> = genres.into_iter().map(GenreTableRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub async fn tracks(ctx: &Context, id: Option<Id>, filter: CatalogFilter) -> Result<()> {
    if let Some(id) = id {
        let track = ctx.catalog.tracks().get(id).await?;
        info!(
            "{}",
            utils::join_present(
                &[
                    Some(track.title.as_str()),
                    track.artist_names.as_deref(),
                    track.album_name.as_deref(),
                    track.genre_name.as_deref()
                ],
                " · "
            )
        );
        if let Some(duration) = &track.duration {
            info!("Duration: {}", duration);
        }
        if let Some(url) = &track.song_url {
            info!("Audio: {}", url);
        }
        return Ok(());
    }

    let pb = spinner("Fetching tracks...");
    let tracks = ctx.catalog.tracks().list(&filter).await;
    pb.finish_and_clear();
    let mut tracks = tracks?;
    utils::sort_tracks_by_title(&mut tracks);
    print_tracks(tracks);
    Ok(())
}

/// Counts a play and hands the audio URL to the system's default handler.
pub async fn play(ctx: &Context, id: Id) -> Result<()> {
    ctx.auth.require_signed_in()?;
    let track = ctx.catalog.tracks().get(id).await?;
    let Some(song_url) = track.song_url.as_deref() else {
        warning!("{} has no audio file.", track.title);
        return Ok(());
    };

    if let Err(e) = popular::record_play(&ctx.catalog, id).await {
        warning!("Could not record the play: {}", e.user_message());
    }

    info!("Playing {}", track.title);
    if webbrowser::open(song_url).is_err() {
        warning!("Could not open a player. Stream it from {}", song_url);
    }
    Ok(())
}

pub(crate) fn print_tracks(tracks: Vec<Track>) {
    if tracks.is_empty() {
        info!("No tracks found.");
        return;
    }
    let rows: Vec<TrackTableRow> = tracks.into_iter().map(TrackTableRow::from).collect();
    println!("{}", Table::new(rows));
}
