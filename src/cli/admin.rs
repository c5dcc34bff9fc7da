use std::path::{Path, PathBuf};

use crate::{
    catalog::{AssetFile, Created, Edited, Outcome},
    cli::{Context, report_warnings, spinner},
    error::{CatalogError, Result},
    info,
    types::{AlbumFields, ArtistFields, GenreFields, Id, TrackFields},
    success, utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEntity {
    Album,
    Artist,
    Genre,
    Track,
}

impl AdminEntity {
    fn label(self) -> &'static str {
        match self {
            AdminEntity::Album => "album",
            AdminEntity::Artist => "artist",
            AdminEntity::Genre => "genre",
            AdminEntity::Track => "track",
        }
    }
}

/// Field values given on the command line. Which ones apply depends on the
/// entity; unset values are taken from the stored record when editing.
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub title: Option<String>,
    pub release_year: Option<String>,
    pub biography: Option<String>,
    pub birth_date: Option<String>,
    pub duration: Option<String>,
    pub genre_id: Option<Id>,
    pub album_id: Option<Id>,
    pub artist_ids: Vec<Id>,
    pub image: Option<PathBuf>,
    pub song: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum AdminAction {
    Create(RecordInput),
    Edit { id: Id, input: RecordInput },
    Delete { id: Id },
}

pub async fn admin(ctx: &Context, entity: AdminEntity, action: AdminAction) -> Result<()> {
    let user = ctx.auth.require_admin()?;
    tracing::debug!(admin = %user.username, entity = entity.label(), "catalog change");

    match action {
        AdminAction::Create(input) => create(ctx, entity, input).await,
        AdminAction::Edit { id, input } => edit(ctx, entity, id, input).await,
        AdminAction::Delete { id } => delete(ctx, entity, id).await,
    }
}

async fn create(ctx: &Context, entity: AdminEntity, input: RecordInput) -> Result<()> {
    let image = read_asset(input.image.as_deref()).await?;
    let song = match entity {
        AdminEntity::Track => read_asset(input.song.as_deref()).await?,
        _ => None,
    };
    let title = input.title.unwrap_or_default();
    let pb = spinner(&format!("Creating {}...", entity.label()));

    let created = match entity {
        AdminEntity::Album => {
            let fields = AlbumFields {
                title,
                release_year: input.release_year,
                artist_id: input.artist_ids.first().copied(),
            };
            ctx.catalog
                .albums()
                .create(&fields, image)
                .await
                .map(|c| summarize(c, |a| (a.id, a.title)))
        }
        AdminEntity::Artist => {
            let fields = ArtistFields {
                name: title,
                biography: input.biography,
                birth_date: input.birth_date,
            };
            ctx.catalog
                .artists()
                .create(&fields, image)
                .await
                .map(|c| summarize(c, |a| (a.id, a.name)))
        }
        AdminEntity::Genre => ctx
            .catalog
            .genres()
            .create(&GenreFields { name: title }, image)
            .await
            .map(|c| summarize(c, |g| (g.id, g.name))),
        AdminEntity::Track => {
            let fields = TrackFields {
                title,
                genre_id: input.genre_id,
                duration: input.duration,
                artist_ids: input.artist_ids,
                album_id: input.album_id,
            };
            ctx.catalog
                .tracks()
                .create(&fields, image, song)
                .await
                .map(|c| summarize(c, |t| (t.id, t.title)))
        }
    };
    pb.finish_and_clear();

    match created? {
        (Some((id, name)), _) => success!("Created {} {} ({})", entity.label(), name, id),
        (None, Some(message)) => success!("{}", message),
        (None, None) => success!("Created {}", entity.label()),
    }
    Ok(())
}

fn summarize<T>(
    created: Created<T>,
    describe: impl FnOnce(T) -> (Id, String),
) -> (Option<(Id, String)>, Option<String>) {
    (created.record.map(describe), created.message)
}

async fn edit(ctx: &Context, entity: AdminEntity, id: Id, input: RecordInput) -> Result<()> {
    let image = read_asset(input.image.as_deref()).await?;
    let song = match entity {
        AdminEntity::Track => read_asset(input.song.as_deref()).await?,
        _ => None,
    };
    let pb = spinner(&format!("Updating {}...", entity.label()));

    let outcome: Result<Outcome<Option<String>>> = async move {
        let outcome = match entity {
            AdminEntity::Album => {
                let current = ctx.catalog.albums().get(id).await?;
                let fields = AlbumFields {
                    title: input.title.unwrap_or(current.title),
                    release_year: input.release_year.or(current.release_year),
                    artist_id: input.artist_ids.first().copied().or_else(|| {
                        current
                            .artist_ids
                            .as_deref()
                            .and_then(|ids| utils::parse_id_list(ids).first().copied())
                    }),
                };
                message_of(ctx.catalog.albums().edit(id, &fields, image).await?)
            }
            AdminEntity::Artist => {
                let current = ctx.catalog.artists().get(id).await?;
                let fields = ArtistFields {
                    name: input.title.unwrap_or(current.name),
                    biography: input.biography.or(current.biography),
                    birth_date: input.birth_date.or(current.birth_date),
                };
                message_of(ctx.catalog.artists().edit(id, &fields, image).await?)
            }
            AdminEntity::Genre => {
                let current = ctx.catalog.genres().get(id).await?;
                let fields = GenreFields {
                    name: input.title.unwrap_or(current.name),
                };
                message_of(ctx.catalog.genres().edit(id, &fields, image).await?)
            }
            AdminEntity::Track => {
                let current = ctx.catalog.tracks().get(id).await?;
                let artist_ids = if input.artist_ids.is_empty() {
                    current
                        .artist_ids
                        .as_deref()
                        .map(utils::parse_id_list)
                        .unwrap_or_default()
                } else {
                    input.artist_ids
                };
                let fields = TrackFields {
                    title: input.title.unwrap_or(current.title),
                    genre_id: input.genre_id.or(current.genre_id),
                    duration: input.duration.or(current.duration),
                    artist_ids,
                    album_id: input.album_id.or(current.album_id),
                };
                message_of(ctx.catalog.tracks().edit(id, &fields, image, song).await?)
            }
        };
        Ok::<_, CatalogError>(outcome)
    }
    .await;
    pb.finish_and_clear();

    let outcome = outcome?;
    report_warnings(&outcome);
    if !outcome.is_clean() {
        info!("The record was updated; replaced files may need manual cleanup.");
    }
    success!(
        "{}",
        outcome
            .value
            .unwrap_or_else(|| format!("Updated {} {}", entity.label(), id))
    );
    Ok(())
}

fn message_of<T>(outcome: Outcome<Edited<T>>) -> Outcome<Option<String>> {
    Outcome {
        value: outcome.value.message,
        warnings: outcome.warnings,
    }
}

async fn delete(ctx: &Context, entity: AdminEntity, id: Id) -> Result<()> {
    let pb = spinner(&format!("Deleting {}...", entity.label()));

    // Asset URLs have to be read before the record is gone.
    let outcome: Result<Outcome<()>> = async move {
        match entity {
            AdminEntity::Album => {
                let album = ctx.catalog.albums().get(id).await?;
                ctx.catalog.albums().delete(id, album.artwork_url).await
            }
            AdminEntity::Artist => {
                let artist = ctx.catalog.artists().get(id).await?;
                ctx.catalog.artists().delete(id, artist.artist_image_url).await
            }
            AdminEntity::Genre => {
                let genre = ctx.catalog.genres().get(id).await?;
                ctx.catalog.genres().delete(id, genre.image_url).await
            }
            AdminEntity::Track => {
                let track = ctx.catalog.tracks().get(id).await?;
                ctx.catalog
                    .tracks()
                    .delete(id, track.image_url, track.song_url)
                    .await
            }
        }
    }
    .await;
    pb.finish_and_clear();

    let outcome = outcome?;
    report_warnings(&outcome);
    success!("Deleted {} {}", entity.label(), id);
    Ok(())
}

async fn read_asset(path: Option<&Path>) -> Result<Option<AssetFile>> {
    match path {
        Some(path) if !path.is_file() => Err(CatalogError::Validation(format!(
            "{} does not exist",
            path.display()
        ))),
        Some(path) => Ok(Some(AssetFile::from_path(path).await?)),
        None => Ok(None),
    }
}
