use serde::{Deserialize, Deserializer, Serialize};
use tabled::Tabled;

/// Backend record identifier.
pub type Id = i64;

/// Accepts a JSON string or number and keeps it as text. The backend is not
/// consistent about quoting years and durations.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts a count sent either as a number or as a numeric string.
fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Album {
    pub id: Id,
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub release_year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub artist_ids: Option<String>,
    #[serde(default)]
    pub artist_names: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub artist_image_url: Option<String>,
    #[serde(default)]
    pub monthly_listeners: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub genre_id: Option<Id>,
    #[serde(default)]
    pub genre_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub artist_ids: Option<String>,
    #[serde(default)]
    pub artist_names: Option<String>,
    #[serde(default)]
    pub album_id: Option<Id>,
    #[serde(default)]
    pub album_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub song_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentlyPlayed {
    #[serde(flatten)]
    pub track: Track,
    #[serde(default)]
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularAlbum {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub artwork_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub play_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularTrack {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub artist_names: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub play_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularArtist {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub artist_image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub play_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularGenre {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub play_count: u64,
}

/// Narrowing applied to catalog list requests. Empty values are not sent.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub genre_id: Option<Id>,
    pub artist_id: Option<Id>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumFields {
    pub title: String,
    pub release_year: Option<String>,
    pub artist_id: Option<Id>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistFields {
    pub name: String,
    pub biography: Option<String>,
    pub birth_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreFields {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackFields {
    pub title: String,
    pub genre_id: Option<Id>,
    pub duration: Option<String>,
    pub artist_ids: Vec<Id>,
    pub album_id: Option<Id>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReference {
    pub track_id: Id,
}

/// Identity tokens of a signed-in user, persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub id: Id,
    pub title: String,
    pub year: String,
    pub artists: String,
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub id: Id,
    pub name: String,
    pub born: String,
}

#[derive(Tabled)]
pub struct GenreTableRow {
    pub id: Id,
    pub name: String,
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub id: Id,
    pub title: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
}

#[derive(Tabled)]
pub struct PopularTableRow {
    pub rank: usize,
    pub name: String,
    pub detail: String,
    pub plays: u64,
}

impl From<Album> for AlbumTableRow {
    fn from(a: Album) -> Self {
        AlbumTableRow {
            id: a.id,
            title: a.title,
            year: a.release_year.unwrap_or_default(),
            artists: a.artist_names.unwrap_or_default(),
        }
    }
}

impl From<Artist> for ArtistTableRow {
    fn from(a: Artist) -> Self {
        ArtistTableRow {
            id: a.id,
            name: a.name,
            born: a.birth_date.unwrap_or_default(),
        }
    }
}

impl From<Genre> for GenreTableRow {
    fn from(g: Genre) -> Self {
        GenreTableRow {
            id: g.id,
            name: g.name,
        }
    }
}

impl From<Track> for TrackTableRow {
    fn from(t: Track) -> Self {
        TrackTableRow {
            id: t.id,
            title: t.title,
            artists: t.artist_names.unwrap_or_default(),
            album: t.album_name.unwrap_or_default(),
            duration: t.duration.unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}
