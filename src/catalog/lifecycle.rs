//! Create/edit/delete choreography shared by every catalog entity.
//!
//! Each entity owns zero or more asset slots whose objects live in the object
//! store and are referenced only by the URL stored on the record. The sequences
//! here keep that reference and the stored object in step:
//!
//! - create: upload every supplied asset, then create the record.
//! - edit: upload replacements, update the record, then remove what the
//!   backend reports as superseded.
//! - delete: delete the record, then remove the assets it owned.
//!
//! Uploads made by a create or edit whose record call fails are removed again
//! before the error is returned. Cleanup after a committed record change never
//! fails the operation; it is reported through [`Outcome::warnings`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    catalog::{AssetFile, CatalogClient, ObjectStore, body_value},
    error::{CatalogError, Result},
    types::Id,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetSlot {
    AlbumArtwork,
    ArtistImage,
    GenreImage,
    TrackImage,
    TrackSong,
}

impl AssetSlot {
    /// Storage folder the slot's objects are kept in.
    pub fn folder(self) -> &'static str {
        match self {
            AssetSlot::AlbumArtwork => "albums",
            AssetSlot::ArtistImage => "artists",
            AssetSlot::GenreImage => "genres",
            AssetSlot::TrackImage => "tracks/images",
            AssetSlot::TrackSong => "tracks/songs",
        }
    }

    /// Request body field carrying the slot's URL.
    pub fn url_field(self) -> &'static str {
        match self {
            AssetSlot::AlbumArtwork => "artworkUrl",
            AssetSlot::ArtistImage => "artistImageUrl",
            AssetSlot::GenreImage | AssetSlot::TrackImage => "imageUrl",
            AssetSlot::TrackSong => "songUrl",
        }
    }

    /// Edit response field naming the URL the update replaced.
    pub fn superseded_field(self) -> &'static str {
        match self {
            AssetSlot::AlbumArtwork => "oldArtworkUrl",
            AssetSlot::ArtistImage => "oldArtistImageUrl",
            AssetSlot::GenreImage | AssetSlot::TrackImage => "oldImageUrl",
            AssetSlot::TrackSong => "oldSongUrl",
        }
    }
}

/// Result of a mutation whose follow-up cleanup may have partially failed.
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<CatalogError>,
}

impl<T> Outcome<T> {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// What the backend answered to a create. Some deployments acknowledge with
/// a message instead of echoing the record.
#[derive(Debug)]
pub struct Created<T> {
    pub record: Option<T>,
    pub message: Option<String>,
}

/// What the backend answered to an edit.
#[derive(Debug)]
pub struct Edited<T> {
    /// The updated record, when the backend echoes it.
    pub record: Option<T>,
    pub message: Option<String>,
}

/// Describes how an entity maps onto the catalog API.
pub(crate) struct RecordKind {
    pub entity: &'static str,
    pub resource: &'static str,
    pub slots: &'static [AssetSlot],
}

/// Assets uploaded for a single create or edit that are not yet referenced by
/// a committed record.
pub(crate) struct StagedUploads<'a> {
    store: ObjectStore<'a>,
    uploaded: Vec<(AssetSlot, String)>,
}

impl<'a> StagedUploads<'a> {
    /// Uploads every supplied file in order. If one fails, the ones already
    /// stored are removed and the upload error is returned.
    pub async fn stage(
        store: ObjectStore<'a>,
        assets: Vec<(AssetSlot, Option<AssetFile>)>,
    ) -> Result<StagedUploads<'a>> {
        let mut staged = StagedUploads {
            store,
            uploaded: Vec::new(),
        };

        for (slot, file) in assets {
            let Some(file) = file else { continue };
            match staged.store.upload(file, slot.folder()).await {
                Ok(url) => staged.uploaded.push((slot, url)),
                Err(e) => {
                    staged.rollback().await;
                    return Err(e);
                }
            }
        }

        Ok(staged)
    }

    pub fn url_for(&self, slot: AssetSlot) -> Option<&str> {
        self.uploaded
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, url)| url.as_str())
    }

    /// Body fields for `slots`: the new URL, or `null` to leave the stored
    /// value as it is.
    pub fn payload(&self, slots: &[AssetSlot]) -> Map<String, Value> {
        slots
            .iter()
            .map(|slot| {
                let value = self
                    .url_for(*slot)
                    .map(|url| Value::String(url.to_string()))
                    .unwrap_or(Value::Null);
                (slot.url_field().to_string(), value)
            })
            .collect()
    }

    /// Removes everything staged so far. Failures are logged only; the caller
    /// is already returning an error.
    pub async fn rollback(self) {
        for (slot, url) in &self.uploaded {
            if let Err(e) = self.store.remove(url, slot.folder()).await {
                warn!(url = %url, folder = slot.folder(), error = %e, "failed to remove orphaned upload");
            }
        }
    }
}

fn record_body<F: Serialize>(
    id: Option<Id>,
    fields: &F,
    assets: Map<String, Value>,
) -> Result<Value> {
    let mut body = serde_json::to_value(fields)?;
    if let Value::Object(map) = &mut body {
        if let Some(id) = id {
            map.insert("id".to_string(), Value::from(id));
        }
        map.extend(assets);
    }
    Ok(body)
}

async fn post_record(catalog: &CatalogClient, kind: &RecordKind, body: &Value) -> Result<Value> {
    let request = catalog.http().post(catalog.url(kind.resource)).json(body);
    let request = catalog.authorize(request).await?;
    let response = catalog.send(request, kind.entity, "create").await?;
    Ok(body_value(response).await)
}

async fn put_record(
    catalog: &CatalogClient,
    kind: &RecordKind,
    id: Id,
    body: &Value,
) -> Result<Value> {
    let request = catalog
        .http()
        .put(catalog.url(kind.resource))
        .query(&[("id", id)])
        .json(body);
    let request = catalog.authorize(request).await?;
    let response = catalog.send(request, kind.entity, "update").await?;
    Ok(body_value(response).await)
}

pub(crate) async fn create<F, T>(
    catalog: &CatalogClient,
    kind: &RecordKind,
    fields: &F,
    assets: Vec<(AssetSlot, Option<AssetFile>)>,
) -> Result<Created<T>>
where
    F: Serialize,
    T: DeserializeOwned,
{
    let staged = StagedUploads::stage(catalog.storage(), assets).await?;

    let created = match record_body(None, fields, staged.payload(kind.slots)) {
        Ok(body) => post_record(catalog, kind, &body).await,
        Err(e) => Err(e),
    };

    let response = match created {
        Ok(response) => response,
        Err(e) => {
            staged.rollback().await;
            return Err(e);
        }
    };

    // The record exists from here on and references the staged assets.
    debug!(entity = kind.entity, "record created");
    let message = response_message(&response);
    let record = serde_json::from_value::<T>(response).ok();
    Ok(Created { record, message })
}

fn response_message(response: &Value) -> Option<String> {
    response
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

pub(crate) async fn edit<F, T>(
    catalog: &CatalogClient,
    kind: &RecordKind,
    id: Id,
    fields: &F,
    assets: Vec<(AssetSlot, Option<AssetFile>)>,
) -> Result<Outcome<Edited<T>>>
where
    F: Serialize,
    T: DeserializeOwned,
{
    let staged = StagedUploads::stage(catalog.storage(), assets).await?;

    let updated = match record_body(Some(id), fields, staged.payload(kind.slots)) {
        Ok(body) => put_record(catalog, kind, id, &body).await,
        Err(e) => Err(e),
    };

    let response = match updated {
        Ok(response) => response,
        Err(e) => {
            staged.rollback().await;
            return Err(e);
        }
    };

    debug!(entity = kind.entity, id, "record updated");

    let store = catalog.storage();
    let mut warnings = Vec::new();
    for slot in kind.slots {
        let superseded = response
            .get(slot.superseded_field())
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
        let Some(old_url) = superseded else { continue };
        // Only a slot given a new object stops referencing the old one.
        let Some(new_url) = staged.url_for(*slot) else {
            continue;
        };
        if new_url == old_url {
            continue;
        }
        if let Err(e) = store.remove(old_url, slot.folder()).await {
            warn!(entity = kind.entity, id, url = %old_url, error = %e, "failed to remove superseded asset");
            warnings.push(e);
        }
    }

    let message = response_message(&response);
    let record = serde_json::from_value::<T>(response).ok();

    Ok(Outcome {
        value: Edited { record, message },
        warnings,
    })
}

pub(crate) async fn delete(
    catalog: &CatalogClient,
    kind: &RecordKind,
    id: Id,
    owned: Vec<(AssetSlot, Option<String>)>,
) -> Result<Outcome<()>> {
    let request = catalog
        .http()
        .delete(catalog.url(kind.resource))
        .query(&[("id", id)]);
    let request = catalog.authorize(request).await?;
    catalog.send(request, kind.entity, "delete").await?;

    debug!(entity = kind.entity, id, "record deleted");

    let store = catalog.storage();
    let mut warnings = Vec::new();
    for (slot, url) in owned {
        let Some(url) = url.filter(|u| !u.is_empty()) else {
            continue;
        };
        if let Err(e) = store.remove(&url, slot.folder()).await {
            warn!(entity = kind.entity, id, url = %url, error = %e, "failed to remove owned asset");
            warnings.push(e);
        }
    }

    Ok(Outcome {
        value: (),
        warnings,
    })
}
