//! Object store access for catalog assets.
//!
//! Uploads go straight to the bucket through a pre-signed destination issued by
//! the backend; deletes are performed server-side. Neither is retried.

use std::path::Path;

use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    catalog::{CatalogClient, body_value},
    error::{CatalogError, Result},
    utils,
};

const FILE_HANDLER: &str = "s3FileHandler";

/// A file to be stored as a catalog asset.
#[derive(Debug, Clone)]
pub struct AssetFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AssetFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads a local file, guessing its content type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                CatalogError::Validation(format!("{} is not a file", path.display()))
            })?
            .to_string();
        let bytes = async_fs::read(path).await?;

        Ok(Self {
            file_name,
            content_type: utils::content_type_for(path),
            bytes,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest<'a> {
    file_name: &'a str,
    file_type: &'a str,
    folder_name: &'a str,
}

#[derive(Debug, Deserialize)]
struct UploadDestination {
    #[serde(rename = "uploadURL")]
    upload_url: String,
    #[serde(rename = "fileKey")]
    file_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    file_url: &'a str,
    folder_name: &'a str,
}

pub struct ObjectStore<'a> {
    catalog: &'a CatalogClient,
}

impl<'a> ObjectStore<'a> {
    pub(crate) fn new(catalog: &'a CatalogClient) -> Self {
        Self { catalog }
    }

    /// Stores `file` under `folder` and returns its public URL.
    pub async fn upload(&self, file: AssetFile, folder: &str) -> Result<String> {
        let request = self
            .catalog
            .http()
            .post(self.catalog.url(FILE_HANDLER))
            .json(&UploadRequest {
                file_name: &file.file_name,
                file_type: &file.content_type,
                folder_name: folder,
            });
        let request = self.catalog.authorize(request).await?;

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Upload(e.to_string()))?;
        if !response.status().is_success() {
            return Err(CatalogError::Upload(format!(
                "upload destination for {} was refused ({})",
                file.file_name,
                response.status()
            )));
        }
        let destination: UploadDestination = response
            .json()
            .await
            .map_err(|e| CatalogError::Upload(format!("invalid upload destination: {}", e)))?;

        debug!(file = %file.file_name, folder, key = %destination.file_key, "uploading asset");

        let transfer = self
            .catalog
            .http()
            .put(&destination.upload_url)
            .header(CONTENT_TYPE, &file.content_type)
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| CatalogError::Upload(e.to_string()))?;
        if !transfer.status().is_success() {
            return Err(CatalogError::Upload(format!(
                "transfer of {} failed ({})",
                file.file_name,
                transfer.status()
            )));
        }

        Ok(self.catalog.settings().public_asset_url(&destination.file_key))
    }

    /// Deletes the object behind `stored_url` from `folder`.
    pub async fn remove(&self, stored_url: &str, folder: &str) -> Result<()> {
        let key = utils::storage_key_from_url(stored_url).ok_or_else(|| {
            CatalogError::Delete(format!("cannot derive a storage key from {}", stored_url))
        })?;

        debug!(key, folder, "removing asset");

        let request = self
            .catalog
            .http()
            .delete(self.catalog.url(FILE_HANDLER))
            .json(&DeleteRequest {
                file_url: key,
                folder_name: folder,
            });
        let request = self.catalog.authorize(request).await?;

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Delete(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let reason = body_value(response)
                .await
                .get("message")
                .and_then(|m| m.as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            Err(CatalogError::Delete(format!("{}: {}", key, reason)))
        }
    }
}
