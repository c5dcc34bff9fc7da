use std::path::Path;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::Value;

use crate::{
    error::{CatalogError, Result},
    types::{Id, Track},
};

/// Storage key of an asset: the trailing path segment of its public URL.
pub fn storage_key_from_url(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Parses the comma separated id lists the backend returns for
/// `artist_ids`, skipping anything that is not a number.
pub fn parse_id_list(ids: &str) -> Vec<Id> {
    ids.split(',')
        .filter_map(|id| id.trim().parse::<Id>().ok())
        .collect()
}

pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || email.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Decodes the claims segment of a JWT without verifying its signature.
///
/// The identity provider already validated the token when issuing it; the
/// client only reads claims such as `custom:role` and `exp`.
pub fn decode_jwt_claims(token: &str) -> Result<Value> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| CatalogError::Auth("malformed identity token".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| CatalogError::Auth(format!("malformed identity token: {}", e)))?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub fn sort_tracks_by_title(tracks: &mut [Track]) {
    tracks.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
}

/// Joins optional display parts, skipping the empty ones.
pub fn join_present(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}
