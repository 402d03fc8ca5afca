//! Parse the restaurant listing file: the entries shown on the page.
//!
//! Two shapes are accepted:
//!   Wrapped: `{ restaurants: [ { id, name, href } ] }`
//!   Bare:    `[ { id, name, href } ]`
//!
//! `id` may be a string or a number; `name` falls back to the id; `href` is
//! optional.

pub mod error;

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::listing::error::ListingError;
use crate::model::{RestaurantId, RestaurantSummary};

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawListing {
    Wrapped { restaurants: Vec<RawEntry> },
    Bare(Vec<RawEntry>),
}

#[derive(Deserialize, Debug)]
struct RawEntry {
    id: RawId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    href: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// Load the listing at `path`.
pub fn load_listing(path: &Path) -> Result<Vec<RestaurantSummary>, ListingError> {
    if !path.exists() {
        return Err(ListingError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| ListingError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_listing(&content, path)
}

/// Parse listing content. `path` is only used in errors and logs.
pub fn parse_listing(content: &str, path: &Path) -> Result<Vec<RestaurantSummary>, ListingError> {
    let raw: RawListing = serde_yaml::from_str(content).map_err(|e| ListingError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let entries = match raw {
        RawListing::Wrapped { restaurants } => restaurants,
        RawListing::Bare(entries) => entries,
    };

    let mut seen = HashSet::new();
    let mut listing = Vec::with_capacity(entries.len());

    for entry in entries {
        let id = entry.id.into_string();
        if id.is_empty() {
            warn!(path = %path.display(), "skipping entry with empty id");
            continue;
        }
        if !seen.insert(id.clone()) {
            warn!(path = %path.display(), id = id.as_str(), "duplicate entry id, keeping the first");
            continue;
        }
        let name = entry
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone());
        listing.push(RestaurantSummary {
            id: RestaurantId::new(id),
            name,
            href: entry.href,
        });
    }

    if listing.is_empty() {
        return Err(ListingError::Empty(path.to_path_buf()));
    }

    debug!(path = %path.display(), entries = listing.len(), "loaded listing");
    Ok(listing)
}
