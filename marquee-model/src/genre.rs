use std::collections::HashMap;

use crate::media::{CatalogItem, DecoratedItem};
use crate::media_type::MediaType;

/// Label shown for a genre id the lookup does not know.
pub const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Body of `GET /genre/{mediaType}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenreList {
    pub genres: Vec<Genre>,
}

/// Genre id to display name, scoped to the media type it was fetched for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreLookup {
    media_type: Option<MediaType>,
    names: HashMap<u64, String>,
}

impl GenreLookup {
    pub fn new(media_type: MediaType, genres: Vec<Genre>) -> Self {
        let names = genres
            .into_iter()
            .map(|genre| (genre.id, genre.name))
            .collect();
        Self {
            media_type: Some(media_type),
            names,
        }
    }

    pub fn from_list(media_type: MediaType, list: GenreList) -> Self {
        Self::new(media_type, list.genres)
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Display name for `id`, or [`UNKNOWN_GENRE`] when it is not present.
    pub fn name_for(&self, id: u64) -> &str {
        self.names
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_GENRE)
    }

    pub fn decorate(&self, item: CatalogItem) -> DecoratedItem {
        let genre_names = item
            .genre_ids
            .iter()
            .map(|id| self.name_for(*id).to_string())
            .collect();
        DecoratedItem { item, genre_names }
    }
}
