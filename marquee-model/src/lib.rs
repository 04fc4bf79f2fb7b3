//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub mod error;
pub mod favorite;
pub mod genre;
pub mod ids;
pub mod image;
pub mod media;
pub mod media_type;
pub mod user;

// Intentionally curated re-exports for downstream consumers.
pub use error::{ModelError, Result as ModelResult};
pub use favorite::Favorite;
pub use genre::{Genre, GenreList, GenreLookup, UNKNOWN_GENRE};
pub use ids::RecordId;
pub use image::{BackdropSize, ImageUrls, PosterSize};
pub use media::{CatalogItem, DecoratedItem, MediaPage};
pub use media_type::{MediaCategory, MediaType};
pub use user::UserProfile;
