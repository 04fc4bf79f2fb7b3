/// A single catalog entry as listed by `GET /media/{mediaType}/{category}`.
///
/// Movies carry `title`, series carry `name`; both are kept so callers can
/// use [`CatalogItem::display_title`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogItem {
    pub id: u64,
    pub title: Option<String>,
    pub name: Option<String>,
    pub vote_average: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre_ids: Vec<u64>,
    pub overview: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl CatalogItem {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or_default()
    }

    /// Wide artwork for highlight slides, falling back to the poster.
    pub fn hero_image_path(&self) -> Option<&str> {
        non_empty(&self.backdrop_path).or_else(|| non_empty(&self.poster_path))
    }

    pub fn poster_image_path(&self) -> Option<&str> {
        non_empty(&self.poster_path).or_else(|| non_empty(&self.backdrop_path))
    }
}

/// One page of a catalog listing.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaPage {
    pub page: Option<u32>,
    pub results: Vec<CatalogItem>,
    pub total_pages: Option<u32>,
    pub total_results: Option<u32>,
}

/// A catalog item annotated with the display names of its genres.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratedItem {
    pub item: CatalogItem,
    pub genre_names: Vec<String>,
}

impl DecoratedItem {
    /// First `n` genre names, in listing order.
    pub fn primary_genres(&self, n: usize) -> &[String] {
        &self.genre_names[..self.genre_names.len().min(n)]
    }
}
