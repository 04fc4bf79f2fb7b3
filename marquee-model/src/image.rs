//! Absolute image URLs built from the path fragments catalog items carry.

/// Poster widths offered by the image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PosterSize {
    W185,
    #[default]
    W500,
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::W185 => "w185",
            PosterSize::W500 => "w500",
            PosterSize::Original => "original",
        }
    }
}

/// Backdrop widths offered by the image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackdropSize {
    W780,
    W1280,
    #[default]
    Original,
}

impl BackdropSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackdropSize::W780 => "w780",
            BackdropSize::W1280 => "w1280",
            BackdropSize::Original => "original",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        Self { base }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn poster(&self, path: &str, size: PosterSize) -> String {
        self.join(size.as_str(), path)
    }

    pub fn backdrop(&self, path: &str, size: BackdropSize) -> String {
        self.join(size.as_str(), path)
    }

    fn join(&self, size: &str, path: &str) -> String {
        format!("{}/{}/{}", self.base, size, path.trim_start_matches('/'))
    }
}
