//! Endpoint paths, relative to the configured API base.

pub mod v1 {
    use marquee_model::{MediaCategory, MediaType};

    pub const USER_INFO: &str = "user/info";
    pub const FAVORITES: &str = "favorites";

    pub fn genres(media_type: MediaType) -> String {
        format!("genre/{media_type}")
    }

    pub fn media_list(media_type: MediaType, category: MediaCategory) -> String {
        format!("media/{media_type}/{category}")
    }
}
