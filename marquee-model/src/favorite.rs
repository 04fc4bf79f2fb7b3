use crate::ids::RecordId;
use crate::media_type::MediaType;

/// A saved media reference from `GET /favorites`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Favorite {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<RecordId>,
    pub media_id: RecordId,
    pub media_type: MediaType,
    pub media_title: Option<String>,
    pub media_poster: Option<String>,
    pub media_rate: Option<f64>,
}

impl Favorite {
    pub fn refers_to(&self, media_type: MediaType, media_id: &str) -> bool {
        self.media_type == media_type && self.media_id.matches(media_id)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn decodes_saved_reference() {
        let favorite: Favorite = serde_json::from_str(
            r#"{
                "id": "f1",
                "mediaId": 550,
                "mediaType": "movie",
                "mediaTitle": "Fight Club",
                "mediaPoster": "/poster.jpg",
                "mediaRate": 8.4
            }"#,
        )
        .expect("favorite decodes");

        assert!(favorite.refers_to(MediaType::Movie, "550"));
        assert!(!favorite.refers_to(MediaType::Tv, "550"));
        assert_eq!(favorite.media_title.as_deref(), Some("Fight Club"));
    }
}
