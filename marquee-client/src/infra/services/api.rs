use std::fmt::Debug;

use async_trait::async_trait;
use marquee_model::{
    Favorite, GenreList, GenreLookup, MediaCategory, MediaPage, MediaType,
    UserProfile,
};

use crate::infra::api_client::ApiClient;
use crate::infra::api_types::{ApiRequest, ApiResult};
use crate::infra::routes::v1;

/// Remote operations the orchestration components depend on.
#[async_trait]
pub trait ApiService: Send + Sync + Debug {
    /// `GET /user/info` for the holder of the stored token.
    async fn fetch_current_user(&self) -> ApiResult<UserProfile>;

    /// `GET /favorites`. Entries that do not decode are skipped; only a
    /// body that is not an array fails.
    async fn fetch_favorites(&self) -> ApiResult<Vec<Favorite>>;

    /// `GET /genre/{mediaType}`; a body without `genres` is an error.
    async fn fetch_genres(
        &self,
        media_type: MediaType,
    ) -> ApiResult<GenreLookup>;

    /// `GET /media/{mediaType}/{category}?page=N`; a body without `results`
    /// is an error.
    async fn fetch_media_list(
        &self,
        media_type: MediaType,
        category: MediaCategory,
        page: u32,
    ) -> ApiResult<MediaPage>;
}

#[async_trait]
impl ApiService for ApiClient {
    async fn fetch_current_user(&self) -> ApiResult<UserProfile> {
        self.get(v1::USER_INFO).await
    }

    async fn fetch_favorites(&self) -> ApiResult<Vec<Favorite>> {
        let entries: Vec<serde_json::Value> = self.get(v1::FAVORITES).await?;
        let total = entries.len();
        let favorites: Vec<Favorite> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(favorite) => Some(favorite),
                Err(err) => {
                    log::debug!("[ApiService] Skipping favorite entry: {}", err);
                    None
                }
            })
            .collect();
        if favorites.len() < total {
            log::warn!(
                "[ApiService] Skipped {} of {} favorite entries",
                total - favorites.len(),
                total
            );
        }
        Ok(favorites)
    }

    async fn fetch_genres(
        &self,
        media_type: MediaType,
    ) -> ApiResult<GenreLookup> {
        let list: GenreList = self.get(&v1::genres(media_type)).await?;
        Ok(GenreLookup::from_list(media_type, list))
    }

    async fn fetch_media_list(
        &self,
        media_type: MediaType,
        category: MediaCategory,
        page: u32,
    ) -> ApiResult<MediaPage> {
        let request = ApiRequest::get(v1::media_list(media_type, category))
            .with_query("page", page);
        self.send(request).await
    }
}
