use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use marquee_model::{
    CatalogItem, DecoratedItem, GenreLookup, MediaCategory, MediaType,
};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::cascade::{CascadeOutcome, run_cascade};
use crate::common::loading::LoadingIndicator;
use crate::common::notifications::{Notification, Notifier};
use crate::infra::api_types::ApiError;
use crate::infra::services::ApiService;

/// Items kept for highlight reels.
pub const HIGHLIGHT_LIMIT: usize = 5;

/// Where a catalog view is shown; decides how much of a page is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogContext {
    Highlight,
    Listing,
}

impl CatalogContext {
    pub fn limit(self) -> Option<usize> {
        match self {
            CatalogContext::Highlight => Some(HIGHLIGHT_LIMIT),
            CatalogContext::Listing => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogRequest {
    pub media_type: MediaType,
    pub category: MediaCategory,
    pub page: u32,
}

impl CatalogRequest {
    pub fn new(media_type: MediaType, category: MediaCategory) -> Self {
        Self {
            media_type,
            category,
            page: 1,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }
}

/// What a view currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSnapshot {
    /// The request the genres and items belong to.
    pub request: Option<CatalogRequest>,
    pub genres: GenreLookup,
    pub items: Vec<CatalogItem>,
}

impl CatalogSnapshot {
    pub fn decorated(&self) -> Vec<DecoratedItem> {
        self.items
            .iter()
            .cloned()
            .map(|item| self.genres.decorate(item))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadReport {
    Loaded { items: usize },
    GenresFailed(ApiError),
    CatalogFailed(ApiError),
    /// A newer load started or the view was detached; nothing was applied
    /// after that point.
    Stale,
}

impl LoadReport {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadReport::Loaded { .. })
    }
}

/// Per-view cascading loader: genres for the media type first, then a page
/// of the catalog decorated with them.
pub struct CatalogView {
    api: Arc<dyn ApiService>,
    notifier: Arc<dyn Notifier>,
    context: CatalogContext,
    snapshot: watch::Sender<CatalogSnapshot>,
    loading: LoadingIndicator,
    generation: AtomicU64,
    liveness: CancellationToken,
}

impl fmt::Debug for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogView")
            .field("context", &self.context)
            .field("request", &self.snapshot.borrow().request)
            .field("loading", &self.loading.is_loading())
            .field("detached", &self.liveness.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl CatalogView {
    pub fn new(
        api: Arc<dyn ApiService>,
        notifier: Arc<dyn Notifier>,
        context: CatalogContext,
    ) -> Self {
        let (snapshot, _receiver) = watch::channel(CatalogSnapshot::default());
        Self {
            api,
            notifier,
            context,
            snapshot,
            loading: LoadingIndicator::new(),
            generation: AtomicU64::new(0),
            liveness: CancellationToken::new(),
        }
    }

    /// Reports loads through `loading` instead of a view-local indicator.
    pub fn with_loading(mut self, loading: LoadingIndicator) -> Self {
        self.loading = loading;
        self
    }

    pub fn context(&self) -> CatalogContext {
        self.context
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Tears the view down. In-flight loads stop and nothing more is
    /// applied or notified.
    pub fn detach(&self) {
        self.liveness.cancel();
    }

    pub fn is_live(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    /// Runs both stages from scratch for `request`.
    ///
    /// Genres are applied as soon as they arrive so they stay usable when
    /// the catalog stage fails. Items from a different request are dropped
    /// at that point; items for the same request stay until replaced.
    pub async fn load(&self, request: CatalogRequest) -> LoadReport {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _loading = self.loading.begin();

        log::debug!(
            "[CatalogView] Loading {} {} page {} ({:?})",
            request.media_type,
            request.category,
            request.page,
            self.context
        );

        let cascade = run_cascade(
            self.api.fetch_genres(request.media_type),
            |genres: &GenreLookup| {
                if self.is_current(generation) {
                    self.apply_genres(request, genres);
                }
                self.api.fetch_media_list(
                    request.media_type,
                    request.category,
                    request.page,
                )
            },
        );

        let outcome = tokio::select! {
            biased;
            _ = self.liveness.cancelled() => {
                log::debug!("[CatalogView] Detached during load; abandoning");
                return LoadReport::Stale;
            }
            outcome = cascade => outcome,
        };

        if !self.is_current(generation) {
            log::debug!("[CatalogView] Dropping superseded result");
            return LoadReport::Stale;
        }

        match outcome {
            CascadeOutcome::ReferenceFailed(error) => {
                self.notifier.notify(Notification::error(format!(
                    "Failed to load genres for {}: {}",
                    request.media_type,
                    error.message()
                )));
                LoadReport::GenresFailed(error)
            }
            CascadeOutcome::CatalogFailed { error, .. } => {
                self.notifier.notify(Notification::error(format!(
                    "Failed to load {} {}: {}",
                    request.media_type,
                    request.category,
                    error.message()
                )));
                LoadReport::CatalogFailed(error)
            }
            CascadeOutcome::Completed { catalog, .. } => {
                let mut items = catalog.results;
                if let Some(limit) = self.context.limit() {
                    items.truncate(limit);
                }
                let count = items.len();
                self.snapshot.send_modify(|snapshot| snapshot.items = items);
                LoadReport::Loaded { items: count }
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_live() && self.generation.load(Ordering::SeqCst) == generation
    }

    fn apply_genres(&self, request: CatalogRequest, genres: &GenreLookup) {
        self.snapshot.send_modify(|snapshot| {
            if snapshot.request != Some(request) {
                snapshot.items.clear();
            }
            snapshot.request = Some(request);
            snapshot.genres = genres.clone();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::notifications::NotificationCenter;
    use crate::domains::auth::storage::{MemorySessionStore, SessionStore};
    use crate::infra::api_client::ApiClient;
    use crate::infra::testing::ScriptedTransport;
    use reqwest::StatusCode;
    use serde_json::{Value, json};
    use tokio::sync::broadcast;

    const GENRES: &str = "genre/movie";
    const POPULAR: &str = "media/movie/popular";

    struct Fixture {
        transport: Arc<ScriptedTransport>,
        session: Arc<MemorySessionStore>,
        client: Arc<ApiClient>,
        notifications: NotificationCenter,
    }

    impl Fixture {
        fn new() -> Self {
            let transport = Arc::new(ScriptedTransport::new());
            let session = Arc::new(MemorySessionStore::with_token("tok123"));
            let client =
                Arc::new(ApiClient::new(transport.clone(), session.clone()));
            Self {
                transport,
                session,
                client,
                notifications: NotificationCenter::default(),
            }
        }

        fn view(&self, context: CatalogContext) -> CatalogView {
            CatalogView::new(
                self.client.clone(),
                Arc::new(self.notifications.clone()),
                context,
            )
        }

        fn action_genres(&self) {
            self.transport.respond_json(
                GENRES,
                StatusCode::OK,
                json!({ "genres": [{ "id": 1, "name": "Action" }] }),
            );
        }

        fn results(&self, path: &str, results: Value) {
            self.transport.respond_json(
                path,
                StatusCode::OK,
                json!({ "page": 1, "results": results }),
            );
        }
    }

    fn popular() -> CatalogRequest {
        CatalogRequest::new(MediaType::Movie, MediaCategory::Popular)
    }

    fn messages(receiver: &mut broadcast::Receiver<Notification>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(notification) = receiver.try_recv() {
            out.push(notification.message);
        }
        out
    }

    #[tokio::test]
    async fn genre_names_decorate_catalog_items() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.results(
            POPULAR,
            json!([{ "id": 99, "genre_ids": [1] }, { "id": 100, "genre_ids": [2] }]),
        );
        let view = fx.view(CatalogContext::Listing);

        let report = view.load(popular()).await;

        assert_eq!(report, LoadReport::Loaded { items: 2 });
        let decorated = view.snapshot().decorated();
        assert_eq!(decorated[0].item.id, 99);
        assert_eq!(decorated[0].genre_names, vec!["Action"]);
        assert_eq!(decorated[1].genre_names, vec!["Unknown"]);

        let calls: Vec<String> = fx
            .transport
            .requests()
            .into_iter()
            .map(|request| request.path)
            .collect();
        assert_eq!(calls, vec![GENRES, POPULAR]);
        assert_eq!(
            fx.transport.requests()[1].query,
            vec![("page".to_string(), "1".to_string())]
        );
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn highlight_context_keeps_a_bounded_prefix() {
        let fx = Fixture::new();
        fx.action_genres();
        let results: Vec<Value> =
            (1..=7).map(|id| json!({ "id": id, "genre_ids": [1] })).collect();
        fx.results(POPULAR, Value::Array(results));
        let view = fx.view(CatalogContext::Highlight);

        let report = view.load(popular()).await;

        assert_eq!(report, LoadReport::Loaded { items: HIGHLIGHT_LIMIT });
        let ids: Vec<u64> =
            view.snapshot().items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn genre_failure_never_reaches_catalog_stage() {
        let fx = Fixture::new();
        fx.transport.respond_json(
            GENRES,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "Oops! Something wrong!" }),
        );
        let mut notifications = fx.notifications.subscribe();
        let view = fx.view(CatalogContext::Highlight);

        let report = view.load(popular()).await;

        assert!(matches!(report, LoadReport::GenresFailed(_)));
        assert_eq!(fx.transport.calls_to(POPULAR), 0);
        assert!(!view.is_loading());
        assert!(view.snapshot().items.is_empty());
        assert_eq!(
            messages(&mut notifications),
            vec!["Failed to load genres for movie: Oops! Something wrong!"]
        );
    }

    #[tokio::test]
    async fn catalog_failure_keeps_fetched_genres() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.transport.fail_connection(POPULAR);
        let mut notifications = fx.notifications.subscribe();
        let view = fx.view(CatalogContext::Listing);

        let report = view.load(popular()).await;

        assert_eq!(report, LoadReport::CatalogFailed(ApiError::Network));
        let snapshot = view.snapshot();
        assert_eq!(snapshot.genres.name_for(1), "Action");
        assert!(snapshot.items.is_empty());
        assert_eq!(
            messages(&mut notifications),
            vec!["Failed to load movie popular: Network Error"]
        );
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn shared_indicator_tracks_the_whole_chain() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.results(POPULAR, json!([]));
        let release = fx.transport.hold(POPULAR);
        let global = LoadingIndicator::new();
        let view = fx
            .view(CatalogContext::Listing)
            .with_loading(global.clone());

        let observe = async {
            tokio::task::yield_now().await;
            assert!(global.is_loading());
            release.send(()).expect("catalog stage in flight");
        };
        let (report, ()) = tokio::join!(view.load(popular()), observe);

        assert!(report.is_loaded());
        assert!(!global.is_loading());
    }

    #[tokio::test]
    async fn newer_load_supersedes_older_one() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.action_genres();
        fx.results(POPULAR, json!([{ "id": 1 }]));
        fx.results("media/movie/top_rated", json!([{ "id": 2 }]));
        let release = fx.transport.hold(POPULAR);
        let view = fx.view(CatalogContext::Listing);
        let top_rated =
            CatalogRequest::new(MediaType::Movie, MediaCategory::TopRated);

        let newer = async {
            tokio::task::yield_now().await;
            let report = view.load(top_rated).await;
            release.send(()).expect("older load in flight");
            report
        };
        let (older, newer) = tokio::join!(view.load(popular()), newer);

        assert_eq!(older, LoadReport::Stale);
        assert!(newer.is_loaded());
        let snapshot = view.snapshot();
        assert_eq!(snapshot.request, Some(top_rated));
        assert_eq!(snapshot.items[0].id, 2);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn detached_view_abandons_its_load() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.transport.respond_json(
            POPULAR,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "message": "late failure" }),
        );
        let _release = fx.transport.hold(POPULAR);
        let mut notifications = fx.notifications.subscribe();
        let view = fx.view(CatalogContext::Highlight);

        let teardown = async {
            tokio::task::yield_now().await;
            view.detach();
        };
        let (report, ()) = tokio::join!(view.load(popular()), teardown);

        assert_eq!(report, LoadReport::Stale);
        assert!(!view.is_live());
        assert!(!view.is_loading());
        assert!(messages(&mut notifications).is_empty());
    }

    #[tokio::test]
    async fn token_purge_does_not_cancel_an_independent_load() {
        let fx = Fixture::new();
        fx.action_genres();
        fx.results(POPULAR, json!([{ "id": 99, "genre_ids": [1] }]));
        fx.transport.respond_json(
            "favorites",
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Unauthorized" }),
        );
        let release = fx.transport.hold(POPULAR);
        let view = fx.view(CatalogContext::Highlight);

        let purge = async {
            tokio::task::yield_now().await;
            let err = fx.client.fetch_favorites().await.unwrap_err();
            assert!(err.is_unauthorized());
            release.send(()).expect("highlight load in flight");
        };
        let (report, ()) = tokio::join!(view.load(popular()), purge);

        assert_eq!(report, LoadReport::Loaded { items: 1 });
        assert_eq!(fx.session.token().await.unwrap(), None);
        assert_eq!(view.snapshot().decorated()[0].genre_names, vec!["Action"]);
    }
}
