use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use marquee_client::app::App;
use marquee_client::domains::auth::{
    AuthState, FileSessionStore, SessionStore,
};
use marquee_client::infra::{ApiClient, ApiError, ReqwestTransport};
use marquee_client::infra::services::ApiService;
use marquee_model::{ImageUrls, MediaCategory, MediaType};
use parking_lot::Mutex;
use serde_json::json;
use tempfile::TempDir;
use url::Url;

type SeenHeaders = Arc<Mutex<Vec<Option<String>>>>;

fn record(seen: &SeenHeaders, headers: &HeaderMap) -> Option<String> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    seen.lock().push(auth.clone());
    auth
}

async fn user_info(
    State(seen): State<SeenHeaders>,
    headers: HeaderMap,
) -> Response {
    match record(&seen, &headers).as_deref() {
        Some("Bearer good") => {
            Json(json!({ "id": 7, "name": "Ann" })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Unauthorized", "status": 401 })),
        )
            .into_response(),
    }
}

async fn favorites(
    State(seen): State<SeenHeaders>,
    headers: HeaderMap,
) -> Response {
    record(&seen, &headers);
    Json(json!([])).into_response()
}

async fn media_list(
    State(seen): State<SeenHeaders>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&seen, &headers);
    let page = query.get("page").cloned().unwrap_or_default();
    Json(json!({
        "page": page.parse::<u32>().unwrap_or(0),
        "results": [{ "id": 99, "title": "Echo", "genre_ids": [1] }]
    }))
    .into_response()
}

async fn spawn_server() -> (Url, SeenHeaders) {
    let seen = SeenHeaders::default();
    let router = Router::new()
        .route("/api/v1/user/info", get(user_info))
        .route("/api/v1/favorites", get(favorites))
        .route("/api/v1/media/{media_type}/{category}", get(media_list))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test api");
    });

    let base = Url::parse(&format!("http://{addr}/api/v1/"))
        .expect("base url parses");
    (base, seen)
}

fn client_for(
    base: Url,
    session: Arc<FileSessionStore>,
) -> ApiClient {
    let transport =
        ReqwestTransport::new(base, None).expect("build reqwest transport");
    ApiClient::new(Arc::new(transport), session)
}

#[tokio::test]
async fn bearer_header_follows_the_session_slot() {
    let (base, seen) = spawn_server().await;
    let dir = TempDir::new().expect("tempdir");
    let session = Arc::new(FileSessionStore::new(dir.path().join("actkn")));
    let client = client_for(base, session.clone());

    client.fetch_favorites().await.expect("anonymous favorites");
    session.store_token("tok123").await.expect("store token");
    client.fetch_favorites().await.expect("authorized favorites");

    assert_eq!(
        *seen.lock(),
        vec![None, Some("Bearer tok123".to_string())]
    );
}

#[tokio::test]
async fn unauthorized_response_purges_the_slot_on_disk() {
    let (base, seen) = spawn_server().await;
    let dir = TempDir::new().expect("tempdir");
    let slot = dir.path().join("actkn");
    let session = Arc::new(FileSessionStore::new(&slot));
    session.store_token("stale").await.expect("store token");
    let client = client_for(base, session.clone());

    let err = client
        .fetch_current_user()
        .await
        .expect_err("stale token is rejected");
    assert_eq!(
        err,
        ApiError::Unauthorized {
            message: "Unauthorized".into(),
            status: 401
        }
    );
    assert!(!slot.exists());

    client.fetch_favorites().await.expect("anonymous favorites");
    assert_eq!(
        *seen.lock(),
        vec![Some("Bearer stale".to_string()), None]
    );
}

#[tokio::test]
async fn query_parameters_reach_the_server() {
    let (base, _seen) = spawn_server().await;
    let dir = TempDir::new().expect("tempdir");
    let client =
        client_for(base, Arc::new(FileSessionStore::new(dir.path().join("actkn"))));

    let page = client
        .fetch_media_list(MediaType::Movie, MediaCategory::TopRated, 3)
        .await
        .expect("media page");

    assert_eq!(page.page, Some(3));
    assert_eq!(page.results[0].display_title(), "Echo");
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind throwaway listener");
    let addr = listener.local_addr().expect("listener address");
    drop(listener);

    let dir = TempDir::new().expect("tempdir");
    let session = Arc::new(FileSessionStore::new(dir.path().join("actkn")));
    session.store_token("tok123").await.expect("store token");
    let base = Url::parse(&format!("http://{addr}/api/v1/")).expect("url");
    let client = client_for(base, session.clone());

    let err = client.fetch_favorites().await.expect_err("nothing listens");
    assert_eq!(err, ApiError::Network);
    assert!(err.is_network());
    assert!(!err.is_unauthorized());
    assert_eq!(err.message(), "Network Error");
    assert_eq!(
        session.token().await.expect("read slot").as_deref(),
        Some("tok123")
    );
}

#[tokio::test]
async fn app_restores_a_valid_session() {
    let (base, _seen) = spawn_server().await;
    let dir = TempDir::new().expect("tempdir");
    let session = Arc::new(FileSessionStore::new(dir.path().join("actkn")));
    session.store_token("good").await.expect("store token");
    let transport =
        ReqwestTransport::new(base, None).expect("build reqwest transport");

    let app = App::with_parts(
        Arc::new(transport),
        session,
        ImageUrls::new("https://image.tmdb.org/t/p/"),
    );

    match app.start().await {
        AuthState::Authenticated { user } => {
            assert_eq!(user.display_name.as_deref(), Some("Ann"))
        }
        other => panic!("expected an authenticated session, got {other:?}"),
    }
}
