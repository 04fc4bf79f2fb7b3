//! Application wiring: builds the gateway and components from config and
//! starts the background reconcilers.

use std::fmt;
use std::sync::Arc;

use anyhow::Context;
use marquee_config::Config;
use marquee_model::ImageUrls;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::common::notifications::{NotificationCenter, Notifier};
use crate::domains::auth::bootstrap::SessionBootstrap;
use crate::domains::auth::state_types::AuthState;
use crate::domains::auth::storage::{FileSessionStore, SessionStore};
use crate::domains::catalog::loader::{CatalogContext, CatalogView};
use crate::domains::favorites::reconciler::FavoritesReconciler;
use crate::infra::api_client::ApiClient;
use crate::infra::services::ApiService;
use crate::infra::transport::{ReqwestTransport, Transport};
use crate::state::AppState;

pub struct App {
    state: AppState,
    api: Arc<ApiClient>,
    notifications: NotificationCenter,
    images: ImageUrls,
    bootstrap: SessionBootstrap,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("api", &self.api)
            .field("state", &self.state)
            .field("images", &self.images)
            .field("background_tasks", &self.tasks.lock().len())
            .finish()
    }
}

impl App {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(
            config.api.base_url.clone(),
            config.api.request_timeout,
        )
        .context("failed to build HTTP client")?;
        let session = FileSessionStore::new(&config.session.token_path);

        log::info!(
            "[App] API at {}, session slot at {}",
            transport.base_url(),
            config.session.token_path.display()
        );

        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(session),
            ImageUrls::new(config.images.base_url.as_str()),
        ))
    }

    /// Wires the app around an explicit transport and session slot.
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
        images: ImageUrls,
    ) -> Self {
        let state = AppState::new();
        let notifications = NotificationCenter::default();
        let api = Arc::new(ApiClient::new(transport, Arc::clone(&session)));

        let bootstrap = SessionBootstrap::new(
            api.clone(),
            session,
            state.auth.clone(),
            state.global_loading.clone(),
            Arc::new(notifications.clone()),
        );

        Self {
            state,
            api,
            notifications,
            images,
            bootstrap,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Starts the background reconcilers and resolves the stored session.
    pub async fn start(&self) -> AuthState {
        self.spawn_background();
        self.bootstrap.run().await
    }

    /// Spawns favorites reconciliation and the purge listener. Calling it
    /// again is a no-op.
    pub fn spawn_background(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        let reconciler = FavoritesReconciler::new(
            self.api.clone(),
            self.state.auth.clone(),
            self.state.favorites.clone(),
            self.notifier(),
        );
        tasks.push(reconciler.spawn(self.state.auth.subscribe()));
        tasks.push(
            self.bootstrap
                .spawn_purge_listener(self.api.subscribe_session_events()),
        );
    }

    /// Creates a view-local cascading loader. Each view owns its loading
    /// flag and liveness.
    pub fn catalog_view(&self, context: CatalogContext) -> CatalogView {
        CatalogView::new(self.api.clone(), self.notifier(), context)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> Arc<dyn ApiService> {
        self.api.clone()
    }

    pub fn bootstrap(&self) -> &SessionBootstrap {
        &self.bootstrap
    }

    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }

    fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.notifications.clone())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
