use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::store::FavoritesStore;
use crate::common::notifications::{Notification, Notifier};
use crate::domains::auth::state_types::{AuthState, AuthStateStore};
use crate::infra::services::ApiService;

/// Re-derives the favorites collection from the auth state.
///
/// Only an authenticated state fetches; every other state empties the
/// collection locally.
#[derive(Clone)]
pub struct FavoritesReconciler {
    api: Arc<dyn ApiService>,
    auth: AuthStateStore,
    favorites: FavoritesStore,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for FavoritesReconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FavoritesReconciler")
            .field("api", &self.api)
            .field("favorites", &self.favorites.len())
            .finish_non_exhaustive()
    }
}

impl FavoritesReconciler {
    pub fn new(
        api: Arc<dyn ApiService>,
        auth: AuthStateStore,
        favorites: FavoritesStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            auth,
            favorites,
            notifier,
        }
    }

    pub async fn reconcile(&self, state: &AuthState) {
        let AuthState::Authenticated { user } = state else {
            self.favorites.clear();
            return;
        };

        let result = self.api.fetch_favorites().await;

        // Drop the outcome if the user signed out (or changed) while the
        // request was in flight.
        let still_current = self
            .auth
            .with_state(|current| current.user() == Some(user));
        if !still_current {
            log::debug!("[Favorites] Discarding outcome for a stale session");
            return;
        }

        match result {
            Ok(favorites) => self.favorites.replace(favorites),
            Err(err) => {
                log::warn!("[Favorites] Failed to load favorites: {}", err);
                self.favorites.clear();
                self.notifier.notify(Notification::error(err.message()));
            }
        }
    }

    /// Reconciles the current state, then every later change.
    pub fn spawn(self, mut states: watch::Receiver<AuthState>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut last = states.borrow_and_update().clone();
            self.reconcile(&last).await;

            while states.changed().await.is_ok() {
                let next = states.borrow_and_update().clone();
                if next == last {
                    continue;
                }
                self.reconcile(&next).await;
                last = next;
            }
        })
    }
}
