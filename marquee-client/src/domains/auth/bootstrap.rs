use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

use super::errors::SessionError;
use super::state_types::{AuthState, AuthStateStore};
use super::storage::SessionStore;
use crate::common::loading::LoadingIndicator;
use crate::common::notifications::{Notification, Notifier};
use crate::infra::api_client::SessionEvent;
use crate::infra::services::ApiService;

pub const USER_INFO_FAILED: &str = "Failed to get user information";

/// Resolves the stored session into an [`AuthState`].
#[derive(Clone)]
pub struct SessionBootstrap {
    api: Arc<dyn ApiService>,
    session: Arc<dyn SessionStore>,
    auth: AuthStateStore,
    loading: LoadingIndicator,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for SessionBootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionBootstrap")
            .field("api", &self.api)
            .field("session", &self.session)
            .field("auth", &self.auth)
            .field("loading", &self.loading)
            .finish_non_exhaustive()
    }
}

impl SessionBootstrap {
    pub fn new(
        api: Arc<dyn ApiService>,
        session: Arc<dyn SessionStore>,
        auth: AuthStateStore,
        loading: LoadingIndicator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            session,
            auth,
            loading,
            notifier,
        }
    }

    /// Validates the stored token, if any, and returns the settled state.
    ///
    /// The loading indicator is held for the whole run, including the
    /// no-token short circuit.
    pub async fn run(&self) -> AuthState {
        let _loading = self.loading.begin();

        if self.stored_token().await.is_none() {
            log::debug!("[SessionBootstrap] No stored token; skipping user lookup");
            self.auth.logout();
            return AuthState::Anonymous;
        }

        self.auth.begin_check();

        match self.api.fetch_current_user().await {
            Ok(user) => {
                log::info!("[SessionBootstrap] Session restored for {}", user.label());
                self.auth.authenticate(user);
            }
            Err(err) if err.is_unauthorized() => {
                // The gateway already purged the token.
                log::info!("[SessionBootstrap] Stored token rejected: {}", err);
                self.auth.logout();
            }
            Err(err) => {
                log::warn!("[SessionBootstrap] User lookup failed: {}", err);
                self.auth.logout();
                self.notifier.notify(Notification::error(USER_INFO_FAILED));
            }
        }

        self.auth.current()
    }

    /// Stores a freshly issued token and validates it.
    pub async fn login(&self, token: &str) -> Result<AuthState, SessionError> {
        self.session.store_token(token).await?;
        Ok(self.run().await)
    }

    /// Clears the slot and the profile. The state becomes `Anonymous` even
    /// if the slot could not be removed.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let cleared = self.session.clear().await;
        self.auth.logout();
        cleared
    }

    /// Follows gateway purges so an authenticated state never outlives its
    /// token.
    pub fn spawn_purge_listener(
        &self,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let session = Arc::clone(&self.session);
        let auth = self.auth.clone();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::TokenPurged) | Err(RecvError::Lagged(_)) => {
                        handle_purge(session.as_ref(), &auth).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    async fn stored_token(&self) -> Option<String> {
        match self.session.token().await {
            Ok(token) => token,
            Err(err) => {
                log::warn!(
                    "[SessionBootstrap] Discarding unreadable session slot: {}",
                    err
                );
                if let Err(clear_err) = self.session.clear().await {
                    log::error!(
                        "[SessionBootstrap] Failed to clear session slot: {}",
                        clear_err
                    );
                }
                None
            }
        }
    }
}

async fn handle_purge(session: &dyn SessionStore, auth: &AuthStateStore) {
    if !auth.is_authenticated() {
        return;
    }
    // A login may have stored a new token since the purge.
    match session.token().await {
        Ok(None) | Err(_) => {
            log::info!("[SessionBootstrap] Session token purged; signing out");
            auth.logout();
        }
        Ok(Some(_)) => {}
    }
}
