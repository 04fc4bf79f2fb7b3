//! Shared application state handed to every component.

use crate::common::loading::LoadingIndicator;
use crate::domains::auth::state_types::AuthStateStore;
use crate::domains::favorites::store::FavoritesStore;

/// Injectable bundle of the process-wide stores. Clones share the same
/// underlying channels.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthStateStore,
    pub favorites: FavoritesStore,
    /// Raised while the session bootstrap runs.
    pub global_loading: LoadingIndicator,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
