//! The signed-in user's saved media, kept in step with the auth state.

pub mod reconciler;
pub mod store;

pub use reconciler::FavoritesReconciler;
pub use store::FavoritesStore;
