use std::sync::Arc;

use marquee_model::{Favorite, MediaType};
use tokio::sync::watch;

/// Favorites collection shared with the presentation layer
#[derive(Clone, Debug)]
pub struct FavoritesStore {
    sender: Arc<watch::Sender<Vec<Favorite>>>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(Vec::new());
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn current(&self) -> Vec<Favorite> {
        self.sender.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.sender.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.borrow().is_empty()
    }

    /// Whether `media_id` of `media_type` is saved.
    pub fn contains(&self, media_type: MediaType, media_id: &str) -> bool {
        self.sender
            .borrow()
            .iter()
            .any(|favorite| favorite.refers_to(media_type, media_id))
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Favorite>> {
        self.sender.subscribe()
    }

    pub fn replace(&self, favorites: Vec<Favorite>) {
        log::debug!("[Favorites] {} saved items", favorites.len());
        self.sender.send_replace(favorites);
    }

    pub fn clear(&self) {
        self.sender.send_if_modified(|favorites| {
            if favorites.is_empty() {
                return false;
            }
            favorites.clear();
            true
        });
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}
