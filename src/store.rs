//! Persisted store of recently viewed coins

use crate::{
    constants::{MAX_VIEWED_COINS, VIEWED_STORE_KEY},
    error::StoreError,
    persistence::ViewedPersistence,
    types::ViewedCoin,
};
use std::collections::HashSet;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Recently viewed coins, most recently first-viewed at the front
///
/// The application opens one store at startup and shares it through an
/// `Arc`. Every mutation is written through to the persistence backend;
/// backend failures are logged and never surface to callers.
///
/// The write-through is synchronous and happens while the list lock is
/// held, so `record_view` blocks the calling thread on backend I/O. From
/// async code, call it through `tokio::task::spawn_blocking`.
pub struct ViewedCoinsStore {
    /// Current list, at most `MAX_VIEWED_COINS` entries, unique by id
    viewed: RwLock<Vec<ViewedCoin>>,
    /// Where the list is written after every mutation
    persistence: Arc<dyn ViewedPersistence>,
}

impl ViewedCoinsStore {
    /// Opens the store, rehydrating any list persisted by an earlier session
    ///
    /// Missing, unreadable or corrupt data yields an empty store.
    pub fn open(persistence: Arc<dyn ViewedPersistence>) -> Self {
        let viewed = match Self::rehydrate(persistence.as_ref()) {
            Ok(viewed) => viewed,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    key = VIEWED_STORE_KEY,
                    "Discarding unreadable viewed-coins state"
                );
                Vec::new()
            }
        };

        tracing::debug!(count = viewed.len(), "Opened viewed-coins store");

        Self {
            viewed: RwLock::new(viewed),
            persistence,
        }
    }

    fn rehydrate(persistence: &dyn ViewedPersistence) -> Result<Vec<ViewedCoin>, StoreError> {
        let Some(raw) = persistence.load(VIEWED_STORE_KEY)? else {
            return Ok(Vec::new());
        };
        let persisted: Vec<ViewedCoin> = serde_json::from_str(&raw)?;
        Ok(normalize(persisted))
    }

    /// Records that the details page of a coin was opened
    ///
    /// A known coin has its view count bumped in place. A new coin is
    /// inserted at the front with one view and the list is cut back to
    /// `MAX_VIEWED_COINS`, dropping the tail.
    ///
    /// Blocks until the backend has stored the new list.
    ///
    /// # Returns
    /// The list after the update
    pub fn record_view(
        &self,
        id: &str,
        name: &str,
        symbol: &str,
        image: &str,
    ) -> Vec<ViewedCoin> {
        let mut viewed = self.write();

        match viewed.iter_mut().find(|coin| coin.id == id) {
            Some(coin) => {
                coin.views = coin.views.saturating_add(1);
                tracing::debug!(id, views = coin.views, "Recorded repeat view");
            }
            None => {
                viewed.insert(0, ViewedCoin::first_view(id, name, symbol, image));
                if viewed.len() > MAX_VIEWED_COINS {
                    let evicted = viewed.split_off(MAX_VIEWED_COINS);
                    for coin in &evicted {
                        tracing::debug!(id = %coin.id, "Evicted viewed coin");
                    }
                }
                tracing::debug!(id, "Recorded first view");
            }
        }

        self.persist(&viewed);
        viewed.clone()
    }

    /// Returns the current list in insertion order
    pub fn viewed(&self) -> Vec<ViewedCoin> {
        self.read().clone()
    }

    /// Returns the entry for a coin, if it has been viewed
    pub fn get(&self, id: &str) -> Option<ViewedCoin> {
        self.read().iter().find(|coin| coin.id == id).cloned()
    }

    /// Number of tracked coins
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when nothing has been viewed yet
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Best-effort write-through of the current list
    fn persist(&self, viewed: &[ViewedCoin]) {
        let result = serde_json::to_string(viewed)
            .map_err(StoreError::from)
            .and_then(|raw| self.persistence.save(VIEWED_STORE_KEY, &raw));

        if let Err(e) = result {
            tracing::warn!(error = %e, key = VIEWED_STORE_KEY, "Failed to persist viewed coins");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<ViewedCoin>> {
        self.viewed.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<ViewedCoin>> {
        self.viewed.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Restores the store invariants on data written by older or foreign code:
/// first occurrence of an id wins, at most `MAX_VIEWED_COINS` entries
fn normalize(persisted: Vec<ViewedCoin>) -> Vec<ViewedCoin> {
    let mut seen = HashSet::new();
    persisted
        .into_iter()
        .filter(|coin| seen.insert(coin.id.clone()))
        .take(MAX_VIEWED_COINS)
        .collect()
}
