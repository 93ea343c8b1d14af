//! In-process document store backend.
//!
//! Implements the same contracts as the `PostgreSQL` backend: lazy
//! favorites documents, atomic membership-guarded add/remove, and
//! replace-on-change snapshot delivery. Mutations hold the document
//! lock for the check and the write, which gives the same atomicity
//! the SQL statements give. Used by unit and integration tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use lotus_core::{Email, ServiceId, ServiceItem};

use super::{CatalogStore, FavoritesStore, SnapshotReceiver, StoreError};

/// In-memory implementation of both store traits.
#[derive(Default)]
pub struct MemoryStore {
    services: Mutex<Vec<ServiceItem>>,
    services_tx: Mutex<Option<watch::Sender<Vec<ServiceItem>>>>,
    // Key present iff the user's document exists.
    favorites: Mutex<HashMap<Email, Vec<ServiceItem>>>,
    // Watch senders are held apart from the documents: subscribing
    // must never create the document, only a toggle does.
    watchers: Mutex<HashMap<Email, watch::Sender<Vec<ServiceItem>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog collection, notifying subscribers.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_services(&self, services: Vec<ServiceItem>) {
        let mut guard = self.services.lock().expect("services lock poisoned");
        *guard = services.clone();
        drop(guard);

        let tx = self.services_tx.lock().expect("services_tx lock poisoned");
        if let Some(tx) = tx.as_ref() {
            tx.send_replace(services);
        }
    }

    /// Whether a favorites document exists for `user`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn has_document(&self, user: &Email) -> bool {
        self.favorites
            .lock()
            .expect("favorites lock poisoned")
            .contains_key(user)
    }

    /// Number of favorites documents in the store.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.favorites.lock().expect("favorites lock poisoned").len()
    }

    /// Push the latest favorites snapshot to the user's subscribers,
    /// if any.
    fn notify_favorites(&self, user: &Email, snapshot: Vec<ServiceItem>) {
        let watchers = self.watchers.lock().expect("watchers lock poisoned");
        if let Some(tx) = watchers.get(user) {
            tx.send_replace(snapshot);
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn services(&self) -> Result<Vec<ServiceItem>, StoreError> {
        Ok(self.services.lock().expect("services lock poisoned").clone())
    }

    async fn service(&self, id: &ServiceId) -> Result<Option<ServiceItem>, StoreError> {
        Ok(self
            .services
            .lock()
            .expect("services lock poisoned")
            .iter()
            .find(|s| &s.id == id)
            .cloned())
    }

    async fn subscribe(&self) -> Result<SnapshotReceiver, StoreError> {
        let mut tx_guard = self.services_tx.lock().expect("services_tx lock poisoned");
        // An existing sender already carries the current list; a plain
        // subscribe avoids waking the other receivers.
        if let Some(tx) = tx_guard.as_ref() {
            return Ok(tx.subscribe());
        }

        let current = self.services.lock().expect("services lock poisoned").clone();
        let (tx, rx) = watch::channel(current);
        *tx_guard = Some(tx);
        Ok(rx)
    }
}

#[async_trait]
impl FavoritesStore for MemoryStore {
    async fn favorites(&self, user: &Email) -> Result<Vec<ServiceItem>, StoreError> {
        Ok(self
            .favorites
            .lock()
            .expect("favorites lock poisoned")
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn ensure_document(&self, user: &Email) -> Result<(), StoreError> {
        self.favorites
            .lock()
            .expect("favorites lock poisoned")
            .entry(user.clone())
            .or_default();
        Ok(())
    }

    async fn add_favorite(
        &self,
        user: &Email,
        service: &ServiceItem,
    ) -> Result<bool, StoreError> {
        let mut guard = self.favorites.lock().expect("favorites lock poisoned");
        let Some(list) = guard.get_mut(user) else {
            return Ok(false);
        };
        if list.iter().any(|f| f.id == service.id) {
            return Ok(false);
        }
        list.push(service.clone());
        let snapshot = list.clone();
        drop(guard);

        self.notify_favorites(user, snapshot);
        Ok(true)
    }

    async fn remove_favorite(&self, user: &Email, id: &ServiceId) -> Result<bool, StoreError> {
        let mut guard = self.favorites.lock().expect("favorites lock poisoned");
        let Some(list) = guard.get_mut(user) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|f| &f.id != id);
        if list.len() == before {
            return Ok(false);
        }
        let snapshot = list.clone();
        drop(guard);

        self.notify_favorites(user, snapshot);
        Ok(true)
    }

    async fn subscribe(&self, user: &Email) -> Result<SnapshotReceiver, StoreError> {
        let mut watchers = self.watchers.lock().expect("watchers lock poisoned");
        if let Some(tx) = watchers.get(user) {
            return Ok(tx.subscribe());
        }

        // Seed while holding the watchers lock: a concurrent mutation
        // either lands in the seed or in its pending notification.
        let current = self
            .favorites
            .lock()
            .expect("favorites lock poisoned")
            .get(user)
            .cloned()
            .unwrap_or_default();
        let (tx, rx) = watch::channel(current);
        watchers.insert(user.clone(), tx);
        Ok(rx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> ServiceItem {
        ServiceItem {
            id: ServiceId::parse(id).unwrap(),
            name: name.to_owned(),
            description: String::new(),
            image: String::new(),
        }
    }

    fn user() -> Email {
        Email::parse("guest@example.com").unwrap()
    }

    #[tokio::test]
    async fn test_favorites_empty_without_document() {
        let store = MemoryStore::new();
        assert!(!store.has_document(&user()));
        let favorites = FavoritesStore::favorites(&store, &user()).await.unwrap();
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn test_add_favorite_guards_membership() {
        let store = MemoryStore::new();
        let u = user();
        store.ensure_document(&u).await.unwrap();
        assert!(store.add_favorite(&u, &item("1", "Facial")).await.unwrap());
        assert!(!store.add_favorite(&u, &item("1", "Facial")).await.unwrap());
        let favorites = FavoritesStore::favorites(&store, &u).await.unwrap();
        assert_eq!(favorites.len(), 1);
    }

    #[tokio::test]
    async fn test_add_favorite_without_document_is_noop() {
        let store = MemoryStore::new();
        let added = store.add_favorite(&user(), &item("1", "Facial")).await.unwrap();
        assert!(!added);
        assert!(!store.has_document(&user()));
    }

    #[tokio::test]
    async fn test_remove_absent_favorite_is_noop() {
        let store = MemoryStore::new();
        let u = user();
        store.ensure_document(&u).await.unwrap();
        let removed = store
            .remove_favorite(&u, &ServiceId::parse("1").unwrap())
            .await
            .unwrap();
        assert!(!removed);
    }

    #[tokio::test]
    async fn test_subscribe_does_not_create_document() {
        let store = MemoryStore::new();
        let u = user();

        let rx = FavoritesStore::subscribe(&store, &u).await.unwrap();

        assert!(rx.borrow().is_empty());
        assert!(!store.has_document(&u));
        assert_eq!(store.document_count(), 0);
    }

    #[tokio::test]
    async fn test_catalog_subscribe_sees_replacement() {
        let store = MemoryStore::new();
        store.set_services(vec![item("1", "Facial")]);

        let mut rx = CatalogStore::subscribe(&store).await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        store.set_services(vec![item("1", "Facial"), item("2", "Massage")]);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_new_catalog_subscriber_does_not_wake_existing() {
        let store = MemoryStore::new();
        store.set_services(vec![item("1", "Facial")]);

        let first = CatalogStore::subscribe(&store).await.unwrap();
        let second = CatalogStore::subscribe(&store).await.unwrap();

        assert!(!first.has_changed().unwrap());
        assert_eq!(second.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_favorites_subscribe_sees_updates() {
        let store = MemoryStore::new();
        let u = user();
        let mut rx = FavoritesStore::subscribe(&store, &u).await.unwrap();
        assert!(rx.borrow().is_empty());

        store.ensure_document(&u).await.unwrap();
        store.add_favorite(&u, &item("1", "Facial")).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
