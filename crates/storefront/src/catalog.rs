//! Catalog view: live service list and search filtering.
//!
//! The catalog is owned by the remote store; this module holds a
//! read-only view of it. Subscriptions deliver the full current list on
//! every change, and the search filter is re-applied to whatever
//! snapshot is current - order within a snapshot is treated as
//! arbitrary.

use std::sync::Arc;

use lotus_core::{ServiceId, ServiceItem};

use crate::store::{CatalogStore, SnapshotReceiver, StoreError};

/// Filter services whose name contains `term`, case-insensitively.
///
/// An empty term returns the full list. Deterministic and synchronous:
/// the caller re-runs it on every term or snapshot change.
#[must_use]
pub fn filter_services(term: &str, services: &[ServiceItem]) -> Vec<ServiceItem> {
    if term.is_empty() {
        return services.to_vec();
    }
    let needle = term.to_lowercase();
    services
        .iter()
        .filter(|s| s.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Read-only catalog view over a [`CatalogStore`].
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
}

impl Catalog {
    /// Create a catalog view over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Fetch the current full service list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn services(&self) -> Result<Vec<ServiceItem>, StoreError> {
        self.store.services().await
    }

    /// Fetch one service by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn get(&self, id: &ServiceId) -> Result<Option<ServiceItem>, StoreError> {
        self.store.service(id).await
    }

    /// Fetch the current list and apply the search filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store read fails.
    pub async fn search(&self, term: &str) -> Result<Vec<ServiceItem>, StoreError> {
        let services = self.store.services().await?;
        Ok(filter_services(term, &services))
    }

    /// Subscribe to the live collection. Dropping the subscription
    /// releases the underlying listener.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the subscription cannot be established.
    pub async fn subscribe(&self) -> Result<CatalogSubscription, StoreError> {
        let rx = self.store.subscribe().await?;
        Ok(CatalogSubscription { rx })
    }
}

/// A live subscription to the service collection.
pub struct CatalogSubscription {
    rx: SnapshotReceiver,
}

impl CatalogSubscription {
    /// The latest delivered snapshot.
    #[must_use]
    pub fn current(&self) -> Vec<ServiceItem> {
        self.rx.borrow().clone()
    }

    /// The latest snapshot with the search filter applied.
    #[must_use]
    pub fn filtered(&self, term: &str) -> Vec<ServiceItem> {
        filter_services(term, &self.rx.borrow())
    }

    /// Wait for the next snapshot delivery. Returns `false` if the
    /// store side has shut down.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
