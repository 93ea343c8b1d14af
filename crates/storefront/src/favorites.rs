//! Per-user favorites: toggle protocol and live mirror.
//!
//! The favorites list is owned by the remote store. A toggle never
//! mutates local state directly: its effect becomes visible through the
//! [`FavoritesMirror`] only after the next snapshot delivery, so the
//! eventual-consistency window is explicit and testable rather than a
//! timing artifact.
//!
//! Membership for a toggle is decided from a single source - the list
//! fetched from the store at the start of the call - and the write
//! itself is an atomic membership-guarded add/remove at the store, so
//! two rapid toggles cannot silently clobber each other.

use std::sync::Arc;

use lotus_core::{Email, ServiceId, ServiceItem};

use crate::store::{FavoritesStore, SnapshotReceiver, StoreError};

/// Outcome of a favorites toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    /// The service was appended to the favorites list.
    Added,
    /// The service was removed from the favorites list.
    Removed,
}

/// Errors from favorites operations.
#[derive(Debug, thiserror::Error)]
pub enum FavoritesError {
    /// No signed-in identity was provided; no store call was made.
    #[error("no signed-in user")]
    NotSignedIn,

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Favorites operations for all users, over a [`FavoritesStore`].
#[derive(Clone)]
pub struct FavoritesService {
    store: Arc<dyn FavoritesStore>,
}

impl FavoritesService {
    /// Create a favorites service over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self { store }
    }

    /// Toggle `service` in the user's favorites.
    ///
    /// Lazily creates the favorites document on first use, decides
    /// membership from the freshly fetched authoritative list, and
    /// applies the matching atomic store operation.
    ///
    /// The outcome describes the resulting membership. When a
    /// concurrent toggle already applied the same change, the store's
    /// membership guard turns this call into a no-op and the outcome
    /// still reports the state both toggles converged on.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Store`] if any store call fails; the
    /// operation is not retried.
    pub async fn toggle(
        &self,
        user: &Email,
        service: &ServiceItem,
    ) -> Result<FavoriteToggle, FavoritesError> {
        // Establishes the invariant that the document exists once any
        // toggle has run.
        self.store.ensure_document(user).await?;

        let current = self.store.favorites(user).await?;
        if current.iter().any(|f| f.id == service.id) {
            let changed = self.store.remove_favorite(user, &service.id).await?;
            if !changed {
                tracing::debug!(
                    user = %user,
                    service = %service.id,
                    "entry already removed by a concurrent toggle"
                );
            }
            Ok(FavoriteToggle::Removed)
        } else {
            let changed = self.store.add_favorite(user, service).await?;
            if !changed {
                tracing::debug!(
                    user = %user,
                    service = %service.id,
                    "entry already added by a concurrent toggle"
                );
            }
            Ok(FavoriteToggle::Added)
        }
    }

    /// Toggle with an optional identity.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::NotSignedIn`] without touching the
    /// store when `identity` is `None`; otherwise as [`Self::toggle`].
    pub async fn toggle_for(
        &self,
        identity: Option<&Email>,
        service: &ServiceItem,
    ) -> Result<FavoriteToggle, FavoritesError> {
        let user = identity.ok_or(FavoritesError::NotSignedIn)?;
        self.toggle(user, service).await
    }

    /// Current favorites list for `user`; empty if nothing was ever
    /// favorited.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Store`] if the store read fails.
    pub async fn list(&self, user: &Email) -> Result<Vec<ServiceItem>, FavoritesError> {
        Ok(self.store.favorites(user).await?)
    }

    /// Open a live mirror of the user's favorites document. Dropping
    /// the mirror releases the underlying listener.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Store`] if the subscription cannot be
    /// established.
    pub async fn mirror(&self, user: &Email) -> Result<FavoritesMirror, FavoritesError> {
        let rx = self.store.subscribe(user).await?;
        Ok(FavoritesMirror { rx })
    }
}

/// Live local mirror of one user's favorites document.
///
/// The sole mechanism keeping local favorites state consistent with the
/// remote store: it is replaced wholesale on each snapshot delivery and
/// never updated synchronously by a toggle.
pub struct FavoritesMirror {
    rx: SnapshotReceiver,
}

impl FavoritesMirror {
    /// The latest delivered favorites snapshot.
    #[must_use]
    pub fn current(&self) -> Vec<ServiceItem> {
        self.rx.borrow().clone()
    }

    /// Whether the latest snapshot contains `id`.
    #[must_use]
    pub fn is_favorite(&self, id: &ServiceId) -> bool {
        self.rx.borrow().iter().any(|f| &f.id == id)
    }

    /// Wait for the next snapshot delivery. Returns `false` if the
    /// store side has shut down.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
