//! Remote document store seam.
//!
//! The catalog and the per-user favorites documents live in a remote
//! store. Handlers and services depend on the two traits defined here,
//! never on a concrete backend:
//!
//! - [`CatalogStore`] - live-query source for the service collection.
//!   Subscriptions deliver the full current set on every change; no
//!   incremental diff contract exists beyond that.
//! - [`FavoritesStore`] - per-user favorites document: lazily created,
//!   mutated through atomic membership-guarded add/remove operations,
//!   and observable as a snapshot stream.
//!
//! Backends:
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx; snapshot delivery uses
//!   `LISTEN`/`NOTIFY` triggers (see `migrations/`).
//! - [`MemoryStore`] - in-process backend with identical semantics,
//!   used by tests.
//!
//! Dropping a subscription receiver releases the backing listener task.

mod memory;
mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;

use lotus_core::{Email, ServiceId, ServiceItem};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// A live snapshot stream: the receiver always holds the latest full
/// list and is notified whenever the store replaces it.
pub type SnapshotReceiver = watch::Receiver<Vec<ServiceItem>>;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Stored data could not be decoded.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Read access to the live catalog collection.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Fetch the current full service list.
    async fn services(&self) -> Result<Vec<ServiceItem>, StoreError>;

    /// Fetch a single service by id.
    async fn service(&self, id: &ServiceId) -> Result<Option<ServiceItem>, StoreError>;

    /// Subscribe to the collection. The receiver is seeded with the
    /// current list and replaced wholesale on every remote change.
    async fn subscribe(&self) -> Result<SnapshotReceiver, StoreError>;
}

/// Access to per-user favorites documents.
///
/// `add_favorite` and `remove_favorite` are atomic at the store: the
/// membership check and the list mutation happen in one operation, so
/// two rapid toggles (or toggles from two devices) cannot clobber each
/// other the way a read-mutate-write-whole-document cycle can.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Current favorites list for `user`; empty if no document exists.
    async fn favorites(&self, user: &Email) -> Result<Vec<ServiceItem>, StoreError>;

    /// Create the user's favorites document with an empty list if it
    /// does not exist yet. Once any toggle has run, the document exists.
    async fn ensure_document(&self, user: &Email) -> Result<(), StoreError>;

    /// Append `service` unless an entry with the same id is present.
    /// Returns `true` if the list changed; `false` when the entry was
    /// already present or no document exists.
    async fn add_favorite(&self, user: &Email, service: &ServiceItem)
    -> Result<bool, StoreError>;

    /// Remove the entry with `id`, if present. Returns `true` if the
    /// list changed.
    async fn remove_favorite(&self, user: &Email, id: &ServiceId) -> Result<bool, StoreError>;

    /// Subscribe to the user's favorites document. The receiver is
    /// seeded with the current list and replaced wholesale on every
    /// remote change.
    async fn subscribe(&self, user: &Email) -> Result<SnapshotReceiver, StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
