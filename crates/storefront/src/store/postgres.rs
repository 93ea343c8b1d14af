//! `PostgreSQL` document store backend.
//!
//! # Tables
//!
//! - `services` - the catalog collection, one row per service
//! - `user_favorites` - one row per user (keyed by email), favorites
//!   held as a JSONB array of service snapshots
//!
//! # Snapshot delivery
//!
//! Triggers (see `migrations/`) emit `pg_notify` on the
//! `lotus_services_changed` and `lotus_favorites_changed` channels;
//! the favorites payload is the owning user's email. Each subscription
//! runs a `PgListener` task that re-fetches the full current state on
//! every notification and pushes it into a watch channel, which gives
//! subscribers the replace-on-change semantics the rest of the code
//! relies on.

use async_trait::async_trait;
use sqlx::postgres::PgListener;
use sqlx::{PgPool, Row};
use tokio::sync::watch;

use lotus_core::{Email, ServiceId, ServiceItem};

use super::{CatalogStore, FavoritesStore, SnapshotReceiver, StoreError};

/// Notification channel for catalog changes.
const SERVICES_CHANNEL: &str = "lotus_services_changed";

/// Notification channel for favorites changes; payload is the user email.
const FAVORITES_CHANNEL: &str = "lotus_favorites_changed";

/// `PostgreSQL`-backed implementation of both store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Fetch the full service list, ordered by name for stable output.
async fn fetch_services(pool: &PgPool) -> Result<Vec<ServiceItem>, StoreError> {
    let rows = sqlx::query("SELECT id, name, description, image FROM services ORDER BY name")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            Ok(ServiceItem {
                id: ServiceId::new(row.try_get("id")?),
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                image: row.try_get("image")?,
            })
        })
        .collect()
}

/// Fetch a user's favorites list; empty if no document exists.
async fn fetch_favorites(pool: &PgPool, user: &Email) -> Result<Vec<ServiceItem>, StoreError> {
    let row = sqlx::query("SELECT favorites FROM user_favorites WHERE email = $1")
        .bind(user.as_str())
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let value: serde_json::Value = row.try_get("favorites")?;
            serde_json::from_value(value).map_err(|e| {
                StoreError::DataCorruption(format!("invalid favorites document: {e}"))
            })
        }
        None => Ok(Vec::new()),
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn services(&self) -> Result<Vec<ServiceItem>, StoreError> {
        fetch_services(&self.pool).await
    }

    async fn service(&self, id: &ServiceId) -> Result<Option<ServiceItem>, StoreError> {
        let row = sqlx::query("SELECT id, name, description, image FROM services WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(ServiceItem {
                id: ServiceId::new(row.try_get("id")?),
                name: row.try_get("name")?,
                description: row.try_get("description")?,
                image: row.try_get("image")?,
            })),
            None => Ok(None),
        }
    }

    async fn subscribe(&self) -> Result<SnapshotReceiver, StoreError> {
        // Listen before the seed fetch: a write landing in between
        // still queues a notification, so the first snapshot cannot
        // go stale silently.
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(SERVICES_CHANNEL).await?;

        let initial = fetch_services(&self.pool).await?;
        let (tx, rx) = watch::channel(initial);

        let pool = self.pool.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = tx.closed() => break,
                    notification = listener.recv() => match notification {
                        Ok(_) => match fetch_services(&pool).await {
                            Ok(services) => {
                                tx.send_replace(services);
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to refresh catalog snapshot");
                            }
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "catalog listener disconnected");
                            break;
                        }
                    },
                }
            }
        });

        Ok(rx)
    }
}

#[async_trait]
impl FavoritesStore for PgStore {
    async fn favorites(&self, user: &Email) -> Result<Vec<ServiceItem>, StoreError> {
        fetch_favorites(&self.pool, user).await
    }

    async fn ensure_document(&self, user: &Email) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO user_favorites (email, favorites) VALUES ($1, '[]'::jsonb) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(user.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn add_favorite(
        &self,
        user: &Email,
        service: &ServiceItem,
    ) -> Result<bool, StoreError> {
        let snapshot = serde_json::to_value(service)
            .map_err(|e| StoreError::DataCorruption(format!("unserializable service: {e}")))?;

        // Appending a jsonb object to a jsonb array adds it as one element.
        // The NOT EXISTS guard makes the membership check and the append a
        // single atomic statement.
        let result = sqlx::query(
            "UPDATE user_favorites \
             SET favorites = favorites || $2::jsonb, updated_at = now() \
             WHERE email = $1 \
               AND NOT EXISTS ( \
                 SELECT 1 FROM jsonb_array_elements(favorites) AS entry \
                 WHERE entry->>'id' = $3 \
               )",
        )
        .bind(user.as_str())
        .bind(snapshot)
        .bind(service.id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_favorite(&self, user: &Email, id: &ServiceId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE user_favorites \
             SET favorites = ( \
                 SELECT COALESCE(jsonb_agg(entry), '[]'::jsonb) \
                 FROM jsonb_array_elements(favorites) AS entry \
                 WHERE entry->>'id' <> $2 \
             ), updated_at = now() \
             WHERE email = $1 \
               AND EXISTS ( \
                 SELECT 1 FROM jsonb_array_elements(favorites) AS entry \
                 WHERE entry->>'id' = $2 \
               )",
        )
        .bind(user.as_str())
        .bind(id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn subscribe(&self, user: &Email) -> Result<SnapshotReceiver, StoreError> {
        // Listen-then-fetch, for the same reason as the catalog
        // subscription.
        let mut listener = PgListener::connect_with(&self.pool).await?;
        listener.listen(FAVORITES_CHANNEL).await?;

        let initial = fetch_favorites(&self.pool, user).await?;
        let (tx, rx) = watch::channel(initial);

        let pool = self.pool.clone();
        let user = user.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = tx.closed() => break,
                    notification = listener.recv() => match notification {
                        Ok(n) if n.payload() == user.as_str() => {
                            match fetch_favorites(&pool, &user).await {
                                Ok(favorites) => {
                                    tx.send_replace(favorites);
                                }
                                Err(e) => {
                                    tracing::warn!(
                                        user = %user,
                                        error = %e,
                                        "failed to refresh favorites snapshot"
                                    );
                                }
                            }
                        }
                        // Notification for another user's document
                        Ok(_) => {}
                        Err(e) => {
                            tracing::warn!(error = %e, "favorites listener disconnected");
                            break;
                        }
                    },
                }
            }
        });

        Ok(rx)
    }
}
