//! End-to-end tests of favorites synchronization: toggle protocol,
//! lazy document creation, and the live mirror's eventual consistency.

use std::sync::Arc;
use std::time::Duration;

use lotus_core::Email;
use lotus_integration_tests::service;
use lotus_storefront::favorites::{FavoriteToggle, FavoritesError, FavoritesService};
use lotus_storefront::store::{FavoritesStore, MemoryStore};

fn user(addr: &str) -> Email {
    Email::parse(addr).expect("test email")
}

fn favorites_over(store: &Arc<MemoryStore>) -> FavoritesService {
    FavoritesService::new(Arc::clone(store) as Arc<dyn FavoritesStore>)
}

#[tokio::test]
async fn first_toggle_creates_document_with_the_item() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let u = user("linh@example.com");

    assert!(!store.has_document(&u));

    let outcome = favorites
        .toggle(&u, &service("1", "Facial"))
        .await
        .expect("toggle");
    assert_eq!(outcome, FavoriteToggle::Added);
    assert!(store.has_document(&u));

    let list = favorites.list(&u).await.expect("list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id.as_str(), "1");
}

#[tokio::test]
async fn toggling_twice_is_idempotent_on_membership() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let u = user("linh@example.com");
    let svc = service("1", "Facial");

    favorites.toggle(&u, &svc).await.expect("first toggle");
    let outcome = favorites.toggle(&u, &svc).await.expect("second toggle");

    assert_eq!(outcome, FavoriteToggle::Removed);
    assert!(favorites.list(&u).await.expect("list").is_empty());
}

#[tokio::test]
async fn missing_identity_is_a_typed_error_with_no_store_call() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);

    let result = favorites.toggle_for(None, &service("1", "Facial")).await;

    assert!(matches!(result, Err(FavoritesError::NotSignedIn)));
    assert_eq!(store.document_count(), 0);
}

#[tokio::test]
async fn opening_a_mirror_does_not_create_the_document() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let u = user("linh@example.com");

    let mirror = favorites.mirror(&u).await.expect("mirror");

    // Only a toggle creates the document; observing does not.
    assert!(mirror.current().is_empty());
    assert!(!store.has_document(&u));
    assert_eq!(store.document_count(), 0);
}

#[tokio::test]
async fn mirror_sees_toggle_only_via_snapshot_delivery() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let u = user("linh@example.com");
    let svc = service("1", "Facial");

    let mut mirror = favorites.mirror(&u).await.expect("mirror");
    assert!(mirror.current().is_empty());

    favorites.toggle(&u, &svc).await.expect("toggle");

    // The local mirror catches up when the snapshot arrives, not
    // synchronously with the write.
    tokio::time::timeout(Duration::from_secs(1), mirror.changed())
        .await
        .expect("snapshot delivery");
    assert!(mirror.is_favorite(&svc.id));

    favorites.toggle(&u, &svc).await.expect("untoggle");
    tokio::time::timeout(Duration::from_secs(1), mirror.changed())
        .await
        .expect("snapshot delivery");
    assert!(!mirror.is_favorite(&svc.id));
}

#[tokio::test]
async fn mirrors_are_scoped_per_user() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let linh = user("linh@example.com");
    let mai = user("mai@example.com");

    let mirror_mai = favorites.mirror(&mai).await.expect("mirror");

    favorites
        .toggle(&linh, &service("1", "Facial"))
        .await
        .expect("toggle");

    // Another user's mirror must not pick up the change
    tokio::task::yield_now().await;
    assert!(mirror_mai.current().is_empty());
}

#[tokio::test]
async fn favorites_lists_are_independent_per_user() {
    let store = Arc::new(MemoryStore::new());
    let favorites = favorites_over(&store);
    let linh = user("linh@example.com");
    let mai = user("mai@example.com");

    favorites
        .toggle(&linh, &service("1", "Facial"))
        .await
        .expect("toggle");
    favorites
        .toggle(&mai, &service("2", "Massage"))
        .await
        .expect("toggle");

    let linh_list = favorites.list(&linh).await.expect("list");
    let mai_list = favorites.list(&mai).await.expect("list");
    assert_eq!(linh_list.len(), 1);
    assert_eq!(linh_list[0].id.as_str(), "1");
    assert_eq!(mai_list.len(), 1);
    assert_eq!(mai_list[0].id.as_str(), "2");
}
