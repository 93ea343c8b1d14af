//! Integration tests for the Lotus Lane storefront.
//!
//! The tests live in `tests/`:
//!
//! - `catalog_feed.rs` and `favorites_sync.rs` run the business core
//!   end-to-end over the in-memory store backend and need no external
//!   services.
//! - `storefront_http.rs` smoke-tests a running server over HTTP and
//!   is `#[ignore]`d by default.

#![cfg_attr(not(test), forbid(unsafe_code))]

use lotus_core::{ServiceId, ServiceItem};

/// Build a service snapshot for tests.
///
/// # Panics
///
/// Panics if `id` is empty.
#[must_use]
pub fn service(id: &str, name: &str) -> ServiceItem {
    ServiceItem {
        id: ServiceId::parse(id).expect("test service id"),
        name: name.to_owned(),
        description: format!("{name} at Lotus Lane"),
        image: format!("https://cdn.lotuslane.dev/{id}.jpg"),
    }
}
