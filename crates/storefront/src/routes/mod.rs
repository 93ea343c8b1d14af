//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database)
//!
//! # Catalog
//! GET  /services?q=            - Service list, search-filtered
//! GET  /services/{id}          - Service detail hand-off payload
//!
//! # Favorites
//! GET  /favorites              - Current user's favorites (requires auth)
//! POST /favorites/toggle       - Toggle a service in favorites
//!
//! # Cart (session-scoped)
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add a service (409 on duplicate)
//! POST /cart/remove            - Remove a service
//! GET  /cart/count             - Cart size badge
//!
//! # Auth (identity seam)
//! POST /auth/login             - Store the signed-in identity
//! POST /auth/logout            - Clear the signed-in identity
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the storefront router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(catalog::index))
        .route("/services/{id}", get(catalog::show))
        .route("/favorites", get(favorites::index))
        .route("/favorites/toggle", post(favorites::toggle))
        .route("/cart", get(cart::show))
        .route("/cart/add", post(cart::add))
        .route("/cart/remove", post(cart::remove))
        .route("/cart/count", get(cart::count))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
}
