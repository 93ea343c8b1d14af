//! Cart route handlers.
//!
//! The cart lives in the web session: every handler loads it, mutates
//! it, and writes it back. The cart page reads the same session state,
//! so adding from the catalog needs no explicit reload hand-off.

use axum::{
    Form, Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lotus_core::ServiceId;

use crate::cart::SessionCart;
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

/// Load the session cart, defaulting to empty.
async fn load_cart(session: &Session) -> Result<SessionCart> {
    Ok(session
        .get::<SessionCart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the session cart back.
async fn save_cart(session: &Session, cart: &SessionCart) -> Result<()> {
    session.insert(session_keys::CART, cart).await?;
    Ok(())
}

/// Add-to-cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub service_id: String,
}

/// Remove-from-cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub service_id: String,
}

/// Cart mutation response body.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub status: &'static str,
    pub count: usize,
}

/// Cart count response body.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: usize,
}

/// Cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<SessionCart>> {
    Ok(Json(load_cart(&session).await?))
}

/// Add a service to the cart.
///
/// Duplicates are rejected with a 409 and a user-visible notice; the
/// cart is left unchanged.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<CartResponse>> {
    let id = ServiceId::parse(&form.service_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    let mut cart = load_cart(&session).await?;
    cart.add(service)?;
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse {
        status: "added",
        count: cart.len(),
    }))
}

/// Remove a service from the cart.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<CartResponse>> {
    let id = ServiceId::parse(&form.service_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut cart = load_cart(&session).await?;
    if !cart.remove(&id) {
        return Err(AppError::NotFound(format!("service {id} not in cart")));
    }
    save_cart(&session, &cart).await?;

    Ok(Json(CartResponse {
        status: "removed",
        count: cart.len(),
    }))
}

/// Cart count badge.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<Json<CartCount>> {
    let cart = load_cart(&session).await?;
    Ok(Json(CartCount { count: cart.len() }))
}
