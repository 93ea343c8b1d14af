//! Favorites route handlers.
//!
//! The toggle resolves the identity explicitly via the extractor and
//! passes it into the service; with no signed-in user the service
//! returns a typed error and no store call is made.

use axum::{
    Form, Json,
    extract::State,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lotus_core::{ServiceId, ServiceItem};

use crate::error::{AppError, Result};
use crate::favorites::FavoriteToggle;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub service_id: String,
}

/// Toggle response body.
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// "added" or "removed".
    pub status: &'static str,
}

/// Current user's favorites list.
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ServiceItem>>> {
    let favorites = state.favorites().list(&user.email).await?;
    Ok(Json(favorites))
}

/// Toggle a service in the current user's favorites.
#[instrument(skip(state, user))]
pub async fn toggle(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Form(form): Form<ToggleForm>,
) -> Result<Json<ToggleResponse>> {
    let id = ServiceId::parse(&form.service_id)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    let identity = user.as_ref().map(|u| &u.email);
    let outcome = state.favorites().toggle_for(identity, &service).await?;

    let status = match outcome {
        FavoriteToggle::Added => "added",
        FavoriteToggle::Removed => "removed",
    };
    Ok(Json(ToggleResponse { status }))
}
