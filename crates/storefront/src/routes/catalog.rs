//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lotus_core::{Email, ServiceId, ServiceItem};

use crate::error::{AppError, Result};
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Catalog list query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Search term, matched case-insensitively against service names.
    #[serde(default)]
    pub q: String,
}

/// Payload handed to the service detail view: the signed-in identity
/// (if any) and the full service snapshot.
#[derive(Debug, Serialize)]
pub struct ServiceDetail {
    pub user: Option<Email>,
    pub service: ServiceItem,
}

/// Service list, filtered by the current search term.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<ServiceItem>>> {
    let services = state.catalog().search(query.q.trim()).await?;
    Ok(Json(services))
}

/// Service detail.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(id): Path<String>,
) -> Result<Json<ServiceDetail>> {
    let id = ServiceId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let service = state
        .catalog()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;

    Ok(Json(ServiceDetail {
        user: user.map(|u| u.email),
        service,
    }))
}
