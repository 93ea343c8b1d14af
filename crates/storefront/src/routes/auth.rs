//! Auth route handlers.
//!
//! The identity provider proper is an external collaborator; these
//! routes are the minimal seam that places a verified identity into
//! the session (and clears it again). Everything downstream receives
//! the identity explicitly via the extractors in `middleware::auth`.

use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lotus_core::Email;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_signed_in_user, set_signed_in_user};
use crate::models::SignedInUser;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
}

/// Auth response body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub status: &'static str,
}

/// Store the signed-in identity in the session.
#[instrument(skip(session, form))]
pub async fn login(session: Session, Form(form): Form<LoginForm>) -> Result<Json<AuthResponse>> {
    let email = Email::parse(&form.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = SignedInUser {
        email: email.clone(),
        signed_in_at: chrono::Utc::now(),
    };
    set_signed_in_user(&session, &user).await?;
    set_sentry_user(email.as_str());

    tracing::info!(user = %email, "user signed in");
    Ok(Json(AuthResponse {
        status: "signed_in",
    }))
}

/// Clear the signed-in identity from the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<AuthResponse>> {
    clear_signed_in_user(&session).await?;
    clear_sentry_user();

    Ok(Json(AuthResponse {
        status: "signed_out",
    }))
}
