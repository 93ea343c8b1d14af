//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors
//! to Sentry before responding. Route handlers return
//! `Result<T, AppError>`; the typed lower-layer errors (store,
//! favorites, cart) convert into it, so callers decide on user
//! feedback instead of failures being logged and dropped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cart::CartError;
use crate::favorites::FavoritesError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Favorites operation failed.
    #[error("Favorites error: {0}")]
    Favorites(#[from] FavoritesError),

    /// Cart operation rejected.
    #[error("Cart: {0}")]
    Cart(#[from] CartError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Store(_)
                | Self::Favorites(FavoritesError::Store(_))
                | Self::Session(_)
                | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Favorites(err) => match err {
                FavoritesError::NotSignedIn => StatusCode::UNAUTHORIZED,
                FavoritesError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Cart(CartError::AlreadyInCart) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(_) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Favorites(err) => match err {
                FavoritesError::NotSignedIn => "Sign in to manage favorites".to_string(),
                FavoritesError::Store(_) => "Internal server error".to_string(),
            },
            Self::Cart(CartError::AlreadyInCart) => {
                "Service is already in the cart".to_string()
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from an email.
///
/// Call after login to associate errors with users.
pub fn set_sentry_user(email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("service svc_1".to_string());
        assert_eq!(err.to_string(), "Not found: service svc_1");

        let err = AppError::BadRequest("invalid email".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid email");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Favorites(FavoritesError::NotSignedIn)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Cart(CartError::AlreadyInCart)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_duplicate_cart_add_message_is_user_visible() {
        let response = AppError::Cart(CartError::AlreadyInCart).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
