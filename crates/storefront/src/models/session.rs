//! Session-stored types and keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lotus_core::Email;

/// Minimal identity stored in the session for a signed-in user.
///
/// The identity provider is an external collaborator; all this service
/// needs from it is the email, which keys the favorites document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedInUser {
    /// The user's email address.
    pub email: Email,
    /// When the identity was placed in the session.
    pub signed_in_at: DateTime<Utc>,
}

/// Session keys.
pub mod session_keys {
    /// Key for the signed-in user's identity.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";
}
