//! Session cart.
//!
//! The cart is owned entirely by the web session: it is never persisted
//! to the store and is discarded when the session ends. The cart page
//! and the catalog page read the same session state, so no explicit
//! reload hand-off between them is needed.

use lotus_core::{ServiceId, ServiceItem};
use serde::{Deserialize, Serialize};

/// Errors from cart operations. These are user-visible notices, not
/// failures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CartError {
    /// The service is already in the cart; the cart is unchanged.
    #[error("service is already in the cart")]
    AlreadyInCart,
}

/// An ordered list of service snapshots with at most one entry per id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionCart {
    items: Vec<ServiceItem>,
}

impl SessionCart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append `service` to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AlreadyInCart`] if an entry with the same
    /// id exists; the cart is left unchanged.
    pub fn add(&mut self, service: ServiceItem) -> Result<(), CartError> {
        if self.contains(&service.id) {
            return Err(CartError::AlreadyInCart);
        }
        self.items.push(service);
        Ok(())
    }

    /// Remove the entry with `id`. Returns `true` if the cart changed.
    pub fn remove(&mut self, id: &ServiceId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Whether the cart holds an entry with `id`.
    #[must_use]
    pub fn contains(&self, id: &ServiceId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// The cart contents, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[ServiceItem] {
        &self.items
    }

    /// Number of entries in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str) -> ServiceItem {
        ServiceItem {
            id: ServiceId::parse(id).unwrap(),
            name: name.to_owned(),
            description: String::new(),
            image: String::new(),
        }
    }

    #[test]
    fn test_add_and_list() {
        let mut cart = SessionCart::new();
        cart.add(item("1", "Facial")).unwrap();
        cart.add(item("2", "Massage")).unwrap();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.items()[0].id.as_str(), "1");
    }

    #[test]
    fn test_duplicate_add_rejected_cart_unchanged() {
        let mut cart = SessionCart::new();
        cart.add(item("1", "Facial")).unwrap();
        let before = cart.clone();

        let result = cart.add(item("1", "Facial"));

        assert_eq!(result, Err(CartError::AlreadyInCart));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_at_most_one_entry_per_id() {
        let mut cart = SessionCart::new();
        for _ in 0..3 {
            let _ = cart.add(item("1", "Facial"));
            let _ = cart.add(item("2", "Massage"));
        }
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut cart = SessionCart::new();
        cart.add(item("1", "Facial")).unwrap();

        assert!(cart.remove(&ServiceId::parse("1").unwrap()));
        assert!(cart.is_empty());
        assert!(!cart.remove(&ServiceId::parse("1").unwrap()));
    }

    #[test]
    fn test_serde_roundtrip_for_session_storage() {
        let mut cart = SessionCart::new();
        cart.add(item("1", "Facial")).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: SessionCart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
