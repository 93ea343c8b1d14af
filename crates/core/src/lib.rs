//! Shared domain types for the Lotus Lane storefront.
//!
//! These types are validated at the boundary and passed around by value:
//! handlers, services, and stores all speak in terms of them rather than
//! raw strings.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::email::{Email, EmailError};
pub use types::service::{ServiceId, ServiceIdError, ServiceItem};
