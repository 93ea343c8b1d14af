//! Catalog service types.
//!
//! A [`ServiceItem`] is a denormalized snapshot of one catalog record:
//! favorites documents and session carts store full copies, not
//! references, so the type is plain data and serde-serializable.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ServiceId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceIdError {
    /// The input string is empty.
    #[error("service id cannot be empty")]
    Empty,
}

/// Source-assigned identifier of a catalog service.
///
/// IDs are opaque strings assigned by catalog management; the storefront
/// never generates them. The only invariant enforced here is
/// non-emptiness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Create a `ServiceId` from a string known to be non-empty
    /// (e.g. read back from the database).
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self(id)
    }

    /// Parse a `ServiceId` from client input.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceIdError::Empty`] if the input is empty.
    pub fn parse(s: &str) -> Result<Self, ServiceIdError> {
        if s.is_empty() {
            return Err(ServiceIdError::Empty);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ServiceId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ServiceId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ServiceId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

/// One catalog service record as seen by the storefront.
///
/// Read-only from the client's perspective; created and updated by
/// catalog management.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceItem {
    /// Source-assigned unique id.
    pub id: ServiceId,
    /// Display name, the field the search filter matches against.
    pub name: String,
    /// Short description shown in listings.
    pub description: String,
    /// Image URL.
    pub image: String,
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
    fn test_parse_rejects_empty() {
        assert_eq!(ServiceId::parse(""), Err(ServiceIdError::Empty));
    }

    #[test]
    fn test_parse_keeps_input_verbatim() {
        let id = ServiceId::parse("svc_001").unwrap();
        assert_eq!(id.as_str(), "svc_001");
        assert_eq!(id.to_string(), "svc_001");
    }

    #[test]
    fn test_service_item_serde() {
        let svc = item("1", "Facial");
        let json = serde_json::to_value(&svc).unwrap();
        assert_eq!(json["id"], "1");
        assert_eq!(json["name"], "Facial");
        let back: ServiceItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, svc);
    }
}
