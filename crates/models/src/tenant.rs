//! Tenant identifiers
//!
//! A tenant is a store whose data lives in its own database. The identifier is
//! embedded verbatim into that database's name, so only a conservative
//! character set is accepted.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifiers that address the primary database instead of a tenant database.
pub const PRIMARY_TENANT_IDS: [&str; 2] = ["main", "default"];

/// Longest accepted identifier. MySQL caps schema names at 64 characters and
/// the default `consignment_` prefix takes twelve of them.
pub const MAX_TENANT_ID_LEN: usize = 52;

/// MySQL limit on schema names
pub const MAX_DATABASE_NAME_LEN: usize = 64;

// Tenant identifier allow-list
lazy_static::lazy_static! {
    static ref TENANT_ID_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTenantId {
    #[error("tenant identifier is empty")]
    Empty,

    #[error("tenant identifier exceeds {MAX_TENANT_ID_LEN} characters")]
    TooLong,

    #[error("tenant identifier may only contain ASCII letters, digits and '_'")]
    InvalidCharacters,

    #[error("database name for this tenant exceeds {MAX_DATABASE_NAME_LEN} characters")]
    DatabaseNameTooLong,
}

/// Validated tenant identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(raw: &str) -> Result<Self, InvalidTenantId> {
        if raw.is_empty() {
            return Err(InvalidTenantId::Empty);
        }
        if Self::is_primary_id(raw) {
            return Ok(Self(raw.to_string()));
        }
        if raw.len() > MAX_TENANT_ID_LEN {
            return Err(InvalidTenantId::TooLong);
        }
        if !TENANT_ID_REGEX.is_match(raw) {
            return Err(InvalidTenantId::InvalidCharacters);
        }
        Ok(Self(raw.to_string()))
    }

    /// The tenant used when a request names none
    pub fn primary() -> Self {
        Self("default".to_string())
    }

    pub fn is_primary_id(raw: &str) -> bool {
        PRIMARY_TENANT_IDS.contains(&raw)
    }

    /// True for `main` and `default`, which share the primary database
    pub fn is_primary(&self) -> bool {
        Self::is_primary_id(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the database holding this tenant's data
    pub fn database_name(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }

    /// Like `database_name`, but fails when the prefix pushes the name past
    /// what MySQL accepts
    pub fn checked_database_name(&self, prefix: &str) -> Result<String, InvalidTenantId> {
        if prefix.len() + self.0.len() > MAX_DATABASE_NAME_LEN {
            return Err(InvalidTenantId::DatabaseNameTooLong);
        }
        Ok(self.database_name(prefix))
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = InvalidTenantId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(id: TenantId) -> Self {
        id.0
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_store_names() {
        assert_eq!(TenantId::parse("shopA").unwrap().as_str(), "shopA");
        assert_eq!(TenantId::parse("store_42").unwrap().as_str(), "store_42");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(TenantId::parse(""), Err(InvalidTenantId::Empty));
    }

    #[test]
    fn test_parse_rejects_sql_metacharacters() {
        for raw in ["shop-a", "shop a", "shop`; DROP DATABASE x", "tienda.uno", "ñandú"] {
            assert_eq!(
                TenantId::parse(raw),
                Err(InvalidTenantId::InvalidCharacters),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_long_identifiers() {
        let raw = "a".repeat(MAX_TENANT_ID_LEN + 1);
        assert_eq!(TenantId::parse(&raw), Err(InvalidTenantId::TooLong));
        assert!(TenantId::parse(&"a".repeat(MAX_TENANT_ID_LEN)).is_ok());
    }

    #[test]
    fn test_primary_identifiers() {
        assert!(TenantId::parse("main").unwrap().is_primary());
        assert!(TenantId::parse("default").unwrap().is_primary());
        assert!(TenantId::primary().is_primary());
        assert!(!TenantId::parse("Default").unwrap().is_primary());
    }

    #[test]
    fn test_database_name() {
        let tenant = TenantId::parse("shopA").unwrap();
        assert_eq!(tenant.database_name("consignment_"), "consignment_shopA");
    }

    #[test]
    fn test_checked_database_name_respects_prefix_length() {
        let tenant = TenantId::parse(&"a".repeat(MAX_TENANT_ID_LEN)).unwrap();
        assert_eq!(tenant.checked_database_name("consignment_").unwrap().len(), 64);
        assert_eq!(
            tenant.checked_database_name("consignment_store_"),
            Err(InvalidTenantId::DatabaseNameTooLong)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TenantId = serde_json::from_str("\"shopA\"").unwrap();
        assert_eq!(ok.as_str(), "shopA");
        assert!(serde_json::from_str::<TenantId>("\"bad name\"").is_err());
    }
}
