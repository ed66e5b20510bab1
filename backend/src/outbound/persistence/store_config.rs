//! Identity store coordinates: endpoint, database, and user collection.

use std::fmt;

use zeroize::Zeroizing;

use super::pool::{PoolConfig, PoolError};

/// PostgreSQL's identifier length limit in bytes.
pub const COLLECTION_NAME_MAX: usize = 63;

/// Reasons a collection name is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionNameError {
    /// The name is empty.
    #[error("collection name must not be empty")]
    Empty,
    /// The name exceeds [`COLLECTION_NAME_MAX`] bytes.
    #[error("collection name must be at most {max} bytes")]
    TooLong { max: usize },
    /// The name is not a plain SQL identifier.
    #[error("collection name must start with a letter or underscore and contain only ASCII letters, digits, or underscores")]
    InvalidCharacters,
}

/// Table holding existing identity records.
///
/// Restricted to a plain SQL identifier because it is interpolated into the
/// lookup query rather than bound as a parameter.
///
/// # Examples
/// ```
/// use identity_registration::outbound::persistence::CollectionName;
///
/// assert!(CollectionName::new("users").is_ok());
/// assert!(CollectionName::new("users; drop table users").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName(String);

impl CollectionName {
    /// Validate `name` as an unquoted PostgreSQL identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, CollectionNameError> {
        let name = name.into();
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(CollectionNameError::Empty);
        };
        if name.len() > COLLECTION_NAME_MAX {
            return Err(CollectionNameError::TooLong {
                max: COLLECTION_NAME_MAX,
            });
        }
        let valid_first = first.is_ascii_alphabetic() || first == '_';
        if !valid_first || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(CollectionNameError::InvalidCharacters);
        }
        Ok(Self(name))
    }

    /// The validated name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where identity records live.
#[derive(Clone)]
pub struct IdentityStoreConfig {
    connection_string: Zeroizing<String>,
    database_id: String,
    collection: CollectionName,
}

impl IdentityStoreConfig {
    /// Bundle the store endpoint, database id, and collection.
    pub fn new(
        connection_string: impl Into<String>,
        database_id: impl Into<String>,
        collection: CollectionName,
    ) -> Self {
        Self {
            connection_string: Zeroizing::new(connection_string.into()),
            database_id: database_id.into(),
            collection,
        }
    }

    /// Database that overrides the one named in the endpoint.
    pub fn database_id(&self) -> &str {
        self.database_id.as_str()
    }

    /// Table queried by the lookup.
    pub fn collection(&self) -> &CollectionName {
        &self.collection
    }

    /// Pool settings pointing at the configured database.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Config`] when the endpoint is not a valid URL.
    pub fn pool_config(&self) -> Result<PoolConfig, PoolError> {
        PoolConfig::for_store(&self.connection_string, &self.database_id)
    }
}

impl fmt::Debug for IdentityStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityStoreConfig")
            .field("connection_string", &"[REDACTED]")
            .field("database_id", &self.database_id)
            .field("collection", &self.collection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users")]
    #[case("_identity_records")]
    #[case("Users2")]
    fn accepts_plain_identifiers(#[case] name: &str) {
        let collection = CollectionName::new(name).expect("valid collection");
        assert_eq!(collection.as_str(), name);
    }

    #[rstest]
    #[case("", CollectionNameError::Empty)]
    #[case("2users", CollectionNameError::InvalidCharacters)]
    #[case("users\"; --", CollectionNameError::InvalidCharacters)]
    #[case("public.users", CollectionNameError::InvalidCharacters)]
    fn rejects_unsafe_identifiers(#[case] name: &str, #[case] expected: CollectionNameError) {
        assert_eq!(CollectionName::new(name), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_identifiers() {
        let name = "u".repeat(COLLECTION_NAME_MAX + 1);
        assert_eq!(
            CollectionName::new(name),
            Err(CollectionNameError::TooLong {
                max: COLLECTION_NAME_MAX
            })
        );
    }

    #[rstest]
    fn pool_config_uses_database_id() {
        let config = IdentityStoreConfig::new(
            "postgres://app:pw@db/postgres",
            "identity",
            CollectionName::new("users").expect("valid collection"),
        );

        let pool = config.pool_config().expect("valid endpoint");
        assert_eq!(pool.database_url(), "postgres://app:pw@db/identity");
        assert!(!format!("{config:?}").contains("pw@db"));
    }
}
