//! PostgreSQL-backed `IdentityLookup` using Diesel.
//!
//! The collection is configurable, so the query is raw SQL with the table name
//! quoted in and the email bound as a parameter. The `id` column is cast to
//! text so any key type (serial, uuid, text) satisfies the lookup.

use async_trait::async_trait;
use diesel::OptionalExtension;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ExistingUserRecord;
use crate::domain::ports::{IdentityLookup, IdentityLookupError};

use super::pool::{DbPool, PoolError};
use super::store_config::CollectionName;

#[derive(Debug, diesel::QueryableByName)]
struct IdentityRow {
    #[diesel(sql_type = Text)]
    id: String,
    #[diesel(sql_type = Text)]
    email: String,
}

impl From<IdentityRow> for ExistingUserRecord {
    fn from(row: IdentityRow) -> Self {
        ExistingUserRecord::new(row.id, row.email)
    }
}

/// Diesel-backed implementation of the `IdentityLookup` port.
///
/// Emails are compared exactly; no case folding happens here.
#[derive(Clone)]
pub struct DieselIdentityLookup {
    pool: DbPool,
    query: String,
}

impl DieselIdentityLookup {
    /// Look identities up in `collection` through `pool`.
    pub fn new(pool: DbPool, collection: &CollectionName) -> Self {
        Self {
            pool,
            query: lookup_sql(collection),
        }
    }
}

fn lookup_sql(collection: &CollectionName) -> String {
    format!("SELECT id::text AS id, email FROM \"{collection}\" WHERE email = $1 LIMIT 1")
}

fn map_pool_error(error: PoolError) -> IdentityLookupError {
    match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::Config { message } => IdentityLookupError::unavailable(message),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityLookupError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "identity lookup failed");
        }
        other => debug!(error = %other, "identity lookup failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            IdentityLookupError::unavailable("database connection closed")
        }
        DieselError::DatabaseError(_, info) => IdentityLookupError::query(info.message()),
        DieselError::DeserializationError(err) => {
            IdentityLookupError::query(format!("unexpected identity row shape: {err}"))
        }
        other => IdentityLookupError::query(other.to_string()),
    }
}

#[async_trait]
impl IdentityLookup for DieselIdentityLookup {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ExistingUserRecord>, IdentityLookupError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::sql_query(self.query.as_str())
            .bind::<Text, _>(email)
            .get_result::<IdentityRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(ExistingUserRecord::from))
    }
}

#[cfg(test)]
mod tests {
    //! Mapping and query-shape tests; store round trips live in
    //! `tests/diesel_identity_lookup.rs`.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn lookup_sql_quotes_the_collection() {
        let collection = CollectionName::new("users").expect("valid collection");
        assert_eq!(
            lookup_sql(&collection),
            "SELECT id::text AS id, email FROM \"users\" WHERE email = $1 LIMIT 1"
        );
    }

    #[rstest]
    #[case(PoolError::checkout("timed out waiting for connection"))]
    #[case(PoolError::build("bad url"))]
    #[case(PoolError::config("relative URL without a base"))]
    fn pool_errors_mean_store_unavailable(#[case] error: PoolError) {
        assert!(matches!(
            map_pool_error(error),
            IdentityLookupError::Unavailable { .. }
        ));
    }

    #[rstest]
    fn closed_connection_means_store_unavailable() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );
        assert!(matches!(
            map_diesel_error(error),
            IdentityLookupError::Unavailable { .. }
        ));
    }

    #[rstest]
    fn database_errors_keep_the_server_message() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("relation \"users\" does not exist".to_owned()),
        );
        assert_eq!(
            map_diesel_error(error),
            IdentityLookupError::query("relation \"users\" does not exist")
        );
    }

    #[rstest]
    fn rows_become_existing_records() {
        let record = ExistingUserRecord::from(IdentityRow {
            id: "7".to_owned(),
            email: "a@x.com".to_owned(),
        });
        assert_eq!(record.id(), "7");
        assert_eq!(record.email(), "a@x.com");
    }
}
