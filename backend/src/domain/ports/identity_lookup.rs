//! Driven port for the idempotency check against the user store.
//!
//! Adapters acquire a store connection per call and release it on every exit
//! path. An unreachable store is an error, never an empty result.

use async_trait::async_trait;

use crate::domain::ExistingUserRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity lookup adapters.
    pub enum IdentityLookupError {
        /// The store could not be reached or no connection was available.
        Unavailable { message: String } => "identity store is unavailable: {message}",
        /// The lookup query failed during execution.
        Query { message: String } => "identity lookup query failed: {message}",
    }
}

/// Keyed lookup over existing identity records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// Return the record stored for `email`, or `None` when no user exists.
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ExistingUserRecord>, IdentityLookupError>;
}
