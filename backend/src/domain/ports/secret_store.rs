//! Driven port resolving transient queue credentials from a secret store.

use async_trait::async_trait;

use crate::domain::{QueueSendCredentials, SecretBundle};

use super::define_port_error;

define_port_error! {
    /// Errors raised by secret store adapters.
    pub enum SecretStoreError {
        /// The store rejected the client credentials or could not be reached.
        Unavailable { message: String } => "secret store is unavailable: {message}",
        /// The named secret does not exist.
        NotFound { name: String } => "secret '{name}' was not found",
        /// The secret exists but does not hold usable queue credentials.
        InvalidSecret { name: String, message: String } =>
            "secret '{name}' is invalid: {message}",
    }
}

/// Source of queue send credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Authenticate with the bundle's client credentials and fetch the queue
    /// credentials it names. Results are not cached between calls.
    async fn resolve_send_credentials(
        &self,
        bundle: &SecretBundle,
    ) -> Result<QueueSendCredentials, SecretStoreError>;
}
