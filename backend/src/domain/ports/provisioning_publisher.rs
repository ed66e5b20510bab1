//! Driven port publishing provisioning messages to a named queue.
//!
//! One call performs at most one send. Retry policy, if any, belongs to the
//! queue transport, so adapters must not retry internally.

use async_trait::async_trait;

use crate::domain::{ProvisioningMessage, QueueName, SecretBundle};

use super::define_port_error;

define_port_error! {
    /// Errors raised by provisioning publisher adapters.
    pub enum PublishError {
        /// Send credentials could not be resolved from the secret store.
        CredentialsUnavailable { message: String } =>
            "queue credentials are unavailable: {message}",
        /// The queue transport could not be reached.
        Unavailable { message: String } => "provisioning queue is unavailable: {message}",
        /// The queue refused the message.
        Rejected { message: String } => "provisioning message was rejected: {message}",
        /// The message could not be encoded for the wire.
        Serialization { message: String } =>
            "provisioning message could not be encoded: {message}",
    }
}

/// Publisher for provisioning messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProvisioningPublisher: Send + Sync {
    /// Resolve send credentials from `credentials`, then send `message` to
    /// `queue_name` exactly once.
    async fn publish(
        &self,
        message: &ProvisioningMessage,
        queue_name: &QueueName,
        credentials: &SecretBundle,
    ) -> Result<(), PublishError>;
}
