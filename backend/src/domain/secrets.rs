//! Secret material used to reach the provisioning queue.
//!
//! [`SecretBundle`] is configuration: it names where and how to fetch the
//! queue credentials. [`QueueSendCredentials`] is what the secret store hands
//! back for a single publish. Both zeroise secret values on drop and redact
//! them from `Debug` output.

use std::fmt;

use zeroize::Zeroizing;

/// Secret-store coordinates and client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretBundle {
    certificate_name: String,
    client_id: String,
    client_secret: Zeroizing<String>,
    vault_identifier: String,
}

impl SecretBundle {
    /// Assemble a bundle from configuration values.
    pub fn new(
        certificate_name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        vault_identifier: impl Into<String>,
    ) -> Self {
        Self {
            certificate_name: certificate_name.into(),
            client_id: client_id.into(),
            client_secret: Zeroizing::new(client_secret.into()),
            vault_identifier: vault_identifier.into(),
        }
    }

    /// Name of the secret entry holding the queue send credentials.
    pub fn certificate_name(&self) -> &str {
        self.certificate_name.as_str()
    }

    /// Client identifier used to authenticate to the secret store.
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Client secret used to authenticate to the secret store.
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }

    /// Base address of the secret store.
    pub fn vault_identifier(&self) -> &str {
        self.vault_identifier.as_str()
    }
}

impl fmt::Debug for SecretBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBundle")
            .field("certificate_name", &self.certificate_name)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("vault_identifier", &self.vault_identifier)
            .finish()
    }
}

/// Transient credentials for one send to the provisioning queue.
#[derive(Clone, PartialEq, Eq)]
pub struct QueueSendCredentials {
    connection_string: Zeroizing<String>,
}

impl QueueSendCredentials {
    /// Wrap a resolved queue connection string.
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: Zeroizing::new(connection_string.into()),
        }
    }

    /// Connection string for the queue transport.
    pub fn connection_string(&self) -> &str {
        self.connection_string.as_str()
    }
}

impl fmt::Debug for QueueSendCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueSendCredentials")
            .field("connection_string", &"[REDACTED]")
            .finish()
    }
}
