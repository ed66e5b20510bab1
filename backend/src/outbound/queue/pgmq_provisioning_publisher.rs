//! pgmq-backed `ProvisioningPublisher`.
//!
//! Send credentials are resolved per publish, so a dedicated connection is
//! opened for each message instead of pooling. The connection is closed on
//! every path once the send has been attempted.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::domain::ports::{ProvisioningPublisher, PublishError, SecretStore};
use crate::domain::{ProvisioningMessage, QueueName, SecretBundle};

const SEND_SQL: &str = "SELECT pgmq.send($1, $2)";

/// Publisher writing provisioning messages to a pgmq queue.
#[derive(Clone)]
pub struct PgmqProvisioningPublisher {
    secrets: Arc<dyn SecretStore>,
    connect_timeout: Duration,
}

impl PgmqProvisioningPublisher {
    /// Resolve send credentials through `secrets`. Connecting gives up after
    /// `connect_timeout`.
    pub fn new(secrets: Arc<dyn SecretStore>, connect_timeout: Duration) -> Self {
        Self {
            secrets,
            connect_timeout,
        }
    }

    async fn connect(&self, connection_string: &str) -> Result<PgConnection, PublishError> {
        let options = PgConnectOptions::from_str(connection_string).map_err(|err| {
            PublishError::unavailable(format!("invalid queue connection string: {err}"))
        })?;
        tokio::time::timeout(self.connect_timeout, PgConnection::connect_with(&options))
            .await
            .map_err(|_| PublishError::unavailable("timed out connecting to the queue"))?
            .map_err(map_sqlx_error)
    }
}

fn map_sqlx_error(error: sqlx::Error) -> PublishError {
    match error {
        sqlx::Error::Database(db) => PublishError::rejected(db.message()),
        other => PublishError::unavailable(other.to_string()),
    }
}

#[async_trait]
impl ProvisioningPublisher for PgmqProvisioningPublisher {
    async fn publish(
        &self,
        message: &ProvisioningMessage,
        queue_name: &QueueName,
        credentials: &SecretBundle,
    ) -> Result<(), PublishError> {
        let send_credentials = self
            .secrets
            .resolve_send_credentials(credentials)
            .await
            .map_err(|err| PublishError::credentials_unavailable(err.to_string()))?;
        let payload = serde_json::to_value(message)
            .map_err(|err| PublishError::serialization(err.to_string()))?;

        let mut conn = self.connect(send_credentials.connection_string()).await?;
        let sent = sqlx::query_scalar::<_, i64>(SEND_SQL)
            .bind(queue_name.as_ref())
            .bind(&payload)
            .fetch_one(&mut conn)
            .await;
        if let Err(err) = conn.close().await {
            warn!(error = %err, "failed to close queue connection");
        }

        let message_id = sent.map_err(map_sqlx_error)?;
        debug!(queue = %queue_name, message_id, "provisioning message sent");
        Ok(())
    }
}
