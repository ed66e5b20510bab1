//! Vault KV v2 adapter for the `SecretStore` port.
//!
//! Each resolution logs in with AppRole using the bundle's client credentials,
//! then reads the secret named by the bundle's certificate name. Tokens are
//! not cached; every publish gets fresh credentials.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{SecretStore, SecretStoreError};
use crate::domain::{QueueSendCredentials, SecretBundle};

/// KV v2 mount used when none is configured.
pub const DEFAULT_KV_MOUNT: &str = "secret";

const CONNECTION_STRING_FIELD: &str = "connection_string";

#[derive(Deserialize)]
struct LoginResponse {
    auth: LoginAuth,
}

#[derive(Deserialize)]
struct LoginAuth {
    client_token: String,
}

#[derive(Deserialize)]
struct KvResponse {
    data: KvData,
}

#[derive(Deserialize)]
struct KvData {
    data: serde_json::Map<String, serde_json::Value>,
}

/// HTTP client for a Vault-compatible secret store.
#[derive(Debug, Clone)]
pub struct VaultSecretStore {
    client: reqwest::Client,
    mount: String,
}

impl VaultSecretStore {
    /// Build a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretStoreError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(timeout: Duration) -> Result<Self, SecretStoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                SecretStoreError::unavailable(format!("failed to create HTTP client: {err}"))
            })?;
        Ok(Self {
            client,
            mount: DEFAULT_KV_MOUNT.to_owned(),
        })
    }

    /// Read secrets from `mount` instead of [`DEFAULT_KV_MOUNT`].
    pub fn with_mount(mut self, mount: impl Into<String>) -> Self {
        self.mount = mount.into().trim_matches('/').to_owned();
        self
    }

    async fn login(
        &self,
        address: &str,
        bundle: &SecretBundle,
    ) -> Result<Zeroizing<String>, SecretStoreError> {
        let body = serde_json::json!({
            "role_id": bundle.client_id(),
            "secret_id": bundle.client_secret(),
        });
        let response = self
            .client
            .post(format!("{address}/v1/auth/approle/login"))
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                SecretStoreError::unavailable(format!("failed to reach {address}: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SecretStoreError::unavailable(format!(
                "AppRole login failed with HTTP {status}"
            )));
        }

        let login: LoginResponse = response.json().await.map_err(|err| {
            SecretStoreError::unavailable(format!("invalid AppRole login response: {err}"))
        })?;
        Ok(Zeroizing::new(login.auth.client_token))
    }

    async fn read_connection_string(
        &self,
        address: &str,
        token: &str,
        name: &str,
    ) -> Result<QueueSendCredentials, SecretStoreError> {
        let response = self
            .client
            .get(format!("{address}/v1/{}/data/{name}", self.mount))
            .header("X-Vault-Token", token)
            .send()
            .await
            .map_err(|err| {
                SecretStoreError::unavailable(format!("failed to fetch secret '{name}': {err}"))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SecretStoreError::not_found(name));
        }
        if !status.is_success() {
            return Err(SecretStoreError::unavailable(format!(
                "secret read for '{name}' failed with HTTP {status}"
            )));
        }

        let secret: KvResponse = response.json().await.map_err(|err| {
            SecretStoreError::invalid_secret(name, format!("invalid KV v2 response: {err}"))
        })?;
        let connection_string = secret
            .data
            .data
            .get(CONNECTION_STRING_FIELD)
            .and_then(serde_json::Value::as_str)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                SecretStoreError::invalid_secret(
                    name,
                    format!("missing '{CONNECTION_STRING_FIELD}' field"),
                )
            })?;
        Ok(QueueSendCredentials::new(connection_string))
    }
}

#[async_trait]
impl SecretStore for VaultSecretStore {
    async fn resolve_send_credentials(
        &self,
        bundle: &SecretBundle,
    ) -> Result<QueueSendCredentials, SecretStoreError> {
        let address = bundle.vault_identifier().trim_end_matches('/');
        let token = self.login(address, bundle).await?;
        let credentials = self
            .read_connection_string(address, &token, bundle.certificate_name())
            .await?;
        debug!(
            secret = bundle.certificate_name(),
            "queue send credentials resolved"
        );
        Ok(credentials)
    }
}
