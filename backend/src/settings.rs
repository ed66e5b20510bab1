//! Service configuration loaded via OrthoConfig.
//!
//! [`AppSettings`] mirrors what the loader can see (CLI flags, `IDENTITY_*`
//! environment variables, config files); every field is optional there.
//! [`AppSettings::into_runtime`] validates the lot once at startup and hands
//! back typed values, so nothing downstream re-checks configuration.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::{ProvisioningTarget, QueueName, SecretBundle};
use crate::inbound::http::auth::{TokenKey, TokenValidationConfig};
use crate::outbound::persistence::{CollectionName, IdentityStoreConfig};
use crate::outbound::secrets::DEFAULT_KV_MOUNT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SECRET_STORE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_QUEUE_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Raised when configuration is missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting `{field}`")]
    Missing { field: &'static str },
    #[error("invalid setting `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
    #[error("failed to read token key file {path}: {source}")]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn require(value: Option<String>, field: &'static str) -> Result<String, SettingsError> {
    value
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::Missing { field })
}

fn invalid(field: &'static str, error: impl fmt::Display) -> SettingsError {
    SettingsError::Invalid {
        field,
        message: error.to_string(),
    }
}

/// Raw configuration as read by the loader.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "IDENTITY")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL of the identity store.
    pub store_connection_string: Option<String>,
    /// Database holding identity records; overrides the URL's database.
    pub store_database_id: Option<String>,
    /// Table holding identity records.
    pub store_collection: Option<String>,
    /// Upper bound on pooled store connections.
    pub store_pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled store connection.
    pub store_timeout_secs: Option<u64>,
    /// pgmq queue receiving provisioning messages.
    pub queue_name: Option<String>,
    /// Seconds to wait when connecting to the queue.
    pub queue_connect_timeout_secs: Option<u64>,
    /// Base URL of the secret store.
    pub vault_identifier: Option<String>,
    /// AppRole role id.
    pub vault_client_id: Option<String>,
    /// AppRole secret id.
    pub vault_client_secret: Option<String>,
    /// Secret holding the queue connection string.
    pub vault_certificate_name: Option<String>,
    /// KV v2 mount of that secret.
    pub vault_kv_mount: Option<String>,
    /// Seconds before a secret store request gives up.
    pub vault_timeout_secs: Option<u64>,
    /// Shared HS256 secret for bearer tokens.
    pub jwt_hs256_secret: Option<String>,
    /// Path to a PEM RSA public key for RS256 bearer tokens.
    pub jwt_rs256_public_key_path: Option<PathBuf>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    /// Role the `roles` claim must contain.
    pub jwt_required_role: Option<String>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("store_database_id", &self.store_database_id)
            .field("store_collection", &self.store_collection)
            .field("queue_name", &self.queue_name)
            .field("vault_identifier", &self.vault_identifier)
            .field("vault_client_id", &self.vault_client_id)
            .field("vault_certificate_name", &self.vault_certificate_name)
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("jwt_required_role", &self.jwt_required_role)
            .finish_non_exhaustive()
    }
}

/// Validated configuration used to wire the service.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub bind_addr: SocketAddr,
    pub store: IdentityStoreConfig,
    pub store_pool_max_size: u32,
    pub store_timeout: Duration,
    pub target: ProvisioningTarget,
    pub queue_connect_timeout: Duration,
    pub vault_kv_mount: String,
    pub vault_timeout: Duration,
    pub token: TokenValidationConfig,
}

impl AppSettings {
    /// Validate the raw settings.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] naming the first missing or malformed field.
    pub fn into_runtime(self) -> Result<RuntimeSettings, SettingsError> {
        let bind_addr = self
            .bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|err| invalid("bind_addr", err))?;

        let collection = CollectionName::new(require(self.store_collection, "store_collection")?)
            .map_err(|err| invalid("store_collection", err))?;
        let store = IdentityStoreConfig::new(
            require(self.store_connection_string, "store_connection_string")?,
            self.store_database_id.unwrap_or_default(),
            collection,
        );
        store
            .pool_config()
            .map_err(|err| invalid("store_connection_string", err))?;

        let queue_name = QueueName::new(require(self.queue_name, "queue_name")?)
            .map_err(|err| invalid("queue_name", err))?;
        let credentials = SecretBundle::new(
            require(self.vault_certificate_name, "vault_certificate_name")?,
            require(self.vault_client_id, "vault_client_id")?,
            require(self.vault_client_secret, "vault_client_secret")?,
            require(self.vault_identifier, "vault_identifier")?,
        );

        let token = token_config(
            self.jwt_hs256_secret,
            self.jwt_rs256_public_key_path,
            self.jwt_issuer,
            self.jwt_audience,
            self.jwt_required_role,
        )?;

        Ok(RuntimeSettings {
            bind_addr,
            store,
            store_pool_max_size: self.store_pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE),
            store_timeout: Duration::from_secs(
                self.store_timeout_secs.unwrap_or(DEFAULT_STORE_TIMEOUT_SECS),
            ),
            target: ProvisioningTarget::new(queue_name, credentials),
            queue_connect_timeout: Duration::from_secs(
                self.queue_connect_timeout_secs
                    .unwrap_or(DEFAULT_QUEUE_CONNECT_TIMEOUT_SECS),
            ),
            vault_kv_mount: self
                .vault_kv_mount
                .unwrap_or_else(|| DEFAULT_KV_MOUNT.to_owned()),
            vault_timeout: Duration::from_secs(
                self.vault_timeout_secs
                    .unwrap_or(DEFAULT_SECRET_STORE_TIMEOUT_SECS),
            ),
            token,
        })
    }
}

fn token_config(
    hs256_secret: Option<String>,
    rs256_key_path: Option<PathBuf>,
    issuer: Option<String>,
    audience: Option<String>,
    required_role: Option<String>,
) -> Result<TokenValidationConfig, SettingsError> {
    let hs256_secret = hs256_secret.filter(|secret| !secret.is_empty());
    let key = match (hs256_secret, rs256_key_path) {
        (Some(_), Some(_)) => {
            return Err(invalid(
                "jwt_hs256_secret",
                "configure either an HS256 secret or an RS256 key, not both",
            ));
        }
        (Some(secret), None) => TokenKey::Hs256(Zeroizing::new(secret.into_bytes())),
        (None, Some(path)) => {
            let pem = std::fs::read(&path).map_err(|source| SettingsError::KeyFile {
                path: path.clone(),
                source,
            })?;
            TokenKey::Rs256Pem(pem)
        }
        (None, None) => return Err(SettingsError::Missing { field: "jwt_hs256_secret" }),
    };

    let mut config = TokenValidationConfig::new(key);
    if let Some(issuer) = issuer.filter(|value| !value.is_empty()) {
        config = config.with_issuer(issuer);
    }
    if let Some(audience) = audience.filter(|value| !value.is_empty()) {
        config = config.with_audience(audience);
    }
    if let Some(role) = required_role.filter(|value| !value.is_empty()) {
        config = config.with_required_role(role);
    }
    Ok(config)
}
