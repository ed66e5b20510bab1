//! Bounded connection pool for the identity store.
//!
//! Wraps `diesel-async` with `bb8`. A connection is checked out for a single
//! lookup and returned when the guard drops, on success and error alike.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use url::Url;

/// Errors raised while configuring or using the pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The store address could not be turned into a connection URL.
    #[error("invalid identity store address: {message}")]
    Config { message: String },

    /// No connection became available within the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be built.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },
}

impl PoolError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Pool sizing and the resolved database URL.
///
/// # Example
///
/// ```ignore
/// let config = PoolConfig::for_store("postgres://app@db:5432/postgres", "identity")?
///     .with_max_size(8)
///     .with_connection_timeout(Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Use `database_url` as given.
    ///
    /// Defaults: at most 10 connections, none kept idle, 5 second checkout
    /// timeout. Idle connections are not pre-opened so a cold store does not
    /// block startup.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
        }
    }

    /// Build a config from the store endpoint and database id.
    ///
    /// A non-empty `database_id` replaces whatever database the endpoint URL
    /// names.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Config`] when the endpoint is not a valid URL.
    pub fn for_store(connection_string: &str, database_id: &str) -> Result<Self, PoolError> {
        let mut url = Url::parse(connection_string).map_err(|err| PoolError::config(err.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(PoolError::config("connection string must be a URL with a host"));
        }
        if !database_id.is_empty() {
            url.set_path(&format!("/{database_id}"));
        }
        Ok(Self::new(url.to_string()))
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Resolved database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

impl std::fmt::Debug for PoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("database_url", &"[REDACTED]")
            .field("max_size", &self.max_size)
            .field("connection_timeout", &self.connection_timeout)
            .finish()
    }
}

/// Async PostgreSQL pool shared by the lookup adapter.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily on first checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the pool cannot be constructed.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the store is unreachable or the
    /// pool stays exhausted past the timeout.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
