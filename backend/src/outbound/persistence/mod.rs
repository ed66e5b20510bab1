//! PostgreSQL adapters for the identity store.
//!
//! Connections come from a `bb8` pool over `diesel-async` and are held for a
//! single query.
//!
//! # Example
//!
//! ```ignore
//! use identity_registration::outbound::persistence::{DbPool, DieselIdentityLookup};
//!
//! let pool = DbPool::new(store.pool_config()?).await?;
//! let lookup = DieselIdentityLookup::new(pool, store.collection());
//! ```

mod diesel_identity_lookup;
mod pool;
mod store_config;

pub use diesel_identity_lookup::DieselIdentityLookup;
pub use pool::{DbPool, PoolConfig, PoolError};
pub use store_config::{
    COLLECTION_NAME_MAX, CollectionName, CollectionNameError, IdentityStoreConfig,
};
