//! Secret store adapters.

mod vault_secret_store;

pub use vault_secret_store::{DEFAULT_KV_MOUNT, VaultSecretStore};
