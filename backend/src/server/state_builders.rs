//! Builders wiring outbound adapters into the registration workflow.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use identity_registration::domain::UserRegistrationService;
use identity_registration::domain::ports::{SecretStore, UserRegistration};
use identity_registration::outbound::persistence::{DbPool, DieselIdentityLookup};
use identity_registration::outbound::queue::PgmqProvisioningPublisher;
use identity_registration::outbound::secrets::VaultSecretStore;
use identity_registration::settings::RuntimeSettings;

/// Build the identity store pool. Connections open lazily, so an unreachable
/// store surfaces on the first registration rather than at startup.
pub async fn build_identity_pool(settings: &RuntimeSettings) -> Result<DbPool> {
    let config = settings
        .store
        .pool_config()
        .wrap_err("identity store address")?
        .with_max_size(settings.store_pool_max_size)
        .with_connection_timeout(settings.store_timeout);
    let pool = DbPool::new(config)
        .await
        .wrap_err("failed to build identity store pool")?;
    info!(
        database = settings.store.database_id(),
        collection = %settings.store.collection(),
        "identity store pool ready"
    );
    Ok(pool)
}

/// Assemble the registration workflow over the real adapters.
pub fn build_registration(
    settings: &RuntimeSettings,
    pool: DbPool,
) -> Result<Arc<dyn UserRegistration>> {
    let lookup = DieselIdentityLookup::new(pool, settings.store.collection());
    let secrets: Arc<dyn SecretStore> = Arc::new(
        VaultSecretStore::new(settings.vault_timeout)
            .wrap_err("failed to build secret store client")?
            .with_mount(settings.vault_kv_mount.as_str()),
    );
    let publisher = PgmqProvisioningPublisher::new(secrets, settings.queue_connect_timeout);
    info!(queue = %settings.target.queue_name(), "provisioning publisher ready");

    Ok(Arc::new(UserRegistrationService::new(
        Arc::new(lookup),
        Arc::new(publisher),
        settings.target.clone(),
    )))
}
