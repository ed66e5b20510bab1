//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (implemented by outbound adapters): [`IdentityLookup`],
//! [`ProvisioningPublisher`], [`SecretStore`]. Driving port (called by inbound
//! adapters): [`UserRegistration`].

mod macros;
pub(crate) use macros::define_port_error;

mod identity_lookup;
mod provisioning_publisher;
mod secret_store;
mod user_registration;

#[cfg(test)]
pub use identity_lookup::MockIdentityLookup;
pub use identity_lookup::{IdentityLookup, IdentityLookupError};
#[cfg(test)]
pub use provisioning_publisher::MockProvisioningPublisher;
pub use provisioning_publisher::{ProvisioningPublisher, PublishError};
#[cfg(test)]
pub use secret_store::MockSecretStore;
pub use secret_store::{SecretStore, SecretStoreError};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::{FixtureUserRegistration, UserRegistration};
