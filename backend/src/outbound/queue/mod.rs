//! Provisioning queue adapters.

mod pgmq_provisioning_publisher;

pub use pgmq_provisioning_publisher::PgmqProvisioningPublisher;
