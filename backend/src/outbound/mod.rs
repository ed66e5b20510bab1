//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: identity lookup over PostgreSQL with Diesel
//! - **queue**: provisioning publisher over pgmq with sqlx
//! - **secrets**: Vault-compatible secret store over HTTP
//!
//! Adapters translate between domain types and infrastructure
//! representations. They hold no business logic.

pub mod persistence;
pub mod queue;
pub mod secrets;
