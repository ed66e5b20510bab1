//! Identity registration service.
//!
//! Hexagonal layout: [`domain`] holds the registration workflow and its ports,
//! [`inbound`] the HTTP adapter, [`outbound`] the store, queue, and secret
//! store adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
