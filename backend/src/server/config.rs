//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
use identity_registration::domain::ports::UserRegistration;
use identity_registration::inbound::http::auth::TokenVerifier;

/// Everything the HTTP server needs once the adapters are built.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) registration: Arc<dyn UserRegistration>,
    pub(crate) verifier: web::Data<TokenVerifier>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        registration: Arc<dyn UserRegistration>,
        verifier: TokenVerifier,
    ) -> Self {
        Self {
            bind_addr,
            registration,
            verifier: web::Data::new(verifier),
        }
    }
}
