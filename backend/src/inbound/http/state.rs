//! Shared HTTP adapter state.
//!
//! Handlers take this via `web::Data` and depend only on the driving port, so
//! they can be tested without a store, queue, or secret store.

use std::sync::Arc;

use crate::domain::ports::UserRegistration;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistration>,
}

impl HttpState {
    pub fn new(registration: Arc<dyn UserRegistration>) -> Self {
        Self { registration }
    }
}
