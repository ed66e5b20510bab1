//! Driving port for the registration use-case.
//!
//! Inbound adapters hand over a [`RegistrationRequest`] and receive exactly
//! one [`RegistrationOutcome`]. Infrastructure failures are already folded into
//! the outcome, so the port itself is infallible.

use async_trait::async_trait;

use crate::domain::{RegistrationOutcome, RegistrationRequest};

/// Domain use-case port for user registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Register the identity described by `request`.
    async fn register(&self, request: RegistrationRequest) -> RegistrationOutcome;
}

/// Fixture registration port answering with a fixed result code.
///
/// Lets HTTP adapter tests run without a store or queue.
#[derive(Debug, Clone, Copy)]
pub struct FixtureUserRegistration(pub crate::domain::RegistrationResultCode);

#[async_trait]
impl UserRegistration for FixtureUserRegistration {
    async fn register(&self, _request: RegistrationRequest) -> RegistrationOutcome {
        RegistrationOutcome::from_code(self.0)
    }
}
