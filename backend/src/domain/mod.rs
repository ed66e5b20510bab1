//! Domain primitives, ports, and the registration workflow.
//!
//! Purpose: keep registration semantics (validation, idempotency check, result
//! classification) independent of HTTP, PostgreSQL, and the secret store.
//! Inbound adapters call the [`ports::UserRegistration`] driving port; outbound
//! adapters implement the driven ports in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload for adapters.
//! - RegistrationRequest / RegistrationOutcome / RegistrationResultCode —
//!   the registration vocabulary.
//! - UserRegistrationService — the workflow implementation.

pub mod error;
pub mod ports;
pub mod registration;
pub mod secrets;
pub mod trace_id;
pub mod user_registration_service;

pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::registration::{
    ExistingUserRecord, ProvisioningMessage, QueueName, QueueNameValidationError,
    RegistrationOutcome, RegistrationRequest, RegistrationResultCode, RegistrationValidationError,
};
pub use self::secrets::{QueueSendCredentials, SecretBundle};
pub use self::trace_id::TraceId;
pub use self::user_registration_service::{
    ProvisioningTarget, RegistrationError, UserRegistrationService,
};
