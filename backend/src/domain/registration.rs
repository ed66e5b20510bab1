//! Registration vocabulary shared by the workflow and its adapters.
//!
//! A [`RegistrationRequest`] is built once per call from the authenticated
//! principal and never mutated. The workflow answers with exactly one
//! [`RegistrationOutcome`], whose [`RegistrationResultCode`] maps to a fixed
//! caller-facing description.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Validation failures that carry a caller-visible result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// The principal carried no display name.
    EmptyFullName,
}

impl RegistrationValidationError {
    /// Result code reported to the caller for this failure.
    #[must_use]
    pub fn result_code(self) -> RegistrationResultCode {
        match self {
            Self::EmptyFullName => RegistrationResultCode::FailedEmptyFullname,
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFullName => write!(f, "full name must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Registration request derived from the authenticated principal.
///
/// `email` is the unique identity key. Values are kept verbatim: only an
/// empty string counts as missing.
///
/// # Examples
/// ```
/// use identity_registration::domain::{RegistrationRequest, RegistrationValidationError};
///
/// let request = RegistrationRequest::new("a@x.com", "");
/// assert_eq!(request.validate(), Err(RegistrationValidationError::EmptyFullName));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    email: String,
    full_name: String,
}

impl RegistrationRequest {
    /// Build a request from the principal's identity key and display name.
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
        }
    }

    /// Unique identity key.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Display name used for provisioning.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Check the fields that map to a dedicated result code.
    pub fn validate(&self) -> Result<(), RegistrationValidationError> {
        if self.full_name.is_empty() {
            return Err(RegistrationValidationError::EmptyFullName);
        }
        Ok(())
    }
}

/// Record proving a user already exists for an email.
///
/// The workflow only inspects presence; the fields exist for diagnostics. The
/// id is kept as the store renders it, whatever its native key type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingUserRecord {
    id: String,
    email: String,
}

impl ExistingUserRecord {
    /// Wrap a stored identity row.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }

    /// Store-assigned identifier.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Email the record was stored under.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

/// Payload handed to the provisioning queue.
///
/// The wire shape (`fullname`, `email`) is the contract with the downstream
/// provisioning consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisioningMessage {
    #[serde(rename = "fullname")]
    full_name: String,
    email: String,
}

impl ProvisioningMessage {
    /// Display name to provision.
    pub fn full_name(&self) -> &str {
        self.full_name.as_str()
    }

    /// Identity key to provision.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }
}

impl From<&RegistrationRequest> for ProvisioningMessage {
    fn from(request: &RegistrationRequest) -> Self {
        Self {
            full_name: request.full_name.clone(),
            email: request.email.clone(),
        }
    }
}

/// Caller-visible classification of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationResultCode {
    /// A provisioning message was queued.
    Success,
    /// The identity already exists; nothing was queued.
    SuccessAlreadyExists,
    /// The principal carries no full name.
    FailedEmptyFullname,
    /// Any other failure. Details stay in the service logs.
    Failed,
}

impl RegistrationResultCode {
    /// Whether this code represents a successful registration call.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::SuccessAlreadyExists)
    }

    /// Fixed human-readable description returned to the caller.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "User registration has been accepted and is being processed.",
            Self::SuccessAlreadyExists => "User is already registered.",
            Self::FailedEmptyFullname => "User registration failed: full name is required.",
            Self::Failed => "User registration failed.",
        }
    }
}

impl fmt::Display for RegistrationResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// The single return value of the registration workflow.
///
/// ## Invariants
/// - `succeeded` is derived from `result_code`, so a failure code can never
///   report success.
///
/// # Examples
/// ```
/// use identity_registration::domain::{RegistrationOutcome, RegistrationResultCode};
///
/// let outcome = RegistrationOutcome::from_code(RegistrationResultCode::SuccessAlreadyExists);
/// assert!(outcome.succeeded());
/// assert_eq!(outcome.description(), "User is already registered.");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationOutcome {
    succeeded: bool,
    result_code: RegistrationResultCode,
}

impl RegistrationOutcome {
    /// Build the outcome for a final result code.
    #[must_use]
    pub fn from_code(result_code: RegistrationResultCode) -> Self {
        Self {
            succeeded: result_code.is_success(),
            result_code,
        }
    }

    /// Whether the caller should receive a success-class response.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    /// Final result code.
    #[must_use]
    pub fn result_code(&self) -> RegistrationResultCode {
        self.result_code
    }

    /// Caller-facing description of the result code.
    #[must_use]
    pub fn description(&self) -> &'static str {
        self.result_code.description()
    }
}

/// Maximum queue name length accepted by pgmq.
pub const QUEUE_NAME_MAX: usize = 47;

/// Validation errors for [`QueueName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueNameValidationError {
    /// The name is empty.
    Empty,
    /// The name exceeds [`QUEUE_NAME_MAX`] characters.
    TooLong { max: usize },
    /// The name contains characters other than ASCII letters, digits, or `_`.
    InvalidCharacters,
}

impl fmt::Display for QueueNameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "queue name must not be empty"),
            Self::TooLong { max } => write!(f, "queue name must be at most {max} characters"),
            Self::InvalidCharacters => write!(
                f,
                "queue name may only contain ASCII letters, digits, or underscores",
            ),
        }
    }
}

impl std::error::Error for QueueNameValidationError {}

/// Name of the queue provisioning messages are published to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueName(String);

impl QueueName {
    /// Validate and construct a queue name.
    pub fn new(name: impl Into<String>) -> Result<Self, QueueNameValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(QueueNameValidationError::Empty);
        }
        if name.len() > QUEUE_NAME_MAX {
            return Err(QueueNameValidationError::TooLong {
                max: QUEUE_NAME_MAX,
            });
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(QueueNameValidationError::InvalidCharacters);
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for QueueName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for QueueName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests;
