//! Registration workflow.
//!
//! Validates the request, checks the user store for an existing identity and,
//! only when none exists, publishes one provisioning message. Every path ends
//! in a single [`RegistrationOutcome`]:
//!
//! ```text
//! Validating -> Invalid
//!            -> LookingUp -> Exists
//!                         -> Publishing -> Success
//!                                       -> Failed
//! ```
//!
//! The lookup is the only gate for publishing; there is no in-process
//! coordination between concurrent calls. Two calls for the same new email can
//! both observe "not found" and both publish; deduplication is left to the
//! store and the downstream consumer.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{
    IdentityLookup, IdentityLookupError, ProvisioningPublisher, PublishError, UserRegistration,
};
use crate::domain::{
    ProvisioningMessage, QueueName, RegistrationOutcome, RegistrationRequest,
    RegistrationResultCode, RegistrationValidationError, SecretBundle, TraceId,
};

/// Why a registration attempt did not reach a success code.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    /// The request failed a check with a dedicated result code.
    #[error(transparent)]
    Validation(#[from] RegistrationValidationError),
    /// The principal did not carry an identity key.
    #[error("registration request has no identity key")]
    MissingIdentityKey,
    /// The idempotency check could not be completed.
    #[error("identity lookup failed")]
    Lookup(#[source] IdentityLookupError),
    /// The provisioning message could not be published.
    #[error("provisioning publish failed")]
    Publish(#[source] PublishError),
}

impl RegistrationError {
    /// Caller-visible result code. Only validation keeps a specific code;
    /// everything else collapses to [`RegistrationResultCode::Failed`].
    #[must_use]
    pub fn result_code(&self) -> RegistrationResultCode {
        match self {
            Self::Validation(error) => error.result_code(),
            Self::MissingIdentityKey | Self::Lookup(_) | Self::Publish(_) => {
                RegistrationResultCode::Failed
            }
        }
    }

    fn stage(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::MissingIdentityKey => "validating",
            Self::Lookup(_) => "looking_up",
            Self::Publish(_) => "publishing",
        }
    }
}

/// Queue and secret-store settings the workflow publishes with.
#[derive(Debug, Clone)]
pub struct ProvisioningTarget {
    queue_name: QueueName,
    credentials: SecretBundle,
}

impl ProvisioningTarget {
    /// Bundle the queue name with the credentials used to reach it.
    pub fn new(queue_name: QueueName, credentials: SecretBundle) -> Self {
        Self {
            queue_name,
            credentials,
        }
    }

    /// Destination queue.
    pub fn queue_name(&self) -> &QueueName {
        &self.queue_name
    }
}

/// Stateless registration workflow over the lookup and publisher ports.
pub struct UserRegistrationService<L, P> {
    lookup: Arc<L>,
    publisher: Arc<P>,
    target: ProvisioningTarget,
}

impl<L, P> UserRegistrationService<L, P>
where
    L: IdentityLookup,
    P: ProvisioningPublisher,
{
    /// Create a workflow publishing to `target`.
    pub fn new(lookup: Arc<L>, publisher: Arc<P>, target: ProvisioningTarget) -> Self {
        Self {
            lookup,
            publisher,
            target,
        }
    }

    /// Run the workflow and classify the result.
    ///
    /// # Examples
    /// ```ignore
    /// let service = UserRegistrationService::new(lookup, publisher, target);
    /// let outcome = service.register(RegistrationRequest::new("a@x.com", "Ann A")).await;
    /// assert!(outcome.succeeded());
    /// ```
    pub async fn register(&self, request: RegistrationRequest) -> RegistrationOutcome {
        let outcome = classify(self.run(&request).await);
        info!(
            result_code = ?outcome.result_code(),
            message = outcome.description(),
            "user registration finished"
        );
        outcome
    }

    async fn run(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResultCode, RegistrationError> {
        debug!(stage = "validating", "user registration started");
        request.validate()?;
        if request.email().is_empty() {
            return Err(RegistrationError::MissingIdentityKey);
        }

        debug!(stage = "looking_up", "checking for an existing identity");
        let existing = self
            .lookup
            .find_by_email(request.email())
            .await
            .map_err(RegistrationError::Lookup)?;
        if let Some(record) = existing {
            debug!(record_id = %record.id(), "identity already registered; publish skipped");
            return Ok(RegistrationResultCode::SuccessAlreadyExists);
        }

        let message = ProvisioningMessage::from(request);
        debug!(
            stage = "publishing",
            queue = %self.target.queue_name,
            "publishing provisioning message"
        );
        self.publisher
            .publish(&message, &self.target.queue_name, &self.target.credentials)
            .await
            .map_err(RegistrationError::Publish)?;
        Ok(RegistrationResultCode::Success)
    }
}

fn classify(result: Result<RegistrationResultCode, RegistrationError>) -> RegistrationOutcome {
    let code = match result {
        Ok(code) => code,
        Err(RegistrationError::Validation(error)) => {
            debug!(%error, "registration request rejected");
            error.result_code()
        }
        Err(error) => {
            let trace_id = TraceId::current()
                .map(|id| id.to_string())
                .unwrap_or_default();
            error!(
                trace_id = %trace_id,
                stage = error.stage(),
                error = %error,
                cause_chain = %cause_chain(&error),
                "user registration failed"
            );
            error.result_code()
        }
    };
    RegistrationOutcome::from_code(code)
}

/// Render every `source()` below `error`, outermost first.
fn cause_chain(error: &dyn StdError) -> String {
    let mut causes = Vec::new();
    let mut current = error.source();
    while let Some(cause) = current {
        causes.push(cause.to_string());
        current = cause.source();
    }
    causes.join(" <- ")
}

#[async_trait]
impl<L, P> UserRegistration for UserRegistrationService<L, P>
where
    L: IdentityLookup,
    P: ProvisioningPublisher,
{
    async fn register(&self, request: RegistrationRequest) -> RegistrationOutcome {
        UserRegistrationService::register(self, request).await
    }
}
