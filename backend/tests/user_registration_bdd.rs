//! Behavioural tests for the user registration workflow.
//!
//! The workflow runs against in-memory adapters for the identity store and the
//! provisioning queue so each scenario can observe lookups and publishes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::executor::block_on;
use identity_registration::domain::ports::{
    IdentityLookup, IdentityLookupError, ProvisioningPublisher, PublishError,
};
use identity_registration::domain::{
    ExistingUserRecord, ProvisioningMessage, ProvisioningTarget, QueueName, RegistrationOutcome,
    RegistrationRequest, RegistrationResultCode, SecretBundle, UserRegistrationService,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use uuid::Uuid;

const EMAIL: &str = "ann@example.com";
const FULL_NAME: &str = "Ann Example";
const QUEUE: &str = "user_provisioning";

#[derive(Debug, Default)]
struct InMemoryIdentityStore {
    records: Mutex<HashMap<String, ExistingUserRecord>>,
    unavailable: bool,
    queries: AtomicUsize,
}

impl InMemoryIdentityStore {
    fn insert(&self, email: &str) {
        self.records
            .lock()
            .expect("store lock")
            .insert(email.to_owned(), ExistingUserRecord::new(Uuid::new_v4().to_string(), email));
    }
}

#[async_trait]
impl IdentityLookup for InMemoryIdentityStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<ExistingUserRecord>, IdentityLookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(IdentityLookupError::unavailable("connection refused"));
        }
        Ok(self.records.lock().expect("store lock").get(email).cloned())
    }
}

/// Records every published message; optionally provisions the user into a
/// store the way the downstream consumer would.
#[derive(Debug, Default)]
struct RecordingPublisher {
    published: Mutex<Vec<ProvisioningMessage>>,
    unavailable: bool,
    consumer: Option<Arc<InMemoryIdentityStore>>,
}

#[async_trait]
impl ProvisioningPublisher for RecordingPublisher {
    async fn publish(
        &self,
        message: &ProvisioningMessage,
        queue_name: &QueueName,
        _credentials: &SecretBundle,
    ) -> Result<(), PublishError> {
        if self.unavailable {
            return Err(PublishError::unavailable("connection reset"));
        }
        assert_eq!(queue_name.as_ref(), QUEUE);
        self.published
            .lock()
            .expect("publisher lock")
            .push(message.clone());
        if let Some(store) = &self.consumer {
            store.insert(message.email());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct RegistrationWorld {
    store: Arc<InMemoryIdentityStore>,
    publisher: Option<Arc<RecordingPublisher>>,
    outcomes: Vec<RegistrationOutcome>,
}

impl RegistrationWorld {
    fn publisher(&self) -> Arc<RecordingPublisher> {
        self.publisher
            .clone()
            .expect("provisioning queue should be configured")
    }

    fn register(&mut self, request: RegistrationRequest) {
        let target = ProvisioningTarget::new(
            QueueName::new(QUEUE).expect("valid queue name"),
            SecretBundle::new("queue-send", "client", "secret", "https://vault.local"),
        );
        let service = UserRegistrationService::new(self.store.clone(), self.publisher(), target);
        self.outcomes.push(block_on(service.register(request)));
    }

    fn last_outcome(&self) -> &RegistrationOutcome {
        self.outcomes.last().expect("a registration should have run")
    }

    fn published(&self) -> Vec<ProvisioningMessage> {
        self.publisher()
            .published
            .lock()
            .expect("publisher lock")
            .clone()
    }
}

#[fixture]
fn world() -> RegistrationWorld {
    RegistrationWorld::default()
}

#[given("an empty identity store")]
fn an_empty_identity_store(world: &mut RegistrationWorld) {
    world.store = Arc::new(InMemoryIdentityStore::default());
}

#[given("the user is already registered")]
fn the_user_is_already_registered(world: &mut RegistrationWorld) {
    let store = InMemoryIdentityStore::default();
    store.insert(EMAIL);
    world.store = Arc::new(store);
}

#[given("the identity store is unavailable")]
fn the_identity_store_is_unavailable(world: &mut RegistrationWorld) {
    world.store = Arc::new(InMemoryIdentityStore {
        unavailable: true,
        ..InMemoryIdentityStore::default()
    });
}

#[given("a working provisioning queue")]
fn a_working_provisioning_queue(world: &mut RegistrationWorld) {
    world.publisher = Some(Arc::new(RecordingPublisher::default()));
}

#[given("the provisioning queue is unavailable")]
fn the_provisioning_queue_is_unavailable(world: &mut RegistrationWorld) {
    world.publisher = Some(Arc::new(RecordingPublisher {
        unavailable: true,
        ..RecordingPublisher::default()
    }));
}

#[given("a provisioning consumer that stores each queued user")]
fn a_provisioning_consumer_that_stores_each_queued_user(world: &mut RegistrationWorld) {
    world.publisher = Some(Arc::new(RecordingPublisher {
        consumer: Some(world.store.clone()),
        ..RecordingPublisher::default()
    }));
}

#[when("a new user registers with a full name")]
fn a_new_user_registers_with_a_full_name(world: &mut RegistrationWorld) {
    world.register(RegistrationRequest::new(EMAIL, FULL_NAME));
}

#[when("the same user registers again")]
fn the_same_user_registers_again(world: &mut RegistrationWorld) {
    world.register(RegistrationRequest::new(EMAIL, FULL_NAME));
}

#[when("a user registers without a full name")]
fn a_user_registers_without_a_full_name(world: &mut RegistrationWorld) {
    world.register(RegistrationRequest::new(EMAIL, ""));
}

#[then("the outcome is a successful registration")]
fn the_outcome_is_a_successful_registration(world: &mut RegistrationWorld) {
    let outcome = world.last_outcome();
    assert!(outcome.succeeded());
    assert_eq!(outcome.result_code(), RegistrationResultCode::Success);
}

#[then("the outcome reports the user as already registered")]
fn the_outcome_reports_the_user_as_already_registered(world: &mut RegistrationWorld) {
    let outcome = world.last_outcome();
    assert!(outcome.succeeded());
    assert_eq!(
        outcome.result_code(),
        RegistrationResultCode::SuccessAlreadyExists
    );
}

#[then("the outcome is a failed registration for a missing full name")]
fn the_outcome_is_a_failed_registration_for_a_missing_full_name(world: &mut RegistrationWorld) {
    let outcome = world.last_outcome();
    assert!(!outcome.succeeded());
    assert_eq!(
        outcome.result_code(),
        RegistrationResultCode::FailedEmptyFullname
    );
}

#[then("the outcome is a failed registration")]
fn the_outcome_is_a_failed_registration(world: &mut RegistrationWorld) {
    let outcome = world.last_outcome();
    assert!(!outcome.succeeded());
    assert_eq!(outcome.result_code(), RegistrationResultCode::Failed);
    assert_eq!(outcome.description(), "User registration failed.");
}

#[then("the outcomes are a successful registration followed by already registered")]
fn the_outcomes_are_a_successful_registration_followed_by_already_registered(
    world: &mut RegistrationWorld,
) {
    let codes: Vec<_> = world
        .outcomes
        .iter()
        .map(RegistrationOutcome::result_code)
        .collect();
    assert_eq!(
        codes,
        vec![
            RegistrationResultCode::Success,
            RegistrationResultCode::SuccessAlreadyExists,
        ]
    );
}

#[then("exactly one provisioning message was published for the new user")]
fn exactly_one_provisioning_message_was_published_for_the_new_user(
    world: &mut RegistrationWorld,
) {
    let published = world.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].email(), EMAIL);
    assert_eq!(published[0].full_name(), FULL_NAME);
}

#[then("no provisioning message was published")]
fn no_provisioning_message_was_published(world: &mut RegistrationWorld) {
    assert!(world.published().is_empty());
}

#[then("the identity store was not queried")]
fn the_identity_store_was_not_queried(world: &mut RegistrationWorld) {
    assert_eq!(world.store.queries.load(Ordering::SeqCst), 0);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "A new user is queued for provisioning"
)]
fn a_new_user_is_queued_for_provisioning(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "An existing user is not queued again"
)]
fn an_existing_user_is_not_queued_again(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "A user without a full name is rejected before any lookup"
)]
fn a_user_without_a_full_name_is_rejected_before_any_lookup(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "An unavailable identity store fails the registration"
)]
fn an_unavailable_identity_store_fails_the_registration(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "An unavailable provisioning queue fails the registration"
)]
fn an_unavailable_provisioning_queue_fails_the_registration(world: RegistrationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/user_registration.feature",
    name = "Registering again after provisioning reports the user as existing"
)]
fn registering_again_after_provisioning_reports_the_user_as_existing(world: RegistrationWorld) {
    drop(world);
}
