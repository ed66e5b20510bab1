//! Regression coverage for the registration vocabulary.

use super::*;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(RegistrationResultCode::Success, true)]
#[case(RegistrationResultCode::SuccessAlreadyExists, true)]
#[case(RegistrationResultCode::FailedEmptyFullname, false)]
#[case(RegistrationResultCode::Failed, false)]
fn outcome_success_flag_follows_code(
    #[case] code: RegistrationResultCode,
    #[case] expected: bool,
) {
    let outcome = RegistrationOutcome::from_code(code);
    assert_eq!(outcome.succeeded(), expected);
    assert_eq!(outcome.result_code(), code);
    assert_eq!(outcome.description(), code.description());
}

#[rstest]
fn descriptions_are_distinct() {
    let codes = [
        RegistrationResultCode::Success,
        RegistrationResultCode::SuccessAlreadyExists,
        RegistrationResultCode::FailedEmptyFullname,
        RegistrationResultCode::Failed,
    ];
    let descriptions: std::collections::HashSet<_> =
        codes.iter().map(|code| code.description()).collect();
    assert_eq!(descriptions.len(), codes.len());
}

#[rstest]
#[case("", Err(RegistrationValidationError::EmptyFullName))]
#[case("Ann A", Ok(()))]
#[case(" ", Ok(()))]
fn validate_only_rejects_empty_full_name(
    #[case] full_name: &str,
    #[case] expected: Result<(), RegistrationValidationError>,
) {
    let request = RegistrationRequest::new("a@x.com", full_name);
    assert_eq!(request.validate(), expected);
}

#[rstest]
fn empty_full_name_maps_to_dedicated_code() {
    assert_eq!(
        RegistrationValidationError::EmptyFullName.result_code(),
        RegistrationResultCode::FailedEmptyFullname
    );
}

#[rstest]
fn provisioning_message_copies_request_fields_and_uses_consumer_shape() {
    let request = RegistrationRequest::new("a@x.com", "Ann A");
    let message = ProvisioningMessage::from(&request);
    assert_eq!(message.email(), request.email());
    assert_eq!(message.full_name(), request.full_name());

    let value = serde_json::to_value(&message).expect("serialise message");
    assert_eq!(value, json!({ "fullname": "Ann A", "email": "a@x.com" }));
}

#[rstest]
#[case("user_registration", Ok(()))]
#[case("", Err(QueueNameValidationError::Empty))]
#[case("user-registration", Err(QueueNameValidationError::InvalidCharacters))]
#[case(&"q".repeat(QUEUE_NAME_MAX + 1), Err(QueueNameValidationError::TooLong { max: QUEUE_NAME_MAX }))]
fn queue_name_validation(
    #[case] raw: &str,
    #[case] expected: Result<(), QueueNameValidationError>,
) {
    assert_eq!(QueueName::new(raw).map(|_| ()), expected);
}
