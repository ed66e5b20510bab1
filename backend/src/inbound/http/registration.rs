//! User registration endpoint.
//!
//! ```text
//! POST /api/v1/user-registration
//! Authorization: Bearer <token>
//! ```
//!
//! The request has no body: the identity comes from the token. The response
//! status mirrors the outcome (200 for success codes, 400 otherwise) and the
//! body carries the outcome's description.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, RegistrationOutcome, RegistrationRequest};
use crate::inbound::http::auth::AuthenticatedPrincipal;
use crate::inbound::http::state::HttpState;

/// Body of every registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegistrationResponse {
    #[schema(example = "User registration has been accepted and is being processed.")]
    pub message: String,
}

impl From<&RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: &RegistrationOutcome) -> Self {
        Self {
            message: outcome.description().to_owned(),
        }
    }
}

fn respond(outcome: RegistrationOutcome) -> HttpResponse {
    let body = RegistrationResponse::from(&outcome);
    if outcome.succeeded() {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

/// Register the caller identified by the bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/user-registration",
    responses(
        (status = 200, description = "Registration accepted or already present", body = RegistrationResponse),
        (status = 400, description = "Registration failed", body = RegistrationResponse),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 403, description = "Caller lacks the registration role", body = Error)
    ),
    tags = ["registration"],
    operation_id = "registerUser",
    security(("BearerToken" = []))
)]
#[post("/user-registration")]
pub async fn register_user(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
) -> HttpResponse {
    let request = RegistrationRequest::from(&principal);
    respond(state.registration.register(request).await)
}
