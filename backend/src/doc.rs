//! OpenAPI document for the registration service.
//!
//! Served by Swagger UI in debug builds and printed by the `openapi-dump`
//! binary for external tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::registration::RegistrationResponse;

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_owned());
        bearer.description =
            Some("Identity provider token carrying `preferred_username`, `name`, and `roles`.".to_owned());
        components.add_security_scheme("BearerToken", SecurityScheme::Http(bearer));
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Identity registration API",
        description = "Registers authenticated callers and queues their provisioning."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::registration::register_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(RegistrationResponse, Error, ErrorCode)),
    tags(
        (name = "registration", description = "User registration"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
