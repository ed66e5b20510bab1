//! Bearer-token authentication for HTTP handlers.
//!
//! Tokens are verified with `jsonwebtoken` against either a shared HS256
//! secret or an RS256 public key. When a role is configured, the token's
//! `roles` claim must contain it. Handlers receive an [`AuthenticatedPrincipal`]
//! extracted from the request; they never see the raw token.

use std::fmt;
use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tracing::{debug, error};
use zeroize::Zeroizing;

use crate::domain::{Error, RegistrationRequest};

use super::ApiResult;

const BEARER_PREFIX: &str = "Bearer ";
const EXPIRY_LEEWAY_SECS: u64 = 60;

/// Key material used to verify token signatures.
#[derive(Clone)]
pub enum TokenKey {
    /// Shared HMAC secret.
    Hs256(Zeroizing<Vec<u8>>),
    /// PEM-encoded RSA public key.
    Rs256Pem(Vec<u8>),
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hs256(_) => f.write_str("Hs256([REDACTED])"),
            Self::Rs256Pem(_) => f.write_str("Rs256Pem(..)"),
        }
    }
}

/// Rules a bearer token must satisfy.
#[derive(Debug, Clone)]
pub struct TokenValidationConfig {
    key: TokenKey,
    issuer: Option<String>,
    audience: Option<String>,
    required_role: Option<String>,
}

impl TokenValidationConfig {
    /// Accept any unexpired token signed with `key`.
    pub fn new(key: TokenKey) -> Self {
        Self {
            key,
            issuer: None,
            audience: None,
            required_role: None,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Require `role` in the token's `roles` claim.
    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_role = Some(role.into());
        self
    }
}

/// Raised when the verification key cannot be loaded.
#[derive(Debug, thiserror::Error)]
#[error("invalid token verification key: {0}")]
pub struct TokenKeyError(#[from] jsonwebtoken::errors::Error);

/// Claims read from a verified token.
#[derive(Debug, Clone, Default, Deserialize)]
struct Claims {
    #[serde(default)]
    preferred_username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    roles: Vec<String>,
}

/// Identity carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedPrincipal {
    email: String,
    full_name: String,
}

impl AuthenticatedPrincipal {
    pub fn new(email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            full_name: full_name.into(),
        }
    }

    /// Value of the `preferred_username` claim, or empty when absent.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Value of the `name` claim, or empty when absent.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl From<&AuthenticatedPrincipal> for RegistrationRequest {
    fn from(principal: &AuthenticatedPrincipal) -> Self {
        RegistrationRequest::new(principal.email(), principal.full_name())
    }
}

/// Verifies bearer tokens against a [`TokenValidationConfig`].
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
    required_role: Option<String>,
}

impl TokenVerifier {
    /// Load the verification key and build the validation rules.
    ///
    /// # Errors
    ///
    /// Returns [`TokenKeyError`] when an RS256 key is not valid PEM.
    pub fn new(config: &TokenValidationConfig) -> Result<Self, TokenKeyError> {
        let (key, algorithm) = match &config.key {
            TokenKey::Hs256(secret) => (DecodingKey::from_secret(secret), Algorithm::HS256),
            TokenKey::Rs256Pem(pem) => (DecodingKey::from_rsa_pem(pem)?, Algorithm::RS256),
        };

        let mut validation = Validation::new(algorithm);
        validation.algorithms = vec![algorithm];
        validation.leeway = EXPIRY_LEEWAY_SECS;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key,
            validation,
            required_role: config.required_role.clone(),
        })
    }

    /// Verify `token` and return the principal it carries.
    ///
    /// # Errors
    ///
    /// `Unauthorized` for a bad signature, expired or malformed token;
    /// `Forbidden` when the required role is missing.
    pub fn verify(&self, token: &str) -> ApiResult<AuthenticatedPrincipal> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| {
                debug!(reason = %err, "bearer token rejected");
                Error::unauthorized("invalid bearer token")
            })?;
        let claims = data.claims;

        if let Some(role) = &self.required_role {
            if !claims.roles.iter().any(|granted| granted == role) {
                debug!(required_role = %role, "bearer token lacks required role");
                return Err(Error::forbidden(
                    "caller lacks the role required for registration",
                ));
            }
        }

        Ok(AuthenticatedPrincipal::new(
            claims.preferred_username.unwrap_or_default(),
            claims.name.unwrap_or_default(),
        ))
    }
}

fn bearer_token(req: &HttpRequest) -> ApiResult<&str> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("bearer token required"))?;
    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("bearer token required"))
}

fn authenticate(req: &HttpRequest) -> ApiResult<AuthenticatedPrincipal> {
    let Some(verifier) = req.app_data::<web::Data<TokenVerifier>>() else {
        error!("token verifier missing from application data");
        return Err(Error::internal("token verifier not configured"));
    };
    verifier.verify(bearer_token(req)?)
}

impl FromRequest for AuthenticatedPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
