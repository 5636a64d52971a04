//! Extractors for reading the verified credential in handlers.
//!
//! The middleware stores the claims of every allowed request that carried a
//! valid credential. Handlers behind the gate can therefore rely on
//! [`AuthenticatedCredential`]; handlers on public or unguarded paths should
//! use [`OptionalCredential`].

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::credential::Claims;
use crate::http::security::role::Role;

/// Extractor for the verified claims.
///
/// # Usage
/// ```ignore
/// async fn logbook(credential: AuthenticatedCredential) -> impl Responder {
///     format!("Logbook of {}", credential.email)
/// }
/// ```
///
/// # Errors
/// Returns `401 Unauthorized` if the gate attached no credential.
#[derive(Debug, Clone)]
pub struct AuthenticatedCredential(Claims);

impl AuthenticatedCredential {
    pub fn new(claims: Claims) -> Self {
        AuthenticatedCredential(claims)
    }

    pub fn into_inner(self) -> Claims {
        self.0
    }

    /// `403 Forbidden` unless the credential belongs to `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.0.role == role.as_str() {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

impl Deref for AuthenticatedCredential {
    type Target = Claims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedCredential {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>().cloned() {
            Some(claims) => ready(Ok(AuthenticatedCredential(claims))),
            None => ready(Err(AuthError::Unauthorized)),
        }
    }
}

/// Optional extractor for the verified claims.
#[derive(Debug, Clone)]
pub struct OptionalCredential(Option<Claims>);

impl OptionalCredential {
    pub fn into_inner(self) -> Option<Claims> {
        self.0
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for OptionalCredential {
    type Target = Option<Claims>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalCredential {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalCredential(req.extensions().get::<Claims>().cloned())))
    }
}
