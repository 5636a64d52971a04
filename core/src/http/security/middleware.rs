//! Access gate middleware for Actix Web.
//!
//! Every guarded request is evaluated by the [`AccessGate`]; allowed requests
//! continue with their verified claims in the request extensions, everything
//! else gets a `302 Found` to the decision's target.

use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::body::EitherBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::credential::CredentialConfig;
use crate::http::security::gate::{AccessGate, Authorization, CredentialState};

/// Middleware factory.
///
/// # Example
/// ```ignore
/// let gate = Arc::new(AccessGate::from_config(&portal::gate_config())?);
///
/// HttpServer::new(move || {
///     App::new()
///         .wrap(AccessGateTransform::new(Arc::clone(&gate)))
///         .service(dashboard)
/// })
/// ```
pub struct AccessGateTransform {
    gate: Arc<AccessGate>,
}

impl AccessGateTransform {
    pub fn new(gate: Arc<AccessGate>) -> Self {
        AccessGateTransform { gate }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AccessGateTransform
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AccessGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AccessGateService {
            gate: Arc::clone(&self.gate),
            service,
        })
    }
}

/// Middleware service.
pub struct AccessGateService<S> {
    gate: Arc<AccessGate>,
    service: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenSource {
    Cookie,
    BearerHeader,
}

/// Find the credential: the configured cookie first, then the bearer header
/// when enabled.
fn extract_token(req: &ServiceRequest, config: &CredentialConfig) -> Option<(String, TokenSource)> {
    if let Some(cookie) = req.cookie(&config.cookie_name) {
        return Some((cookie.value().to_string(), TokenSource::Cookie));
    }

    if !config.bearer_header {
        return None;
    }

    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| (token.to_string(), TokenSource::BearerHeader))
}

impl<S, B> Service<ServiceRequest> for AccessGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The percent-decoded path the router dispatches on, not the raw URI
        let path = req.match_info().as_str().to_string();

        if !self.gate.is_guarded(&path) {
            let fut = self.service.call(req);
            return Box::pin(async move {
                let res = fut.await?;
                Ok(res.map_into_left_body())
            });
        }

        let config = self.gate.credential_config();
        let token = extract_token(&req, config);
        let Authorization {
            decision,
            credential,
        } = self
            .gate
            .authorize(&path, token.as_ref().map(|(t, _)| t.as_str()));

        let location = match decision.location() {
            None => {
                // Handlers read the verified claims through the credential extractors
                if let CredentialState::Valid(claims) = credential {
                    req.extensions_mut().insert(claims);
                }

                let fut = self.service.call(req);
                return Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                });
            }
            Some(location) => location.to_string(),
        };

        let mut response = HttpResponse::Found();
        response.append_header((header::LOCATION, location));

        // Stale or forged cookies are dropped so the browser stops sending them
        let from_cookie = matches!(token, Some((_, TokenSource::Cookie)));
        if from_cookie && matches!(credential, CredentialState::Invalid(_)) {
            let mut removal = Cookie::build(config.cookie_name.clone(), "").path("/").finish();
            removal.make_removal();
            response.cookie(removal);
        }

        let res = req.into_response(response.finish().map_into_right_body());
        Box::pin(async move { Ok(res) })
    }
}
