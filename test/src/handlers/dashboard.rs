//! Dashboard pages (protected by the gate).

use actix_web::{web, HttpRequest, HttpResponse, Scope};

use access_gate_core::http::error::AuthError;
use access_gate_core::http::security::{portal, AuthenticatedCredential, Role};

/// Placeholder page for any path of a dashboard tree.
///
/// The gate has already checked the route; the handler still refuses a
/// credential of another role with `403 Forbidden`.
async fn page(
    req: HttpRequest,
    owner: web::Data<Role>,
    credential: AuthenticatedCredential,
) -> Result<HttpResponse, AuthError> {
    credential.require_role(**owner)?;

    let subject = credential
        .subject()
        .map(|(key, id)| format!("{}={}", key, id))
        .unwrap_or_default();

    Ok(HttpResponse::Ok().body(format!(
        "{}\n\nrole={} {} email={}",
        req.path(),
        credential.role,
        subject,
        credential.email
    )))
}

/// A scope answering every path under the dashboard of `role`.
pub fn scope(role: Role) -> Scope {
    web::scope(portal::dashboard(role))
        .app_data(web::Data::new(role))
        .default_service(web::to(page))
}
