//! The access gate: credential → decision.
//!
//! Evaluation is a pure function of the request path, the credential and the
//! static configuration. Nothing is remembered between requests.
//!
//! | Path        | No / invalid credential   | Valid credential                       |
//! |-------------|---------------------------|----------------------------------------|
//! | public      | `Allow`                   | `RedirectAuthenticated` (role landing) |
//! | protected   | `RedirectUnauthenticated` | `Allow` or `RedirectUnauthorized`      |

use crate::http::error::{ConfigError, GateError};
use crate::http::security::config::{CompiledRoutes, GateConfig, LandingPages};
use crate::http::security::credential::{decode_unverified, Claims, CredentialConfig, CredentialDecoder};
use crate::http::security::navigation::NavigationModel;
use crate::http::security::path::{is_canonical, normalize};
use crate::http::security::route_table::RoleRouteTable;

/// What the gate knows about the request's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    NoCredential,
    Valid(Claims),
    Invalid(GateError),
}

impl CredentialState {
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            CredentialState::Valid(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, CredentialState::Valid(_))
    }
}

/// Outcome of evaluating one request.
///
/// Every redirect variant carries its target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    /// Authenticated user on a public page, sent to their landing page
    RedirectAuthenticated(String),
    /// Protected page without a valid credential
    RedirectUnauthenticated(String),
    /// Valid credential whose role may not visit the page
    RedirectUnauthorized(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Redirect target, if the request must not continue.
    pub fn location(&self) -> Option<&str> {
        match self {
            AccessDecision::Allow => None,
            AccessDecision::RedirectAuthenticated(to)
            | AccessDecision::RedirectUnauthenticated(to)
            | AccessDecision::RedirectUnauthorized(to) => Some(to),
        }
    }
}

/// A decision together with the credential it was based on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    pub decision: AccessDecision,
    pub credential: CredentialState,
}

/// Role-based access gate.
///
/// # Example
/// ```rust,ignore
/// let gate = AccessGate::from_config(&portal::gate_config())?;
///
/// match gate.evaluate("/dashboard/laporan", cookie.as_deref()) {
///     AccessDecision::Allow => { /* continue */ }
///     other => { /* redirect to other.location() */ }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AccessGate {
    routes: CompiledRoutes,
    decoder: CredentialDecoder,
}

impl AccessGate {
    /// Validate the configuration and load the verification key.
    ///
    /// A key that cannot be loaded does not fail construction: the gate comes
    /// up and treats every credential as invalid.
    pub fn from_config(config: &GateConfig) -> Result<Self, ConfigError> {
        let routes = config.compile()?;
        let decoder = CredentialDecoder::new(config.credential.clone());
        Ok(Self { routes, decoder })
    }

    pub fn credential_config(&self) -> &CredentialConfig {
        self.decoder.config()
    }

    pub fn landing(&self) -> &LandingPages {
        &self.routes.landing
    }

    pub fn route_table(&self) -> &RoleRouteTable {
        &self.routes.table
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.routes.public.contains(path)
    }

    /// Whether the middleware should evaluate `path` at all. Paths without a
    /// canonical form are always evaluated.
    pub fn is_guarded(&self, path: &str) -> bool {
        !is_canonical(path)
            || self.routes.guarded.is_empty()
            || self.is_public(path)
            || self.routes.guarded.iter().any(|prefix| prefix.matches(path))
    }

    /// Verify the credential, if any.
    pub fn resolve(&self, token: Option<&str>) -> CredentialState {
        let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => return CredentialState::NoCredential,
        };

        match self.decoder.verify_and_decode(token) {
            Ok(claims) => CredentialState::Valid(claims),
            Err(err) => {
                tracing::debug!(error = %err, "credential rejected");
                CredentialState::Invalid(err)
            }
        }
    }

    /// Decide on `path` for an already resolved credential.
    ///
    /// `path` must be the path the router dispatches on. Dot segments and
    /// leftover percent escapes are refused rather than resolved.
    pub fn decide(&self, path: &str, credential: &CredentialState) -> AccessDecision {
        let landing = &self.routes.landing;

        if !is_canonical(path) {
            tracing::warn!(path, "request path has dot or encoded segments");
            return match credential {
                CredentialState::Valid(_) => {
                    AccessDecision::RedirectUnauthorized(landing.unauthorized.clone())
                }
                CredentialState::NoCredential | CredentialState::Invalid(_) => {
                    AccessDecision::RedirectUnauthenticated(landing.unauthenticated.clone())
                }
            };
        }

        let public = self.is_public(path);

        let claims = match credential {
            CredentialState::Valid(claims) => claims,
            CredentialState::NoCredential | CredentialState::Invalid(_) => {
                return if public {
                    AccessDecision::Allow
                } else {
                    AccessDecision::RedirectUnauthenticated(landing.unauthenticated.clone())
                };
            }
        };

        if public {
            return AccessDecision::RedirectAuthenticated(landing.for_role(&claims.role).to_string());
        }

        if normalize(path).as_deref() == Some(landing.unauthorized.as_str()) {
            return AccessDecision::Allow;
        }

        match self.routes.table.allows(&claims.role, path) {
            Ok(true) => AccessDecision::Allow,
            Ok(false) => AccessDecision::RedirectUnauthorized(landing.unauthorized.clone()),
            Err(err) => {
                tracing::warn!(role = %claims.role, error = %err, "credential carries a role with no route table entry");
                AccessDecision::RedirectUnauthorized(landing.unauthorized.clone())
            }
        }
    }

    /// Resolve the credential and decide on `path`.
    pub fn authorize(&self, path: &str, token: Option<&str>) -> Authorization {
        let credential = self.resolve(token);
        let decision = self.decide(path, &credential);

        tracing::debug!(
            path,
            role = credential.claims().map(|c| c.role.as_str()),
            decision = ?decision,
            "access decision"
        );

        Authorization {
            decision,
            credential,
        }
    }

    pub fn evaluate(&self, path: &str, token: Option<&str>) -> AccessDecision {
        self.authorize(path, token).decision
    }

    /// Navigation visible to the role named in `token`.
    ///
    /// The token is read without verification; the result only decides which
    /// links to draw and grants nothing.
    pub fn navigation_for(&self, model: &NavigationModel, token: Option<&str>) -> NavigationModel {
        let role = token.and_then(|t| decode_unverified(t).ok()).map(|claims| claims.role);
        model.visible_to(role.as_deref())
    }
}
