//! Gate configuration.
//!
//! Everything the gate needs is static and known at deploy time: the public
//! routes, the role route table, the landing pages and how to find and verify
//! the credential. The configuration is plain serde data so it can live in a
//! JSON file next to the deployment; only the secret stays in the environment.
//!
//! # Example
//! ```json
//! {
//!   "public_routes": ["/", "/sign-in"],
//!   "guarded_paths": ["/dashboard", "/dashboard-admin"],
//!   "role_routes": {
//!     "mahasiswa": ["/dashboard"],
//!     "admin": ["/dashboard-admin"]
//!   },
//!   "landing": {
//!     "authenticated": "/dashboard",
//!     "per_role": { "admin": "/dashboard-admin" },
//!     "unauthenticated": "/",
//!     "unauthorized": "/unauthorized"
//!   },
//!   "credential": { "key": { "env": "ACCESS_GATE_SECRET" }, "cookie_name": "token" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::http::error::ConfigError;
use crate::http::security::credential::CredentialConfig;
use crate::http::security::path::{configured, ExactPaths, PathPrefix};
use crate::http::security::route_table::RoleRouteTable;

/// Where the gate sends users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingPages {
    /// Default landing for authenticated users hitting a public page
    pub authenticated: String,
    /// Per-role overrides of `authenticated`
    pub per_role: BTreeMap<String, String>,
    /// Target of `RedirectUnauthenticated`
    pub unauthenticated: String,
    /// Target of `RedirectUnauthorized`
    pub unauthorized: String,
}

impl LandingPages {
    /// Landing page for an authenticated user of `role`.
    pub fn for_role(&self, role: &str) -> &str {
        self.per_role
            .get(role)
            .map(String::as_str)
            .unwrap_or(&self.authenticated)
    }

    fn authenticated_pages(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.authenticated.as_str()).chain(self.per_role.values().map(String::as_str))
    }

    fn check(&self, public: &ExactPaths, table: &RoleRouteTable) -> Result<(), ConfigError> {
        for page in self
            .authenticated_pages()
            .chain([self.unauthenticated.as_str(), self.unauthorized.as_str()])
        {
            if !page.starts_with('/') {
                return Err(ConfigError::InvalidPath(page.to_string()));
            }
        }

        if let Some(page) = self.authenticated_pages().find(|page| public.contains(page)) {
            return Err(ConfigError::LandingIsPublic(page.to_string()));
        }
        if public.contains(&self.unauthorized) {
            return Err(ConfigError::UnauthorizedPageIsPublic(self.unauthorized.clone()));
        }
        if !public.contains(&self.unauthenticated) {
            return Err(ConfigError::UnauthenticatedLandingNotPublic(
                self.unauthenticated.clone(),
            ));
        }

        for role in table.roles() {
            let landing = self.for_role(role);
            let has_routes = table.prefixes(role).map_or(false, |p| !p.is_empty());
            if has_routes && table.allows(role, landing) == Ok(false) {
                tracing::warn!(
                    role,
                    landing,
                    "landing page is outside the role's routes; users will land on the unauthorized page"
                );
            }
        }
        for role in self.per_role.keys().filter(|role| !table.knows(role)) {
            tracing::warn!(role = %role, "landing page configured for a role missing from the route table");
        }

        Ok(())
    }
}

impl Default for LandingPages {
    fn default() -> Self {
        Self {
            authenticated: "/dashboard".to_string(),
            per_role: BTreeMap::new(),
            unauthenticated: "/".to_string(),
            unauthorized: "/unauthorized".to_string(),
        }
    }
}

/// Complete gate configuration.
///
/// # Example
/// ```rust,ignore
/// let config = GateConfig::new()
///     .public_routes(&["/", "/sign-in"])
///     .role_routes("mahasiswa", &["/dashboard"])
///     .role_routes("koor_mbkm", &["/dashboard-koordinator"])
///     .role_landing("koor_mbkm", "/dashboard-koordinator")
///     .credential(CredentialConfig::from_env("ACCESS_GATE_SECRET"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Exact paths reachable without a credential
    pub public_routes: Vec<String>,
    /// Prefixes the middleware evaluates; empty means every path
    pub guarded_paths: Vec<String>,
    /// Role route table
    pub role_routes: BTreeMap<String, Vec<String>>,
    pub landing: LandingPages,
    pub credential: CredentialConfig,
}

impl GateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the public routes.
    pub fn public_routes(mut self, routes: &[&str]) -> Self {
        self.public_routes = routes.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Add a guarded prefix.
    pub fn guarded_path(mut self, prefix: &str) -> Self {
        self.guarded_paths.push(prefix.to_string());
        self
    }

    /// Grant `role` the given prefixes.
    pub fn role_routes(mut self, role: &str, prefixes: &[&str]) -> Self {
        self.role_routes
            .entry(role.to_string())
            .or_default()
            .extend(prefixes.iter().map(|p| p.to_string()));
        self
    }

    pub fn authenticated_landing(mut self, path: &str) -> Self {
        self.landing.authenticated = path.to_string();
        self
    }

    pub fn role_landing(mut self, role: &str, path: &str) -> Self {
        self.landing.per_role.insert(role.to_string(), path.to_string());
        self
    }

    pub fn unauthenticated_landing(mut self, path: &str) -> Self {
        self.landing.unauthenticated = path.to_string();
        self
    }

    pub fn unauthorized_page(mut self, path: &str) -> Self {
        self.landing.unauthorized = path.to_string();
        self
    }

    pub fn credential(mut self, credential: CredentialConfig) -> Self {
        self.credential = credential;
        self
    }

    /// Check the configuration without building a gate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compile().map(|_| ())
    }

    pub(crate) fn compile(&self) -> Result<CompiledRoutes, ConfigError> {
        let public = ExactPaths::new(&self.public_routes)?;
        let table = RoleRouteTable::from_map(&self.role_routes)?;
        let guarded = self
            .guarded_paths
            .iter()
            .map(|p| PathPrefix::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        self.landing.check(&public, &table)?;

        for role in table.missing_roles() {
            tracing::warn!(role = %role, "portal role has no route table entry and will get no access");
        }

        let landing = LandingPages {
            authenticated: configured(&self.landing.authenticated)?,
            per_role: self
                .landing
                .per_role
                .iter()
                .map(|(role, page)| configured(page).map(|page| (role.clone(), page)))
                .collect::<Result<_, _>>()?,
            unauthenticated: configured(&self.landing.unauthenticated)?,
            unauthorized: configured(&self.landing.unauthorized)?,
        };

        Ok(CompiledRoutes {
            public,
            guarded,
            table,
            landing,
        })
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_routes: vec!["/".to_string()],
            guarded_paths: Vec::new(),
            role_routes: BTreeMap::new(),
            landing: LandingPages::default(),
            credential: CredentialConfig::default(),
        }
    }
}

/// Parsed, validated routing data.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRoutes {
    pub(crate) public: ExactPaths,
    pub(crate) guarded: Vec<PathPrefix>,
    pub(crate) table: RoleRouteTable,
    pub(crate) landing: LandingPages,
}
