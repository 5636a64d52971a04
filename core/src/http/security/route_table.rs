//! Role → allowed path prefixes.

use std::collections::BTreeMap;

use crate::http::error::{ConfigError, GateError};
use crate::http::security::path::PathPrefix;
use crate::http::security::role::Role;

/// Static mapping from role identifier to the path prefixes it may visit.
///
/// A role mapped to an empty set is authenticated but has no guarded route.
/// A role with no entry at all is unknown and treated the same way by the gate.
///
/// # Example
/// ```rust
/// use access_gate_core::http::security::route_table::RoleRouteTable;
///
/// let table = RoleRouteTable::new()
///     .allow("mahasiswa", &["/dashboard"])
///     .unwrap()
///     .allow("koor_mbkm", &["/dashboard-koordinator"])
///     .unwrap();
///
/// assert_eq!(table.allows("mahasiswa", "/dashboard/laporan"), Ok(true));
/// assert_eq!(table.allows("mahasiswa", "/dashboard-admin"), Ok(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleRouteTable {
    routes: BTreeMap<String, Vec<PathPrefix>>,
}

impl RoleRouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `role` the given prefixes, in addition to any it already has.
    pub fn allow(mut self, role: &str, prefixes: &[&str]) -> Result<Self, ConfigError> {
        let entry = self.routes.entry(role.to_string()).or_default();
        for prefix in prefixes {
            let prefix = PathPrefix::new(prefix)?;
            if !entry.contains(&prefix) {
                entry.push(prefix);
            }
        }
        Ok(self)
    }

    /// Grant a portal role the given prefixes.
    pub fn allow_role(self, role: Role, prefixes: &[&str]) -> Result<Self, ConfigError> {
        self.allow(role.as_str(), prefixes)
    }

    /// Build a table from configuration (`role -> [prefix, ...]`).
    pub fn from_map(map: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let mut table = Self::new();
        for (role, prefixes) in map {
            let prefixes: Vec<&str> = prefixes.iter().map(String::as_str).collect();
            table = table.allow(role, &prefixes)?;
        }
        Ok(table)
    }

    /// Allowed prefixes for `role`, or `RoleUnknown`.
    pub fn prefixes(&self, role: &str) -> Result<&[PathPrefix], GateError> {
        self.routes
            .get(role)
            .map(Vec::as_slice)
            .ok_or(GateError::RoleUnknown)
    }

    /// Check whether `role` may visit `path`.
    pub fn allows(&self, role: &str, path: &str) -> Result<bool, GateError> {
        Ok(self.prefixes(role)?.iter().any(|prefix| prefix.matches(path)))
    }

    /// Returns true if the role has an entry, even an empty one.
    pub fn knows(&self, role: &str) -> bool {
        self.routes.contains_key(role)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Portal roles without an entry.
    pub fn missing_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| !self.knows(role.as_str()))
            .collect()
    }
}
