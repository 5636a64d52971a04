//! Access gate: credential verification, route authorization and navigation
//! filtering.
//!
//! # Module Structure
//!
//! - `role` - The portal's closed role set
//! - `credential` - Claims, key loading, verified and unverified decoding, issuance
//! - `path` - Path normalization and segment-aware prefixes
//! - `route_table` - Role → allowed path prefixes
//! - `config` - Gate configuration (JSON-loadable)
//! - `gate` - The access decision
//! - `navigation` - Role-filtered navigation model
//! - `portal` - MBKM portal presets
//! - `middleware` - Actix Web middleware (AccessGateTransform)
//! - `extractor` - Handler extractors for the verified credential

// Re-exports for convenience
pub use config::{GateConfig, LandingPages};
pub use credential::{
    decode_unverified, Algorithm, Claims, CredentialConfig, CredentialDecoder, CredentialIssuer,
    KeySource,
};
pub use extractor::{AuthenticatedCredential, OptionalCredential};
pub use gate::{AccessDecision, AccessGate, Authorization, CredentialState};
pub use middleware::AccessGateTransform;
pub use navigation::{NavEntry, NavGroup, NavLink, NavigationModel, UnreachableLink};
pub use path::PathPrefix;
pub use role::Role;
pub use route_table::RoleRouteTable;

// Internal modules
mod extractor;

pub mod config;
pub mod credential;
pub mod gate;
pub mod middleware;
pub mod navigation;
pub mod path;
pub mod portal;
pub mod role;
pub mod route_table;
