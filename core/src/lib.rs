//! # Access Gate Core
//!
//! Role-based access gate for the MBKM portal.
//!
//! The gate turns a cookie-scoped credential into one of a small set of
//! decisions (continue, or redirect somewhere) and, separately, into the
//! subset of the navigation model a role should see.
//!
//! ## Modules
//!
//! - [`http::security`] - Credential decoding, route authorization, navigation
//!   filtering and the Actix Web middleware
//! - [`http::error`] - Error types

pub mod http;
