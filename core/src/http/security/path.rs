//! Path normalization and segment-aware prefix matching.
//!
//! Paths are compared segment by segment, never as raw strings, so the prefix
//! `/dashboard` matches `/dashboard` and `/dashboard/laporan` but not
//! `/dashboard-admin`.
//!
//! Paths holding `.` or `..` segments, or a `%` left over after the router's
//! percent-decoding, have no canonical form here: the router dispatches them
//! on their raw text, so they match nothing and every check fails closed.
//!
//! # Examples
//!
//! ```rust
//! use access_gate_core::http::security::path::PathPrefix;
//!
//! let prefix = PathPrefix::new("/dashboard").unwrap();
//! assert!(prefix.matches("/dashboard/laporan"));
//! assert!(!prefix.matches("/dashboard-admin/nilai-konversi"));
//! assert!(!prefix.matches("/dashboard-admin/../dashboard/laporan"));
//! ```

use std::fmt;

use crate::http::error::ConfigError;

/// Split a request path into its non-empty segments.
///
/// Query strings and fragments are ignored and repeated slashes collapse.
/// Returns `None` for a path with a `.` or `..` segment or a `%` escape.
pub fn segments(path: &str) -> Option<Vec<&str>> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut segments = Vec::new();

    for part in path.split('/') {
        match part {
            "" => {}
            "." | ".." => return None,
            _ if part.contains('%') => return None,
            _ => segments.push(part),
        }
    }

    Some(segments)
}

/// Whether `path` can be compared against configured paths at all.
pub fn is_canonical(path: &str) -> bool {
    segments(path).is_some()
}

/// Normalize a request path: `/dashboard//laporan/` becomes `/dashboard/laporan`.
///
/// `None` when the path is not canonical.
pub fn normalize(path: &str) -> Option<String> {
    let segments = segments(path)?;
    if segments.is_empty() {
        return Some("/".to_string());
    }

    let mut normalized = String::with_capacity(path.len());
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    Some(normalized)
}

/// Normalize a configured path, which must be absolute and canonical.
pub(crate) fn configured(path: &str) -> Result<String, ConfigError> {
    check_absolute(path)?;
    normalize(path).ok_or_else(|| ConfigError::InvalidPath(path.to_string()))
}

fn check_absolute(path: &str) -> Result<(), ConfigError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::InvalidPath(path.to_string()))
    }
}

/// A path prefix matched on whole segments.
///
/// The root prefix `/` matches every path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    segments: Vec<String>,
}

impl PathPrefix {
    /// Parse a configured prefix. It must be absolute.
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        check_absolute(prefix)?;
        let segments = segments(prefix).ok_or_else(|| ConfigError::InvalidPath(prefix.to_string()))?;
        Ok(Self {
            segments: segments.into_iter().map(String::from).collect(),
        })
    }

    /// Check whether `path` equals this prefix or lies beneath it.
    pub fn matches(&self, path: &str) -> bool {
        match segments(path) {
            Some(path) => {
                path.len() >= self.segments.len()
                    && self.segments.iter().zip(&path).all(|(p, s)| p == s)
            }
            None => false,
        }
    }
}

impl fmt::Display for PathPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A set of exact paths, compared after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExactPaths {
    paths: Vec<String>,
}

impl ExactPaths {
    pub fn new<I, S>(paths: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for path in paths {
            let path = configured(path.as_ref())?;
            if !normalized.contains(&path) {
                normalized.push(path);
            }
        }
        Ok(Self { paths: normalized })
    }

    pub fn contains(&self, path: &str) -> bool {
        match normalize(path) {
            Some(path) => self.paths.contains(&path),
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}
