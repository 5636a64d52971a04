use std::fmt;

/// Errors raised while loading or validating a gate configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io(std::io::Error),
    /// The configuration is not valid JSON for `GateConfig`
    Parse(serde_json::Error),
    /// A configured path is not absolute
    InvalidPath(String),
    /// A page that authenticated users are sent to is also public
    LandingIsPublic(String),
    /// The unauthorized page is public
    UnauthorizedPageIsPublic(String),
    /// The page unauthenticated users are sent to is not public
    UnauthenticatedLandingNotPublic(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read gate configuration: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse gate configuration: {}", e),
            ConfigError::InvalidPath(p) => write!(f, "path must start with '/': {:?}", p),
            ConfigError::LandingIsPublic(p) => {
                write!(f, "landing page {} is also a public route", p)
            }
            ConfigError::UnauthorizedPageIsPublic(p) => {
                write!(f, "unauthorized page {} is also a public route", p)
            }
            ConfigError::UnauthenticatedLandingNotPublic(p) => {
                write!(f, "unauthenticated landing page {} is not a public route", p)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}
