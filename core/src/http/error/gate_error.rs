use derive_more::{Display, Error};

/// Failures while resolving a credential into a role.
///
/// Every variant is terminal: the gate never retries, and none of them is ever
/// surfaced to the end user beyond the redirect it causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum GateError {
    /// The token could not be parsed, or its claims are inconsistent.
    #[display("malformed token")]
    MalformedToken,
    /// The signature does not verify against the configured key.
    #[display("invalid signature")]
    InvalidSignature,
    /// The `exp` claim has passed.
    #[display("token expired")]
    Expired,
    /// The role claim has no entry in the role route table.
    #[display("unknown role")]
    RoleUnknown,
    /// The verification key could not be loaded.
    #[display("verification key unavailable")]
    KeyUnavailable,
}

impl GateError {
    /// Returns true for errors that mean "no valid credential".
    ///
    /// `RoleUnknown` is the only error raised after a credential verified.
    pub fn is_credential_error(&self) -> bool {
        !matches!(self, GateError::RoleUnknown)
    }
}

impl From<jsonwebtoken::errors::Error> for GateError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => GateError::Expired,
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::ImmatureSignature => GateError::InvalidSignature,
            _ => GateError::MalformedToken,
        }
    }
}
