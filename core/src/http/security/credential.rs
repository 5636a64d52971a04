//! Credential decoding and issuance.
//!
//! A credential is a three-part HMAC-signed JWT issued by the portal's auth
//! service and carried in a cookie. This module offers two ways of reading one:
//!
//! - [`CredentialDecoder::verify_and_decode`] checks the signature and expiry
//!   against the server-held key. It is the only input the route gate accepts.
//! - [`decode_unverified`] only parses the token. Its output is good for
//!   cosmetic personalization (navigation, display name) and nothing else.
//!
//! # Example
//! ```rust,ignore
//! use access_gate_core::http::security::credential::{CredentialConfig, CredentialDecoder};
//!
//! let config = CredentialConfig::from_env("ACCESS_GATE_SECRET")
//!     .cookie_name("token")
//!     .leeway_secs(5);
//!
//! let decoder = CredentialDecoder::new(config);
//! let claims = decoder.verify_and_decode(&token)?;
//! ```

use std::fmt;

use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::http::error::GateError;
use crate::http::security::role::Role;

pub use jsonwebtoken::Algorithm;

/// Environment variable holding the shared secret unless configured otherwise.
pub const DEFAULT_KEY_ENV: &str = "ACCESS_GATE_SECRET";

/// Cookie carrying the credential unless configured otherwise.
pub const DEFAULT_COOKIE_NAME: &str = "token";

// =============================================================================
// Claims
// =============================================================================

/// Claims carried by a portal credential.
///
/// Exactly one of the subject-id fields is populated, and for the known roles
/// it is the one named by [`Role::subject_claim`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Role identifier
    pub role: String,

    /// Student number (mahasiswa)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nim: Option<String>,

    /// Lecturer id (dosen_pembimbing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip: Option<String>,

    /// Coordinator id (koor_mbkm)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_koordinator: Option<String>,

    /// Administrator id (admin)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_admin: Option<String>,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: u64,

    /// Expiration time (Unix timestamp)
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Create claims with no subject id, valid from now for `expiration_secs`.
    pub fn new(role: &str, email: &str, expiration_secs: u64) -> Self {
        let now = get_current_timestamp();

        Self {
            role: role.to_string(),
            nim: None,
            nip: None,
            id_koordinator: None,
            id_admin: None,
            email: email.to_string(),
            iat: now,
            exp: now + expiration_secs,
            iss: None,
            aud: None,
        }
    }

    /// Create claims for a portal role with its subject id in the right field.
    pub fn for_role(role: Role, subject_id: &str, email: &str, expiration_secs: u64) -> Self {
        let claims = Self::new(role.as_str(), email, expiration_secs);
        match role {
            Role::Mahasiswa => claims.nim(subject_id),
            Role::DosenPembimbing => claims.nip(subject_id),
            Role::KoorMbkm => claims.id_koordinator(subject_id),
            Role::Admin => claims.id_admin(subject_id),
        }
    }

    pub fn nim(mut self, nim: &str) -> Self {
        self.nim = Some(nim.to_string());
        self
    }

    pub fn nip(mut self, nip: &str) -> Self {
        self.nip = Some(nip.to_string());
        self
    }

    pub fn id_koordinator(mut self, id: &str) -> Self {
        self.id_koordinator = Some(id.to_string());
        self
    }

    pub fn id_admin(mut self, id: &str) -> Self {
        self.id_admin = Some(id.to_string());
        self
    }

    /// Set the issued-at and expiration timestamps explicitly.
    pub fn validity(mut self, iat: u64, exp: u64) -> Self {
        self.iat = iat;
        self.exp = exp;
        self
    }

    /// Returns the role if it is one of the portal roles.
    pub fn known_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    fn subject_ids(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("nim", self.nim.as_deref()),
            ("nip", self.nip.as_deref()),
            ("id_koordinator", self.id_koordinator.as_deref()),
            ("id_admin", self.id_admin.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.filter(|v| !v.is_empty()).map(|v| (key, v)))
    }

    /// Returns the populated subject-id claim as `(key, value)`.
    ///
    /// `None` when zero or several subject ids are populated.
    pub fn subject(&self) -> Option<(&'static str, &str)> {
        let mut ids = self.subject_ids();
        let first = ids.next()?;
        match ids.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    /// Check the single-role, single-subject invariant.
    pub fn validate(&self) -> Result<(), GateError> {
        if self.role.is_empty() {
            return Err(GateError::MalformedToken);
        }

        let (key, _) = self.subject().ok_or(GateError::MalformedToken)?;

        match self.known_role() {
            Some(role) if role.subject_claim() != key => Err(GateError::MalformedToken),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Verification key
// =============================================================================

/// Where the shared HMAC secret comes from.
///
/// Serialized as `{"env": "VAR"}` or `{"secret": "..."}`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    /// Read from an environment variable at load time
    Env(String),
    /// Inline secret (tests and local development)
    Secret(String),
}

impl KeySource {
    /// Load the key. Missing or empty secrets yield `KeyUnavailable`.
    pub fn load(&self) -> Result<VerificationKey, GateError> {
        let secret = match self {
            KeySource::Env(var) => std::env::var(var).map_err(|_| GateError::KeyUnavailable)?,
            KeySource::Secret(secret) => secret.clone(),
        };

        if secret.is_empty() {
            return Err(GateError::KeyUnavailable);
        }

        Ok(VerificationKey {
            secret: secret.into_bytes(),
        })
    }
}

impl Default for KeySource {
    fn default() -> Self {
        KeySource::Env(DEFAULT_KEY_ENV.to_string())
    }
}

impl fmt::Debug for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Env(var) => f.debug_tuple("Env").field(var).finish(),
            KeySource::Secret(_) => f.write_str("Secret(<redacted>)"),
        }
    }
}

/// A loaded HMAC secret.
#[derive(Clone)]
pub struct VerificationKey {
    secret: Vec<u8>,
}

impl VerificationKey {
    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationKey(<redacted>)")
    }
}

// =============================================================================
// Credential Configuration
// =============================================================================

/// Credential configuration.
///
/// # Example
/// ```rust,ignore
/// let config = CredentialConfig::with_secret("my-secret-key")
///     .algorithm(Algorithm::HS512)
///     .issuer("mbkm-auth")
///     .cookie_name("token")
///     .bearer_header(true);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Source of the shared secret
    pub key: KeySource,
    /// Signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    /// Expected issuer
    pub issuer: Option<String>,
    /// Expected audience
    pub audience: Option<String>,
    /// Leeway for expiration validation (seconds)
    pub leeway_secs: u64,
    /// Cookie carrying the credential
    pub cookie_name: String,
    /// Also accept `Authorization: Bearer <token>`
    pub bearer_header: bool,
}

impl CredentialConfig {
    pub fn new(key: KeySource) -> Self {
        Self {
            key,
            algorithm: Algorithm::HS256,
            issuer: None,
            audience: None,
            leeway_secs: 0,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            bearer_header: false,
        }
    }

    /// Configuration with an inline secret.
    pub fn with_secret(secret: &str) -> Self {
        Self::new(KeySource::Secret(secret.to_string()))
    }

    /// Configuration reading the secret from `var` when the key is loaded.
    pub fn from_env(var: &str) -> Self {
        Self::new(KeySource::Env(var.to_string()))
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    pub fn audience(mut self, audience: &str) -> Self {
        self.audience = Some(audience.to_string());
        self
    }

    pub fn leeway_secs(mut self, secs: u64) -> Self {
        self.leeway_secs = secs;
        self
    }

    pub fn cookie_name(mut self, name: &str) -> Self {
        self.cookie_name = name.to_string();
        self
    }

    pub fn bearer_header(mut self, enabled: bool) -> Self {
        self.bearer_header = enabled;
        self
    }

    /// Check if this config uses an HMAC algorithm.
    pub fn is_hmac(&self) -> bool {
        matches!(
            self.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        )
    }

    fn load_key(&self) -> Result<VerificationKey, GateError> {
        if !self.is_hmac() {
            return Err(GateError::KeyUnavailable);
        }
        self.key.load()
    }
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self::new(KeySource::default())
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Parse a credential without checking its signature or expiry.
///
/// Never feed the result into an access decision: anyone can forge a token that
/// passes this function.
pub fn decode_unverified(token: &str) -> Result<Claims, GateError> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    data.claims.validate()?;
    Ok(data.claims)
}

/// Verifies credentials against the server-held key.
///
/// The key is loaded once when the decoder is built. A decoder whose key could
/// not be loaded rejects every credential with `KeyUnavailable`.
#[derive(Debug, Clone)]
pub struct CredentialDecoder {
    config: CredentialConfig,
    key: Option<VerificationKey>,
}

impl CredentialDecoder {
    pub fn new(config: CredentialConfig) -> Self {
        let key = match config.load_key() {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::error!(
                    key_source = ?config.key,
                    algorithm = ?config.algorithm,
                    error = %err,
                    "credential verification key unavailable, rejecting all credentials"
                );
                None
            }
        };

        Self { config, key }
    }

    pub fn config(&self) -> &CredentialConfig {
        &self.config
    }

    /// Returns true when the verification key was loaded.
    pub fn has_key(&self) -> bool {
        self.key.is_some()
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.config.algorithm);
        validation.leeway = self.config.leeway_secs;

        if let Some(ref issuer) = self.config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match self.config.audience {
            Some(ref audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        validation
    }

    /// Verify signature and expiry, then return the claims.
    pub fn verify_and_decode(&self, token: &str) -> Result<Claims, GateError> {
        let key = self.key.as_ref().ok_or(GateError::KeyUnavailable)?;

        let data = decode::<Claims>(token, &key.decoding_key(), &self.validation())?;
        data.claims.validate()?;
        Ok(data.claims)
    }

    /// Parse without verification. See [`decode_unverified`].
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, GateError> {
        decode_unverified(token)
    }
}

// =============================================================================
// Issuer
// =============================================================================

/// Signs credentials with the shared key.
///
/// The portal's auth service is the real issuer; this type exists for the
/// development sign-in endpoint and for tests.
///
/// # Example
/// ```rust,ignore
/// let issuer = CredentialIssuer::new(config)?.expiration_hours(8);
/// let token = issuer.issue_for(Role::Mahasiswa, "2010511001", "budi@upnvj.ac.id")?;
/// ```
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    config: CredentialConfig,
    key: VerificationKey,
    expiration_secs: u64,
}

impl CredentialIssuer {
    pub fn new(config: CredentialConfig) -> Result<Self, GateError> {
        let key = config.load_key()?;
        Ok(Self {
            config,
            key,
            expiration_secs: 3600,
        })
    }

    pub fn expiration_secs(mut self, secs: u64) -> Self {
        self.expiration_secs = secs;
        self
    }

    pub fn expiration_hours(mut self, hours: u64) -> Self {
        self.expiration_secs = hours * 3600;
        self
    }

    pub fn get_expiration_secs(&self) -> u64 {
        self.expiration_secs
    }

    /// Sign the given claims. Configured issuer and audience are filled in when
    /// the claims leave them unset.
    pub fn issue(&self, claims: &Claims) -> Result<String, GateError> {
        claims.validate()?;

        let mut claims = claims.clone();
        if claims.iss.is_none() {
            claims.iss = self.config.issuer.clone();
        }
        if claims.aud.is_none() {
            claims.aud = self.config.audience.clone();
        }

        let header = Header::new(self.config.algorithm);
        encode(&header, &claims, &self.key.encoding_key()).map_err(GateError::from)
    }

    /// Issue a fresh credential for a portal role.
    pub fn issue_for(&self, role: Role, subject_id: &str, email: &str) -> Result<String, GateError> {
        self.issue(&Claims::for_role(role, subject_id, email, self.expiration_secs))
    }
}
