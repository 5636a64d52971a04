//! Roles of the MBKM portal.

use std::fmt;
use std::str::FromStr;

/// The closed set of roles the auth service issues credentials for.
///
/// Role claims are kept as plain strings in [`Claims`](super::Claims) so that a
/// credential carrying a role this build does not know about still verifies
/// and is then treated as zero-access by the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Student taking part in a program
    Mahasiswa,
    /// Supervising lecturer
    DosenPembimbing,
    /// MBKM program coordinator
    KoorMbkm,
    /// Portal administrator
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Mahasiswa,
        Role::DosenPembimbing,
        Role::KoorMbkm,
        Role::Admin,
    ];

    /// Returns the identifier used in the `role` claim.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Mahasiswa => "mahasiswa",
            Role::DosenPembimbing => "dosen_pembimbing",
            Role::KoorMbkm => "koor_mbkm",
            Role::Admin => "admin",
        }
    }

    /// Returns the claim key holding the subject identifier for this role.
    pub fn subject_claim(&self) -> &'static str {
        match self {
            Role::Mahasiswa => "nim",
            Role::DosenPembimbing => "nip",
            Role::KoorMbkm => "id_koordinator",
            Role::Admin => "id_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the portal roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .find(|role| role.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
