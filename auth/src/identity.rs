use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Account role.
///
/// Flat model: no hierarchy, one role per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for role parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown role: {0}")]
pub struct RoleError(pub String);

impl FromStr for Role {
    type Err = RoleError;

    /// Exact, case-sensitive match against the wire names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError(other.to_string())),
        }
    }
}

/// Identity of an authenticated caller.
///
/// Built only from a verified token whose username is non-empty. Request
/// handling carries it as `Option<Identity>`, where `None` means anonymous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    role: Role,
}

impl Identity {
    pub(crate) fn new(username: String, role: Role) -> Self {
        Self { username, role }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
