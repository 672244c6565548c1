//! User roles as reported by the authentication service.

use serde::{Deserialize, Serialize};

/// Role attached to a session.
///
/// The signin response carries a list of role names; the first entry wins.
/// Unknown or absent values fall back to [`Role::User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular shopper.
    #[default]
    User,
    /// Elevated role allowed to manage the product catalog.
    Admin,
}

impl Role {
    /// Whether this role may use the admin product editor.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Parse a role name from the signin response, defaulting to `User`.
    #[must_use]
    pub fn from_role_name(name: &str) -> Self {
        match name {
            "ADMIN" => Self::Admin,
            _ => Self::User,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "USER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
