//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RoleParseError;

/// Privilege level of an account.
///
/// Serialised as `"Admin"` or `"User"`. Any other stored value reads as
/// [`Role::User`], so a hand-edited role never makes the user document
/// unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// May manage accounts and train data.
    Admin,
    /// Ordinary kiosk account.
    #[default]
    User,
}

impl Role {
    /// Stored spelling of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::User => "User",
        }
    }

    /// The other role.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Admin => Self::User,
            Self::User => Self::Admin,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let stored = String::deserialize(deserializer)?;
        if stored == Self::Admin.as_str() {
            Ok(Self::Admin)
        } else {
            Ok(Self::User)
        }
    }
}

/// Parses operator input; unlike the stored form this is case-insensitive
/// and strict.
impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(RoleParseError {
                value: s.to_owned(),
            }),
        }
    }
}
