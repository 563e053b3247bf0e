use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of account; decides which profile an account may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Donor,
    Orphanage,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Donor => "Donor",
            Role::Orphanage => "Orphanage",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role `{}`", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Donor" => Ok(Role::Donor),
            "Orphanage" => Ok(Role::Orphanage),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
