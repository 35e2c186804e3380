use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Closed set of platform roles.
///
/// Accepted case-insensitively on input (request bodies, token payloads),
/// always serialized and compared in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Student,
    Patient,
    Staff,
    Nurse,
    MentalHealthCounselor,
    FinancialController,
    ExecutiveDirector,
    Admin,
}

impl Role {
    pub const ALL: &'static [Role] = &[
        Role::Student,
        Role::Patient,
        Role::Staff,
        Role::Nurse,
        Role::MentalHealthCounselor,
        Role::FinancialController,
        Role::ExecutiveDirector,
        Role::Admin,
    ];

    /// Canonical lowercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Patient => "patient",
            Role::Staff => "staff",
            Role::Nurse => "nurse",
            Role::MentalHealthCounselor => "mental health counselor",
            Role::FinancialController => "financial controller",
            Role::ExecutiveDirector => "executive director",
            Role::Admin => "admin",
        }
    }

    /// Roles that carry an embedded staff profile.
    pub fn is_staff_like(&self) -> bool {
        matches!(
            self,
            Role::Staff
                | Role::Nurse
                | Role::MentalHealthCounselor
                | Role::FinancialController
                | Role::ExecutiveDirector
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Role::ALL
            .iter()
            .find(|r| r.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("'{}' is not a valid role", s))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
