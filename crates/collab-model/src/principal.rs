//! Principals and roles

use crate::ids::{LinkingId, PrincipalId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Platform role of a principal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// External customer
    Customer,
    /// Sales team member
    Sales,
    /// Technical team member
    Tech,
    /// Consultant
    Consultant,
    /// Platform administrator
    Admin,
    /// Any role string the platform does not know
    #[serde(other)]
    Unrecognized,
}

impl Role {
    /// Every known role, in matrix order
    pub const KNOWN: [Role; 5] = [
        Role::Customer,
        Role::Sales,
        Role::Tech,
        Role::Consultant,
        Role::Admin,
    ];

    /// Lowercase role name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Sales => "sales",
            Role::Tech => "tech",
            Role::Consultant => "consultant",
            Role::Admin => "admin",
            Role::Unrecognized => "unrecognized",
        }
    }

    /// Whether the role belongs to internal staff
    #[inline]
    #[must_use]
    pub fn is_team_member(&self) -> bool {
        matches!(self, Role::Sales | Role::Tech | Role::Consultant)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct RoleParseError(pub String);

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "sales" => Ok(Role::Sales),
            "tech" => Ok(Role::Tech),
            "consultant" => Ok(Role::Consultant),
            "admin" => Ok(Role::Admin),
            _ => Err(RoleParseError(s.to_string())),
        }
    }
}

/// Authenticated actor
///
/// Resolved by the identity directory before it reaches this crate; nothing
/// here verifies credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Principal id
    pub id: PrincipalId,
    /// Display name, also used by legacy name matching
    pub name: String,
    /// Login email
    pub email: String,
    /// Role
    pub role: Role,
    /// Team member id or customer id, depending on role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linking_id: Option<LinkingId>,
}

impl Principal {
    /// Create principal without a linking id
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<PrincipalId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            linking_id: None,
        }
    }

    /// With linking id
    #[inline]
    #[must_use]
    pub fn with_linking_id(mut self, linking_id: impl Into<LinkingId>) -> Self {
        self.linking_id = Some(linking_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("Consultant".parse::<Role>().unwrap(), Role::Consultant);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn unknown_role_deserializes_as_unrecognized() {
        let role: Role = serde_json::from_str("\"janitor\"").unwrap();
        assert_eq!(role, Role::Unrecognized);

        let role: Role = serde_json::from_str("\"tech\"").unwrap();
        assert_eq!(role, Role::Tech);
    }

    #[test]
    fn principal_json_uses_camel_case() {
        let principal: Principal = serde_json::from_str(
            r#"{"id":"u-2","name":"Cara","email":"cara@acme.io","role":"customer","linkingId":"c-2"}"#,
        )
        .unwrap();

        assert_eq!(principal.role, Role::Customer);
        assert_eq!(principal.linking_id, Some(LinkingId::from("c-2")));
    }

    #[test]
    fn team_member_roles() {
        assert!(Role::Sales.is_team_member());
        assert!(!Role::Customer.is_team_member());
        assert!(!Role::Admin.is_team_member());
    }
}
