//! Access levels and capabilities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Coarse role-to-module permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    /// No access
    #[default]
    None,
    /// Read only
    View,
    /// Read and write
    #[serde(alias = "create/edit")]
    CreateEdit,
    /// Everything, including administration
    FullControl,
}

impl AccessLevel {
    /// Whether the module may be shown at all
    #[inline]
    #[must_use]
    pub fn can_view(&self) -> bool {
        *self >= AccessLevel::View
    }

    /// Whether records may be created or edited
    #[inline]
    #[must_use]
    pub fn can_edit(&self) -> bool {
        *self >= AccessLevel::CreateEdit
    }

    /// Display label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::View => "view",
            AccessLevel::CreateEdit => "create/edit",
            AccessLevel::FullControl => "full_control",
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fine-grained module-specific permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// No capability; displayed as `—`
    #[default]
    #[serde(alias = "—")]
    None,
    /// Read only
    View,
    /// Create or edit
    #[serde(alias = "create/edit")]
    CreateEdit,
    /// Final approval
    Approve,
    /// Internal approval before the customer sees it
    ApproveInternal,
    /// Technical/content validation
    Validate,
    /// Submit for review
    Submit,
    /// Follow progress only
    TrackStatus,
    /// Provide input, no decisions
    InputOnly,
}

impl Capability {
    /// Every capability
    pub const ALL: [Capability; 9] = [
        Capability::None,
        Capability::View,
        Capability::CreateEdit,
        Capability::Approve,
        Capability::ApproveInternal,
        Capability::Validate,
        Capability::Submit,
        Capability::TrackStatus,
        Capability::InputOnly,
    ];

    /// Display label
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::None => "—",
            Capability::View => "view",
            Capability::CreateEdit => "create/edit",
            Capability::Approve => "approve",
            Capability::ApproveInternal => "approve_internal",
            Capability::Validate => "validate",
            Capability::Submit => "submit",
            Capability::TrackStatus => "track_status",
            Capability::InputOnly => "input_only",
        }
    }

    /// Whether the capability grants anything
    #[inline]
    #[must_use]
    pub fn is_granted(&self) -> bool {
        *self != Capability::None
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown access level or capability name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown level: {0}")]
pub struct LevelParseError(pub String);

impl FromStr for AccessLevel {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AccessLevel::None),
            "view" => Ok(AccessLevel::View),
            "create/edit" | "create_edit" => Ok(AccessLevel::CreateEdit),
            "full_control" => Ok(AccessLevel::FullControl),
            _ => Err(LevelParseError(s.to_string())),
        }
    }
}

impl FromStr for Capability {
    type Err = LevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "none" | "—" | "-" => Ok(Capability::None),
            "create_edit" => Ok(Capability::CreateEdit),
            other => Capability::ALL
                .into_iter()
                .find(|c| c.as_str() == other)
                .ok_or_else(|| LevelParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_ordered() {
        assert!(AccessLevel::FullControl.can_edit());
        assert!(AccessLevel::CreateEdit.can_edit());
        assert!(AccessLevel::View.can_view());
        assert!(!AccessLevel::View.can_edit());
        assert!(!AccessLevel::None.can_view());
    }

    #[test]
    fn capability_none_displays_as_dash() {
        assert_eq!(Capability::None.to_string(), "—");
        assert!(!Capability::None.is_granted());
        assert!(Capability::InputOnly.is_granted());
    }

    #[test]
    fn levels_parse_from_labels() {
        assert_eq!("create/edit".parse::<AccessLevel>().unwrap(), AccessLevel::CreateEdit);
        assert_eq!("—".parse::<Capability>().unwrap(), Capability::None);
        assert_eq!("approve_internal".parse::<Capability>().unwrap(), Capability::ApproveInternal);
        assert!("sometimes".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn serde_accepts_slash_alias() {
        let level: AccessLevel = serde_json::from_str("\"create/edit\"").unwrap();
        assert_eq!(level, AccessLevel::CreateEdit);
        assert_eq!(serde_json::to_string(&level).unwrap(), "\"create_edit\"");
    }
}
