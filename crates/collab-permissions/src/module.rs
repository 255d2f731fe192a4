//! Functional modules of the platform

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Functional module gated by the matrices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    /// Landing dashboard
    Dashboard,
    /// Project list and details
    Projects,
    /// Workspace assignments
    Workspaces,
    /// Customer onboarding dossiers
    Onboarding,
    /// Actions requested from customers
    CustomerActions,
    /// Project feedback
    Feedback,
    /// Scope change requests
    ChangeRequests,
    /// Budget figures
    Budget,
    /// Shared documents
    Documents,
    /// Team roster
    Team,
    /// Reporting
    Reports,
    /// Platform settings
    Settings,
}

impl Module {
    /// Every module
    pub const ALL: [Module; 12] = [
        Module::Dashboard,
        Module::Projects,
        Module::Workspaces,
        Module::Onboarding,
        Module::CustomerActions,
        Module::Feedback,
        Module::ChangeRequests,
        Module::Budget,
        Module::Documents,
        Module::Team,
        Module::Reports,
        Module::Settings,
    ];

    /// Snake-case module name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Module::Dashboard => "dashboard",
            Module::Projects => "projects",
            Module::Workspaces => "workspaces",
            Module::Onboarding => "onboarding",
            Module::CustomerActions => "customer_actions",
            Module::Feedback => "feedback",
            Module::ChangeRequests => "change_requests",
            Module::Budget => "budget",
            Module::Documents => "documents",
            Module::Team => "team",
            Module::Reports => "reports",
            Module::Settings => "settings",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown module name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown module: {0}")]
pub struct ModuleParseError(pub String);

impl FromStr for Module {
    type Err = ModuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Module::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| ModuleParseError(s.to_string()))
    }
}
