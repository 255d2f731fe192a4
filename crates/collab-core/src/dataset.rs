//! Seed data for the stores
//!
//! A dataset is one JSON or YAML document holding every record kind:
//!
//! ```json
//! {
//!   "principals": [{"id": "u-1", "name": "Ann", "email": "ann@acme.io", "role": "customer", "linkingId": "c-1"}],
//!   "projects": [{"id": "p-1", "name": "Apollo", "clientContact": "Acme"}],
//!   "customerActions": [],
//!   "feedback": [],
//!   "workspaces": [],
//!   "dossiers": []
//! }
//! ```

use crate::error::ConfigError;
use crate::format::{read_file, write_file};
use collab_model::{CustomerAction, Feedback, Principal, Project, Workspace};
use collab_onboarding::OnboardingDossier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Every record kind the platform stores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    /// Identity directory entries
    pub principals: Vec<Principal>,
    /// Projects
    pub projects: Vec<Project>,
    /// Customer actions
    pub customer_actions: Vec<CustomerAction>,
    /// Feedback items
    pub feedback: Vec<Feedback>,
    /// Workspaces
    pub workspaces: Vec<Workspace>,
    /// Archived onboarding dossiers
    pub dossiers: Vec<OnboardingDossier>,
}

impl Dataset {
    /// Create empty dataset
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file is unreadable or malformed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let dataset: Self = read_file(path)?;
        tracing::debug!(
            path = %path.display(),
            principals = dataset.principals.len(),
            projects = dataset.projects.len(),
            workspaces = dataset.workspaces.len(),
            dossiers = dataset.dossiers.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Write to a file, format by extension
    ///
    /// # Errors
    /// Returns error if the file cannot be written
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        write_file(path.as_ref(), self)
    }

    /// Total number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
            + self.projects.len()
            + self.customer_actions.len()
            + self.feedback.len()
            + self.workspaces.len()
            + self.dossiers.len()
    }

    /// Check if dataset holds no records
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_model::Role;

    #[test]
    fn missing_sections_default_to_empty() {
        let dataset: Dataset = serde_json::from_str(
            r#"{"principals":[{"id":"u-1","name":"Ann","email":"ann@acme.io","role":"customer","linkingId":"c-1"}]}"#,
        )
        .unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.principals[0].role, Role::Customer);
        assert!(dataset.projects.is_empty());
    }

    #[test]
    fn unknown_role_string_loads_as_unrecognized() {
        let dataset: Dataset = serde_yaml::from_str(
            "principals:\n  - id: u-9\n    name: Eve\n    email: eve@example.com\n    role: auditor\n",
        )
        .unwrap();
        assert_eq!(dataset.principals[0].role, Role::Unrecognized);
    }
}
