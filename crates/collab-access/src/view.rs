//! Resolved view types

use collab_model::{CustomerAction, Feedback, Project, Workspace, WorkspaceId};
use collab_onboarding::{OnboardingData, OnboardingDossier};
use serde::{Deserialize, Serialize};

/// Why a project is visible
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ProjectMatch {
    /// Linked through a visible workspace
    #[serde(rename_all = "camelCase")]
    Structural {
        /// First visible workspace that matched
        workspace_id: WorkspaceId,
    },
    /// Matched by a legacy name rule only
    LegacyName,
    /// Role sees every project
    Unrestricted,
}

impl ProjectMatch {
    /// Whether the project is linked through a workspace
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, ProjectMatch::Structural { .. })
    }
}

/// A visible project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    /// Project, with budget merged for customers
    #[serde(flatten)]
    pub project: Project,
    /// Visibility reason
    #[serde(rename = "match")]
    pub matched_by: ProjectMatch,
    /// Customer intake data, on structurally matched customer projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_data: Option<OnboardingData>,
}

impl ProjectView {
    #[inline]
    pub(crate) fn new(project: Project, matched_by: ProjectMatch) -> Self {
        Self {
            project,
            matched_by,
            onboarding_data: None,
        }
    }
}

/// Everything a principal may see
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedView {
    /// Visible projects
    pub projects: Vec<ProjectView>,
    /// Visible workspaces
    pub workspaces: Vec<Workspace>,
    /// Actions on visible projects
    pub customer_actions: Vec<CustomerAction>,
    /// Feedback on visible projects
    pub feedback: Vec<Feedback>,
    /// The customer's own dossier
    pub onboarding: Option<OnboardingDossier>,
}

impl ResolvedView {
    /// View with nothing in it
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if nothing is visible
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.workspaces.is_empty()
            && self.customer_actions.is_empty()
            && self.feedback.is_empty()
            && self.onboarding.is_none()
    }

    /// Visible project by id
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&ProjectView> {
        self.projects.iter().find(|p| p.project.id.as_str() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_view_serializes_every_field() {
        let json = serde_json::to_value(ResolvedView::empty()).unwrap();
        for key in ["projects", "workspaces", "customerActions", "feedback", "onboarding"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["onboarding"].is_null());
    }

    #[test]
    fn project_view_flattens_project() {
        let view = ProjectView::new(
            Project::new("p-1", "Apollo"),
            ProjectMatch::Structural {
                workspace_id: "w-1".into(),
            },
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], "p-1");
        assert_eq!(json["match"]["kind"], "structural");
        assert_eq!(json["match"]["workspaceId"], "w-1");
        assert!(json.get("onboardingData").is_none());
    }
}
