//! Workspaces: the structural link between a project, a customer and a team

use crate::ids::{CustomerId, ProjectId, TeamMemberId, WorkspaceId};
use serde::{Deserialize, Serialize};

/// Reference to a team member
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamMemberRef {
    /// Team member id
    pub id: TeamMemberId,
    /// Display name
    pub name: String,
}

impl TeamMemberRef {
    /// Create team member reference
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<TeamMemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Team roster assigned to a workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Responsible sales person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales: Option<TeamMemberRef>,
    /// Responsible consultant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consultant: Option<TeamMemberRef>,
    /// Technical team
    #[serde(default)]
    pub tech_team: Vec<TeamMemberRef>,
}

impl Assignment {
    /// Whether the sales slot holds `member`
    #[inline]
    #[must_use]
    pub fn has_sales(&self, member: &TeamMemberId) -> bool {
        self.sales.as_ref().is_some_and(|s| &s.id == member)
    }

    /// Whether the consultant slot holds `member`
    #[inline]
    #[must_use]
    pub fn has_consultant(&self, member: &TeamMemberId) -> bool {
        self.consultant.as_ref().is_some_and(|c| &c.id == member)
    }

    /// Whether `member` is on the tech team
    #[inline]
    #[must_use]
    pub fn has_tech(&self, member: &TeamMemberId) -> bool {
        self.tech_team.iter().any(|t| &t.id == member)
    }
}

/// Project ↔ customer ↔ team binding
///
/// The registry holds at most one workspace per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Workspace id
    pub id: WorkspaceId,
    /// Bound project
    pub project_id: ProjectId,
    /// Project name at binding time (structural match key)
    pub project_name: String,
    /// Bound customer
    pub customer_id: CustomerId,
    /// Customer name at binding time (structural match key)
    pub customer_name: String,
    /// Team roster
    #[serde(default)]
    pub assignment: Assignment,
}

impl Workspace {
    /// Create workspace with an empty roster
    #[must_use]
    pub fn new(
        id: impl Into<WorkspaceId>,
        project_id: impl Into<ProjectId>,
        project_name: impl Into<String>,
        customer_id: impl Into<CustomerId>,
        customer_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            project_name: project_name.into(),
            customer_id: customer_id.into(),
            customer_name: customer_name.into(),
            assignment: Assignment::default(),
        }
    }

    /// With sales person
    #[inline]
    #[must_use]
    pub fn with_sales(mut self, member: TeamMemberRef) -> Self {
        self.assignment.sales = Some(member);
        self
    }

    /// With consultant
    #[inline]
    #[must_use]
    pub fn with_consultant(mut self, member: TeamMemberRef) -> Self {
        self.assignment.consultant = Some(member);
        self
    }

    /// With an additional tech team member
    #[inline]
    #[must_use]
    pub fn with_tech(mut self, member: TeamMemberRef) -> Self {
        self.assignment.tech_team.push(member);
        self
    }
}
