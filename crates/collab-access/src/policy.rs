//! Role visibility policy
//!
//! Visibility is decided in two independent steps, each an explicit rule
//! per role:
//!
//! | role         | workspace scope          | project visibility            |
//! |--------------|--------------------------|-------------------------------|
//! | customer     | `OwnCustomer`            | scoped, legacy `ClientContact` |
//! | sales        | `Assignment(Sales)`      | scoped, legacy `AssignedSales` |
//! | tech         | `Assignment(TechTeam)`   | scoped, legacy `AssignedTech`  |
//! | consultant   | `Assignment(Consultant)` | `Unrestricted`                |
//! | admin        | `All`                    | `Unrestricted`                |
//! | unrecognized | `Nothing`                | scoped, `NoFallback`          |
//!
//! Customers are identified by their linking id alone; without one they see
//! nothing, legacy rules included.
//!
//! Legacy rules compare names, not ids. They cover projects created before
//! workspaces existed and can be retired by switching a role to `NoFallback`.

use collab_model::{Assignment, Principal, Project, Role, TeamMemberId, Workspace};
use serde::{Deserialize, Serialize};

/// Assignment slot a team member must occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssignmentSlot {
    /// `assignment.sales`
    Sales,
    /// `assignment.consultant`
    Consultant,
    /// Membership in `assignment.techTeam`
    TechTeam,
}

impl AssignmentSlot {
    /// Whether `member` occupies this slot
    #[inline]
    #[must_use]
    pub fn holds(&self, assignment: &Assignment, member: &TeamMemberId) -> bool {
        match self {
            AssignmentSlot::Sales => assignment.has_sales(member),
            AssignmentSlot::Consultant => assignment.has_consultant(member),
            AssignmentSlot::TechTeam => assignment.has_tech(member),
        }
    }
}

/// Which workspaces a role sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "slot")]
pub enum WorkspaceScope {
    /// Every workspace
    All,
    /// Workspaces bound to the principal's customer record
    OwnCustomer,
    /// Workspaces where the principal occupies the slot
    Assignment(AssignmentSlot),
    /// None
    Nothing,
}

impl WorkspaceScope {
    /// Whether `workspace` is in scope for `principal`
    ///
    /// Every scope except `All` needs a linking id.
    #[must_use]
    pub fn admits(&self, principal: &Principal, workspace: &Workspace) -> bool {
        let link = principal.linking_id.as_ref();
        match self {
            WorkspaceScope::All => true,
            WorkspaceScope::OwnCustomer => link.is_some_and(|l| *l == workspace.customer_id),
            WorkspaceScope::Assignment(slot) => {
                link.is_some_and(|l| slot.holds(&workspace.assignment, &l.as_team_member()))
            }
            WorkspaceScope::Nothing => false,
        }
    }
}

/// Legacy name-based project rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegacyRule {
    /// `project.clientContact == principal.name`
    ClientContact,
    /// `project.assignedSales == principal.name`
    AssignedSales,
    /// `principal.name ∈ project.assignedTech`
    AssignedTech,
    /// Legacy matching disabled
    NoFallback,
}

impl LegacyRule {
    /// Whether the rule admits `project` for `principal`
    ///
    /// Blank names never match.
    #[must_use]
    pub fn matches(&self, principal: &Principal, project: &Project) -> bool {
        let name = principal.name.as_str();
        if name.trim().is_empty() {
            return false;
        }
        match self {
            LegacyRule::ClientContact => project.client_contact == name,
            LegacyRule::AssignedSales => project.assigned_sales == name,
            LegacyRule::AssignedTech => project.assigned_tech.iter().any(|t| t == name),
            LegacyRule::NoFallback => false,
        }
    }
}

/// Which projects a role sees beyond structural matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ProjectVisibility {
    /// Every project
    Unrestricted,
    /// Structurally matched projects plus the legacy rule
    ScopedToAssignment {
        /// Fallback for unlinked projects
        legacy: LegacyRule,
    },
}

/// Visibility rules of one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityPolicy {
    /// Step 1 rule
    pub workspaces: WorkspaceScope,
    /// Step 2 rule
    pub projects: ProjectVisibility,
    /// Principal without a linking id sees nothing at all
    pub requires_link: bool,
}

impl VisibilityPolicy {
    /// Policy for a role
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        let (workspaces, projects) = match role {
            Role::Customer => (
                WorkspaceScope::OwnCustomer,
                ProjectVisibility::ScopedToAssignment {
                    legacy: LegacyRule::ClientContact,
                },
            ),
            Role::Sales => (
                WorkspaceScope::Assignment(AssignmentSlot::Sales),
                ProjectVisibility::ScopedToAssignment {
                    legacy: LegacyRule::AssignedSales,
                },
            ),
            Role::Tech => (
                WorkspaceScope::Assignment(AssignmentSlot::TechTeam),
                ProjectVisibility::ScopedToAssignment {
                    legacy: LegacyRule::AssignedTech,
                },
            ),
            Role::Consultant => (
                WorkspaceScope::Assignment(AssignmentSlot::Consultant),
                ProjectVisibility::Unrestricted,
            ),
            Role::Admin => (WorkspaceScope::All, ProjectVisibility::Unrestricted),
            Role::Unrecognized => (
                WorkspaceScope::Nothing,
                ProjectVisibility::ScopedToAssignment {
                    legacy: LegacyRule::NoFallback,
                },
            ),
        };
        Self {
            workspaces,
            projects,
            requires_link: role == Role::Customer,
        }
    }

    /// Whether projects outside the structural match are visible at all
    #[inline]
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self.projects, ProjectVisibility::Unrestricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_model::TeamMemberRef;

    fn ws() -> Workspace {
        Workspace::new("w-1", "p-1", "Apollo", "c-1", "Acme")
            .with_sales(TeamMemberRef::new("tm-s", "Sam"))
            .with_consultant(TeamMemberRef::new("tm-c", "Cleo"))
            .with_tech(TeamMemberRef::new("tm-t", "Tia"))
    }

    #[test]
    fn policy_table() {
        assert_eq!(
            VisibilityPolicy::for_role(Role::Admin),
            VisibilityPolicy {
                workspaces: WorkspaceScope::All,
                projects: ProjectVisibility::Unrestricted,
                requires_link: false,
            }
        );
        assert!(VisibilityPolicy::for_role(Role::Customer).requires_link);
        assert!(!VisibilityPolicy::for_role(Role::Tech).requires_link);
        assert!(VisibilityPolicy::for_role(Role::Consultant).is_unrestricted());
        assert!(!VisibilityPolicy::for_role(Role::Sales).is_unrestricted());
        assert_eq!(
            VisibilityPolicy::for_role(Role::Unrecognized).workspaces,
            WorkspaceScope::Nothing
        );
    }

    #[test]
    fn scope_needs_linking_id() {
        let workspace = ws();
        let anon = Principal::new("u-1", "Sam", "sam@example.com", Role::Sales);
        assert!(!WorkspaceScope::Assignment(AssignmentSlot::Sales).admits(&anon, &workspace));
        assert!(!WorkspaceScope::OwnCustomer.admits(&anon, &workspace));
        assert!(WorkspaceScope::All.admits(&anon, &workspace));
    }

    #[test]
    fn scope_checks_the_right_slot() {
        let workspace = ws();
        let sam = Principal::new("u-1", "Sam", "sam@example.com", Role::Sales)
            .with_linking_id("tm-s");
        let tia = Principal::new("u-2", "Tia", "tia@example.com", Role::Tech)
            .with_linking_id("tm-t");

        assert!(WorkspaceScope::Assignment(AssignmentSlot::Sales).admits(&sam, &workspace));
        assert!(!WorkspaceScope::Assignment(AssignmentSlot::TechTeam).admits(&sam, &workspace));
        assert!(WorkspaceScope::Assignment(AssignmentSlot::TechTeam).admits(&tia, &workspace));
        assert!(!WorkspaceScope::Assignment(AssignmentSlot::Consultant).admits(&tia, &workspace));
    }

    #[test]
    fn customer_scope_compares_customer_id() {
        let workspace = ws();
        let own = Principal::new("u-3", "Ann", "ann@acme.io", Role::Customer).with_linking_id("c-1");
        let other =
            Principal::new("u-4", "Bob", "bob@other.io", Role::Customer).with_linking_id("c-2");
        assert!(WorkspaceScope::OwnCustomer.admits(&own, &workspace));
        assert!(!WorkspaceScope::OwnCustomer.admits(&other, &workspace));
    }

    #[test]
    fn legacy_rules_compare_names() {
        let project = Project::new("p-9", "Legacy")
            .with_client_contact("Ann")
            .with_assigned_sales("Sam")
            .with_assigned_tech("Tia");
        let ann = Principal::new("u-3", "Ann", "ann@acme.io", Role::Customer);
        let tia = Principal::new("u-2", "Tia", "tia@example.com", Role::Tech);

        assert!(LegacyRule::ClientContact.matches(&ann, &project));
        assert!(!LegacyRule::AssignedSales.matches(&ann, &project));
        assert!(LegacyRule::AssignedTech.matches(&tia, &project));
        assert!(!LegacyRule::NoFallback.matches(&tia, &project));
    }

    #[test]
    fn blank_name_never_matches_legacy_fields() {
        let project = Project::new("p-9", "Legacy");
        let blank = Principal::new("u-5", "", "x@example.com", Role::Customer);
        assert!(!LegacyRule::ClientContact.matches(&blank, &project));
    }
}
