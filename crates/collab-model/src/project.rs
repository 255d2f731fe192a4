//! Projects and the activity attached to them
//!
//! `client_contact`, `assigned_sales` and `assigned_tech` are names, not ids.
//! They predate workspaces and only drive the legacy visibility fallback.

use crate::ids::{ActionId, FeedbackId, ProjectId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Project budget figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Approved budget
    #[serde(default)]
    pub approved: String,
    /// Current spend/forecast
    #[serde(default)]
    pub current: String,
    /// Impact of pending change requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_impact: Option<String>,
}

/// Project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project id
    pub id: ProjectId,
    /// Project name
    pub name: String,
    /// Customer contact name (legacy)
    #[serde(default)]
    pub client_contact: String,
    /// Sales person name (legacy)
    #[serde(default)]
    pub assigned_sales: String,
    /// Consultant name (legacy)
    #[serde(default)]
    pub assigned_consultant: String,
    /// Tech team names (legacy)
    #[serde(default)]
    pub assigned_tech: Vec<String>,
    /// Budget
    #[serde(default)]
    pub budget: Budget,
    /// Free-form status label
    #[serde(default)]
    pub status: String,
    /// Attributes this crate does not model
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Project {
    /// Create project with empty legacy fields
    #[must_use]
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            client_contact: String::new(),
            assigned_sales: String::new(),
            assigned_consultant: String::new(),
            assigned_tech: Vec::new(),
            budget: Budget::default(),
            status: String::new(),
            extra: IndexMap::new(),
        }
    }

    /// With client contact name
    #[inline]
    #[must_use]
    pub fn with_client_contact(mut self, name: impl Into<String>) -> Self {
        self.client_contact = name.into();
        self
    }

    /// With sales person name
    #[inline]
    #[must_use]
    pub fn with_assigned_sales(mut self, name: impl Into<String>) -> Self {
        self.assigned_sales = name.into();
        self
    }

    /// With consultant name
    #[inline]
    #[must_use]
    pub fn with_assigned_consultant(mut self, name: impl Into<String>) -> Self {
        self.assigned_consultant = name.into();
        self
    }

    /// With an additional tech team name
    #[inline]
    #[must_use]
    pub fn with_assigned_tech(mut self, name: impl Into<String>) -> Self {
        self.assigned_tech.push(name.into());
        self
    }

    /// With budget
    #[inline]
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }
}

/// Action requested from a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAction {
    /// Action id
    pub id: ActionId,
    /// Owning project
    pub project_id: ProjectId,
    /// Short title
    #[serde(default)]
    pub title: String,
    /// Status label
    #[serde(default)]
    pub status: String,
    /// Attributes this crate does not model
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl CustomerAction {
    /// Create action
    #[must_use]
    pub fn new(
        id: impl Into<ActionId>,
        project_id: impl Into<ProjectId>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            title: title.into(),
            status: String::new(),
            extra: IndexMap::new(),
        }
    }
}

/// Feedback item on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    /// Feedback id
    pub id: FeedbackId,
    /// Owning project
    pub project_id: ProjectId,
    /// Author name
    #[serde(default)]
    pub author: String,
    /// Message body
    #[serde(default)]
    pub message: String,
    /// Attributes this crate does not model
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Feedback {
    /// Create feedback item
    #[must_use]
    pub fn new(
        id: impl Into<FeedbackId>,
        project_id: impl Into<ProjectId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            author: String::new(),
            message: message.into(),
            extra: IndexMap::new(),
        }
    }
}
