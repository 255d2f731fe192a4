//! External stores read by the resolver
//!
//! Each store carries a revision that changes on every write, so readers can
//! key derived data on it.

use crate::error::RegistryError;
use collab_model::{CustomerAction, Feedback, Principal, Project, ProjectId, Workspace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Canonical projects, customer actions and feedback
#[derive(Debug, Default)]
pub struct ProjectStore {
    projects: RwLock<Vec<Project>>,
    actions: RwLock<Vec<CustomerAction>>,
    feedback: RwLock<Vec<Feedback>>,
    revision: AtomicU64,
}

impl ProjectStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store from existing records
    #[must_use]
    pub fn with_records(
        projects: Vec<Project>,
        actions: Vec<CustomerAction>,
        feedback: Vec<Feedback>,
    ) -> Self {
        Self {
            projects: RwLock::new(projects),
            actions: RwLock::new(actions),
            feedback: RwLock::new(feedback),
            revision: AtomicU64::new(0),
        }
    }

    /// Insert project, replacing one with the same id
    ///
    /// Returns the replaced project.
    pub fn upsert_project(&self, project: Project) -> Option<Project> {
        let mut projects = self.projects.write();
        let replaced = match projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => Some(std::mem::replace(slot, project)),
            None => {
                projects.push(project);
                None
            }
        };
        self.bump();
        replaced
    }

    /// Append a customer action
    pub fn add_action(&self, action: CustomerAction) {
        self.actions.write().push(action);
        self.bump();
    }

    /// Append a feedback item
    pub fn add_feedback(&self, feedback: Feedback) {
        self.feedback.write().push(feedback);
        self.bump();
    }

    /// Project by id
    #[must_use]
    pub fn get(&self, id: &ProjectId) -> Option<Project> {
        self.projects.read().iter().find(|p| &p.id == id).cloned()
    }

    /// All projects in insertion order
    #[must_use]
    pub fn list(&self) -> Vec<Project> {
        self.projects.read().clone()
    }

    /// All customer actions
    #[must_use]
    pub fn actions(&self) -> Vec<CustomerAction> {
        self.actions.read().clone()
    }

    /// All feedback
    #[must_use]
    pub fn feedback(&self) -> Vec<Feedback> {
        self.feedback.read().clone()
    }

    /// Number of projects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.read().len()
    }

    /// Check if store has no projects
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.read().is_empty()
    }

    /// Current revision
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }
}

/// Workspaces, at most one per project
#[derive(Debug, Default)]
pub struct WorkspaceRegistry {
    workspaces: RwLock<Vec<Workspace>>,
    revision: AtomicU64,
}

impl WorkspaceRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workspace
    ///
    /// # Errors
    /// - `RegistryError::DuplicateWorkspace` if the id is taken
    /// - `RegistryError::DuplicateProject` if the project already has one
    pub fn insert(&self, workspace: Workspace) -> Result<(), RegistryError> {
        let mut workspaces = self.workspaces.write();
        if workspaces.iter().any(|w| w.id == workspace.id) {
            return Err(RegistryError::DuplicateWorkspace(workspace.id));
        }
        if let Some(existing) = workspaces
            .iter()
            .find(|w| w.project_id == workspace.project_id)
        {
            return Err(RegistryError::DuplicateProject {
                project_id: workspace.project_id,
                existing: existing.id.clone(),
            });
        }
        tracing::debug!(workspace = %workspace.id, project = %workspace.project_id, "workspace registered");
        workspaces.push(workspace);
        drop(workspaces);
        self.revision.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Replace a workspace with the same id
    ///
    /// # Errors
    /// - `RegistryError::UnknownWorkspace` if no workspace has this id
    /// - `RegistryError::DuplicateProject` if rebinding to a project another
    ///   workspace holds
    pub fn replace(&self, workspace: Workspace) -> Result<Workspace, RegistryError> {
        let mut workspaces = self.workspaces.write();
        if let Some(other) = workspaces
            .iter()
            .find(|w| w.project_id == workspace.project_id && w.id != workspace.id)
        {
            return Err(RegistryError::DuplicateProject {
                project_id: workspace.project_id,
                existing: other.id.clone(),
            });
        }
        let slot = workspaces
            .iter_mut()
            .find(|w| w.id == workspace.id)
            .ok_or_else(|| RegistryError::UnknownWorkspace(workspace.id.clone()))?;
        let previous = std::mem::replace(slot, workspace);
        drop(workspaces);
        self.revision.fetch_add(1, Ordering::AcqRel);
        Ok(previous)
    }

    /// Workspace bound to a project
    #[must_use]
    pub fn for_project(&self, project_id: &ProjectId) -> Option<Workspace> {
        self.workspaces
            .read()
            .iter()
            .find(|w| &w.project_id == project_id)
            .cloned()
    }

    /// All workspaces in registration order
    #[must_use]
    pub fn list(&self) -> Vec<Workspace> {
        self.workspaces.read().clone()
    }

    /// Number of workspaces
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.workspaces.read().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.workspaces.read().is_empty()
    }

    /// Current revision
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

/// Email to principal lookup
///
/// Credentials are checked upstream; this only maps a login to its principal.
#[derive(Debug, Default)]
pub struct IdentityDirectory {
    by_email: RwLock<HashMap<String, Principal>>,
}

impl IdentityDirectory {
    /// Create empty directory
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a principal under its email
    ///
    /// # Errors
    /// `RegistryError::DuplicateEmail` if the email is taken
    pub fn register(&self, principal: Principal) -> Result<(), RegistryError> {
        let key = normalize_email(&principal.email);
        let mut by_email = self.by_email.write();
        if by_email.contains_key(&key) {
            return Err(RegistryError::DuplicateEmail(principal.email));
        }
        by_email.insert(key, principal);
        Ok(())
    }

    /// Principal for a login email, case-insensitive
    #[must_use]
    pub fn lookup(&self, email: &str) -> Option<Principal> {
        self.by_email.read().get(&normalize_email(email)).cloned()
    }

    /// All principals ordered by email
    #[must_use]
    pub fn list(&self) -> Vec<Principal> {
        let mut all: Vec<_> = self.by_email.read().values().cloned().collect();
        all.sort_by(|a, b| a.email.cmp(&b.email));
        all
    }

    /// Number of principals
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_email.read().len()
    }

    /// Check if directory is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_email.read().is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
