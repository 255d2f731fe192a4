//! Error types for the external stores
//!
//! View resolution itself never fails; only store writes can be refused.

use collab_model::{ProjectId, WorkspaceId};

/// Store write errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A workspace for this project already exists
    #[error("project {project_id} already bound to workspace {existing}")]
    DuplicateProject {
        /// Project being bound twice
        project_id: ProjectId,
        /// Workspace holding the binding
        existing: WorkspaceId,
    },

    /// Workspace id already taken
    #[error("workspace {0} already exists")]
    DuplicateWorkspace(WorkspaceId),

    /// Workspace to replace does not exist
    #[error("workspace {0} not found")]
    UnknownWorkspace(WorkspaceId),

    /// Login email registered twice
    #[error("email {0} already registered")]
    DuplicateEmail(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateProject {
            project_id: "p-1".into(),
            existing: "w-1".into(),
        };
        assert_eq!(err.to_string(), "project p-1 already bound to workspace w-1");
    }
}
