//! Collab Access
//!
//! Decides which workspaces, projects, customer actions and feedback a
//! principal may see. Resolution runs in four steps:
//!
//! 1. **Workspaces** in the role's [`WorkspaceScope`]
//! 2. **Projects** linked to a visible workspace, or admitted by the role's
//!    [`ProjectVisibility`] rule (tagged [`ProjectMatch`])
//! 3. **Activity** on visible projects
//! 4. **Onboarding merge** for customers: dossier budget and intake data on
//!    structurally linked projects
//!
//! Resolution never fails. Missing links produce empty results.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use collab_access::{AccessResolver, ProjectStore, WorkspaceRegistry};
//! use collab_model::{Principal, Project, Role};
//! use collab_onboarding::OnboardingStore;
//!
//! let projects = Arc::new(ProjectStore::new());
//! projects.upsert_project(Project::new("p-1", "Apollo"));
//!
//! let resolver = AccessResolver::new(
//!     projects,
//!     Arc::new(WorkspaceRegistry::new()),
//!     Arc::new(OnboardingStore::new()),
//! );
//!
//! let admin = Principal::new("u-0", "Root", "root@example.com", Role::Admin);
//! assert_eq!(resolver.resolve_view(&admin).projects.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod policy;
pub mod resolver;
pub mod stores;
pub mod view;

pub use error::RegistryError;
pub use policy::{AssignmentSlot, LegacyRule, ProjectVisibility, VisibilityPolicy, WorkspaceScope};
pub use resolver::{
    resolve, AccessResolver, CacheStats, DossierLookup, Records, DEFAULT_VIEW_CACHE_CAPACITY,
};
pub use stores::{IdentityDirectory, ProjectStore, WorkspaceRegistry};
pub use view::{ProjectMatch, ProjectView, ResolvedView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
