//! Collab Model
//!
//! Domain types shared by every other crate in the workspace:
//! - [`Principal`] and [`Role`]: the authenticated actor
//! - [`Workspace`]: structural project ↔ customer ↔ team binding
//! - [`Project`], [`CustomerAction`], [`Feedback`]: activity records carrying
//!   legacy name-based assignment fields
//!
//! # Example
//!
//! ```rust
//! use collab_model::{Principal, Role};
//!
//! let alice = Principal::new("u-1", "Alice", "alice@example.com", Role::Sales)
//!     .with_linking_id("tm-1");
//! assert_eq!(alice.linking_id.as_ref().map(|l| l.as_str()), Some("tm-1"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod ids;
pub mod principal;
pub mod project;
pub mod workspace;

pub use ids::{
    ActionId, CustomerId, FeedbackId, LinkingId, PrincipalId, ProjectId, TeamMemberId,
    WorkspaceId,
};
pub use principal::{Principal, Role, RoleParseError};
pub use project::{Budget, CustomerAction, Feedback, Project};
pub use workspace::{Assignment, TeamMemberRef, Workspace};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
