//! Collab Permissions
//!
//! Two independent static lookup tables:
//! - [`PermissionMatrix`]: `(Role, Module) → AccessLevel`
//! - [`CapabilityMatrix`]: `(Module, Role) → Capability`
//!
//! [`PermissionEngine`] answers both. A key missing from a table means
//! "no access" and resolves to the neutral default, never to an error.
//!
//! # Example
//!
//! ```rust
//! use collab_model::Role;
//! use collab_permissions::{AccessLevel, Capability, Module, PermissionEngine};
//!
//! let engine = PermissionEngine::new();
//! assert_eq!(engine.access_for(Role::Admin, Module::Settings), AccessLevel::FullControl);
//! assert_eq!(engine.access_for(Role::Customer, Module::Settings), AccessLevel::None);
//! assert_eq!(engine.capability_for(Module::ChangeRequests, Role::Customer), Capability::Submit);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod engine;
mod level;
mod matrix;
mod module;

pub use engine::{CapabilityOverride, PermissionEngine, PermissionOverride};
pub use level::{AccessLevel, Capability, LevelParseError};
pub use matrix::{default_capabilities, default_permissions, CapabilityMatrix, PermissionMatrix};
pub use module::{Module, ModuleParseError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
