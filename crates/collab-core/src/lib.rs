//! Collab Core - the collaboration platform facade
//!
//! Wires the stores, the access resolver, the permission engine and the
//! onboarding store into one [`CollabPlatform`]:
//! - Loads [`PlatformConfig`] from TOML or YAML
//! - Seeds stores from a JSON or YAML [`Dataset`]
//! - Answers visibility, permission and onboarding requests
//!
//! # Example
//!
//! ```rust
//! use collab_core::{CollabPlatform, Dataset, PlatformConfig};
//! use collab_model::{Principal, Project, Role};
//! use collab_permissions::{AccessLevel, Module};
//!
//! let mut dataset = Dataset::new();
//! dataset.projects.push(Project::new("p-1", "Apollo"));
//! dataset
//!     .principals
//!     .push(Principal::new("u-0", "Root", "root@example.com", Role::Admin));
//!
//! let platform = CollabPlatform::with_dataset(PlatformConfig::new(), dataset)?;
//! let view = platform.resolve_view_for_email("root@example.com")?;
//!
//! assert_eq!(view.projects.len(), 1);
//! assert_eq!(platform.access_for(Role::Admin, Module::Settings), AccessLevel::FullControl);
//! # Ok::<(), collab_core::CollabError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod format;
pub mod platform;

pub use config::{LogConfig, PlatformConfig};
pub use dataset::Dataset;
pub use error::{CollabError, ConfigError};
pub use format::FileFormat;
pub use platform::{CollabPlatform, LoadSummary};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the platform
    pub use crate::{CollabError, CollabPlatform, Dataset, PlatformConfig};
    pub use collab_access::{ProjectMatch, ResolvedView};
    pub use collab_model::{CustomerId, Principal, Role};
    pub use collab_onboarding::{Creator, DataSection, PhaseId};
    pub use collab_permissions::{AccessLevel, Capability, Module};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
