//! Platform configuration
//!
//! Loaded from TOML or YAML. Every key is optional:
//!
//! ```toml
//! view_cache_capacity = 256
//!
//! [log]
//! filter = "collab=debug"
//! json = false
//!
//! [[permission_overrides]]
//! role = "tech"
//! module = "budget"
//! access = "view"
//! ```

use crate::error::ConfigError;
use crate::format::read_file;
use collab_access::DEFAULT_VIEW_CACHE_CAPACITY;
use collab_onboarding::PhaseCatalog;
use collab_permissions::{CapabilityOverride, PermissionOverride};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Platform configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformConfig {
    /// Onboarding phases
    pub phases: PhaseCatalog,
    /// Memoized views; `0` disables memoization
    pub view_cache_capacity: u64,
    /// Permission matrix entries replacing the built-in ones
    pub permission_overrides: Vec<PermissionOverride>,
    /// Capability matrix entries replacing the built-in ones
    pub capability_overrides: Vec<CapabilityOverride>,
    /// Logging
    pub log: LogConfig,
}

impl PlatformConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// Returns error if the file is unreadable, malformed or fails validation
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = read_file(path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), phases = config.phases.len(), "configuration loaded");
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` naming the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for o in &self.permission_overrides {
            if !seen.insert((o.role, o.module)) {
                return Err(ConfigError::Invalid(format!(
                    "permission override for {}/{} given twice",
                    o.role, o.module
                )));
            }
        }
        let mut seen = HashSet::new();
        for o in &self.capability_overrides {
            if !seen.insert((o.module, o.role)) {
                return Err(ConfigError::Invalid(format!(
                    "capability override for {}/{} given twice",
                    o.module, o.role
                )));
            }
        }
        if self.log.filter.trim().is_empty() {
            return Err(ConfigError::Invalid("log filter must not be empty".into()));
        }
        Ok(())
    }

    /// With phase catalog
    #[inline]
    #[must_use]
    pub fn with_phases(mut self, phases: PhaseCatalog) -> Self {
        self.phases = phases;
        self
    }

    /// With view cache capacity
    #[inline]
    #[must_use]
    pub fn with_view_cache_capacity(mut self, capacity: u64) -> Self {
        self.view_cache_capacity = capacity;
        self
    }

    /// With an additional permission override
    #[inline]
    #[must_use]
    pub fn with_permission_override(mut self, entry: PermissionOverride) -> Self {
        self.permission_overrides.push(entry);
        self
    }

    /// With an additional capability override
    #[inline]
    #[must_use]
    pub fn with_capability_override(mut self, entry: CapabilityOverride) -> Self {
        self.capability_overrides.push(entry);
        self
    }

    /// With logging configuration
    #[inline]
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            phases: PhaseCatalog::default(),
            view_cache_capacity: DEFAULT_VIEW_CACHE_CAPACITY,
            permission_overrides: Vec::new(),
            capability_overrides: Vec::new(),
            log: LogConfig::default(),
        }
    }
}

/// Logging configuration
///
/// `RUST_LOG`, when set, takes precedence over `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `tracing` filter directives
    pub filter: String,
    /// Emit JSON lines instead of text
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}
