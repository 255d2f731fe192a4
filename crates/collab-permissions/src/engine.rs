//! Permission engine
//!
//! Pure lookups with safe defaults. Callers must read a miss as "no access".

use crate::level::{AccessLevel, Capability};
use crate::matrix::{default_capabilities, default_permissions, CapabilityMatrix, PermissionMatrix};
use crate::module::Module;
use collab_model::Role;
use serde::{Deserialize, Serialize};

/// Configured replacement for one permission matrix entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverride {
    /// Role
    pub role: Role,
    /// Module
    pub module: Module,
    /// Access level to grant
    pub access: AccessLevel,
}

/// Configured replacement for one capability matrix entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityOverride {
    /// Module
    pub module: Module,
    /// Role
    pub role: Role,
    /// Capability to grant
    pub capability: Capability,
}

/// Answers role/module permission questions
#[derive(Debug, Clone)]
pub struct PermissionEngine {
    permissions: PermissionMatrix,
    capabilities: CapabilityMatrix,
}

impl PermissionEngine {
    /// Create engine over the built-in matrices
    #[must_use]
    pub fn new() -> Self {
        Self::from_matrices(default_permissions().clone(), default_capabilities().clone())
    }

    /// Create engine over explicit matrices
    #[inline]
    #[must_use]
    pub fn from_matrices(permissions: PermissionMatrix, capabilities: CapabilityMatrix) -> Self {
        Self {
            permissions,
            capabilities,
        }
    }

    /// Built-in matrices with configured entries applied on top
    #[must_use]
    pub fn with_overrides(
        permission_overrides: &[PermissionOverride],
        capability_overrides: &[CapabilityOverride],
    ) -> Self {
        let mut engine = Self::new();
        for o in permission_overrides {
            let previous = engine.permissions.set(o.role, o.module, o.access);
            tracing::debug!(role = %o.role, module = %o.module, access = %o.access, ?previous, "permission override");
        }
        for o in capability_overrides {
            let previous = engine.capabilities.set(o.module, o.role, o.capability);
            tracing::debug!(role = %o.role, module = %o.module, capability = %o.capability, ?previous, "capability override");
        }
        engine
    }

    /// Access level of `role` on `module`; `None` when unmapped
    #[inline]
    #[must_use]
    pub fn access_for(&self, role: Role, module: Module) -> AccessLevel {
        self.permissions.get(role, module).unwrap_or_default()
    }

    /// Capability of `role` on `module`; `Capability::None` when unmapped
    #[inline]
    #[must_use]
    pub fn capability_for(&self, module: Module, role: Role) -> Capability {
        self.capabilities.get(module, role).unwrap_or_default()
    }

    /// Modules `role` may see, in display order
    #[must_use]
    pub fn visible_modules(&self, role: Role) -> Vec<Module> {
        Module::ALL
            .into_iter()
            .filter(|m| self.access_for(role, *m).can_view())
            .collect()
    }

    /// Underlying permission matrix
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> &PermissionMatrix {
        &self.permissions
    }

    /// Underlying capability matrix
    #[inline]
    #[must_use]
    pub fn capabilities(&self) -> &CapabilityMatrix {
        &self.capabilities
    }
}

impl Default for PermissionEngine {
    fn default() -> Self {
        Self::new()
    }
}
