//! Permission and capability tables
//!
//! Built-in tables are process-wide statics; engines clone them and apply
//! configuration overrides on top.

use crate::level::{AccessLevel, Capability};
use crate::module::Module;
use collab_model::Role;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// `(Role, Module) → AccessLevel`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionMatrix {
    entries: HashMap<(Role, Module), AccessLevel>,
}

impl PermissionMatrix {
    /// Create empty matrix (every lookup yields `None`)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry, returning the previous one
    pub fn set(&mut self, role: Role, module: Module, access: AccessLevel) -> Option<AccessLevel> {
        self.entries.insert((role, module), access)
    }

    /// Exact-key lookup
    #[inline]
    #[must_use]
    pub fn get(&self, role: Role, module: Module) -> Option<AccessLevel> {
        self.entries.get(&(role, module)).copied()
    }

    /// Number of explicit entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if matrix has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `(Module, Role) → Capability`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityMatrix {
    entries: HashMap<(Module, Role), Capability>,
}

impl CapabilityMatrix {
    /// Create empty matrix (every lookup yields `None`)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an entry, returning the previous one
    pub fn set(&mut self, module: Module, role: Role, capability: Capability) -> Option<Capability> {
        self.entries.insert((module, role), capability)
    }

    /// Exact-key lookup
    #[inline]
    #[must_use]
    pub fn get(&self, module: Module, role: Role) -> Option<Capability> {
        self.entries.get(&(module, role)).copied()
    }

    /// Number of explicit entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if matrix has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static DEFAULT_PERMISSIONS: Lazy<PermissionMatrix> = Lazy::new(|| {
    use AccessLevel::{CreateEdit, FullControl, View};
    use Module::{
        Budget, ChangeRequests, CustomerActions, Dashboard, Documents, Feedback, Onboarding,
        Projects, Reports, Team, Workspaces,
    };

    let rows: [(Role, &[(Module, AccessLevel)]); 4] = [
        (
            Role::Customer,
            &[
                (Dashboard, View),
                (Projects, View),
                (Workspaces, View),
                (Onboarding, CreateEdit),
                (CustomerActions, CreateEdit),
                (Feedback, CreateEdit),
                (ChangeRequests, CreateEdit),
                (Budget, View),
                (Documents, View),
            ],
        ),
        (
            Role::Sales,
            &[
                (Dashboard, View),
                (Projects, CreateEdit),
                (Workspaces, CreateEdit),
                (Onboarding, CreateEdit),
                (CustomerActions, CreateEdit),
                (Feedback, View),
                (ChangeRequests, CreateEdit),
                (Budget, CreateEdit),
                (Documents, CreateEdit),
                (Team, View),
                (Reports, View),
            ],
        ),
        (
            Role::Tech,
            &[
                (Dashboard, View),
                (Projects, View),
                (Workspaces, View),
                (CustomerActions, View),
                (Feedback, View),
                (ChangeRequests, CreateEdit),
                (Documents, CreateEdit),
                (Team, View),
            ],
        ),
        (
            Role::Consultant,
            &[
                (Dashboard, View),
                (Projects, View),
                (Workspaces, View),
                (Onboarding, View),
                (CustomerActions, View),
                (Feedback, View),
                (ChangeRequests, View),
                (Budget, View),
                (Documents, View),
                (Reports, View),
            ],
        ),
    ];

    let mut matrix = PermissionMatrix::new();
    for (role, row) in rows {
        for &(module, access) in row {
            matrix.set(role, module, access);
        }
    }
    for module in Module::ALL {
        matrix.set(Role::Admin, module, FullControl);
    }
    matrix
});

static DEFAULT_CAPABILITIES: Lazy<CapabilityMatrix> = Lazy::new(|| {
    use Capability::{
        Approve, ApproveInternal, CreateEdit, InputOnly, Submit, TrackStatus, Validate, View,
    };
    use Role::{Admin, Consultant, Customer, Sales, Tech};

    let rows: [(Module, &[(Role, Capability)]); 6] = [
        (
            Module::ChangeRequests,
            &[
                (Customer, Submit),
                (Sales, ApproveInternal),
                (Tech, InputOnly),
                (Consultant, Validate),
                (Admin, Approve),
            ],
        ),
        (
            Module::Budget,
            &[
                (Customer, Approve),
                (Sales, ApproveInternal),
                (Consultant, Validate),
                (Admin, Approve),
            ],
        ),
        (
            Module::CustomerActions,
            &[
                (Customer, Submit),
                (Sales, TrackStatus),
                (Tech, TrackStatus),
                (Consultant, TrackStatus),
                (Admin, CreateEdit),
            ],
        ),
        (
            Module::Onboarding,
            &[
                (Customer, Submit),
                (Sales, CreateEdit),
                (Consultant, View),
                (Admin, Approve),
            ],
        ),
        (
            Module::Feedback,
            &[
                (Customer, Submit),
                (Sales, View),
                (Tech, View),
                (Consultant, View),
                (Admin, View),
            ],
        ),
        (
            Module::Documents,
            &[
                (Customer, View),
                (Sales, CreateEdit),
                (Tech, CreateEdit),
                (Consultant, Validate),
                (Admin, Approve),
            ],
        ),
    ];

    let mut matrix = CapabilityMatrix::new();
    for (module, row) in rows {
        for &(role, capability) in row {
            matrix.set(module, role, capability);
        }
    }
    matrix
});

/// Built-in permission matrix
#[must_use]
pub fn default_permissions() -> &'static PermissionMatrix {
    &DEFAULT_PERMISSIONS
}

/// Built-in capability matrix
#[must_use]
pub fn default_capabilities() -> &'static CapabilityMatrix {
    &DEFAULT_CAPABILITIES
}
