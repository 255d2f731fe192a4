//! The wired-up platform
//!
//! Owns every store and hands them to the resolver and the permission
//! engine. Nothing here is global: two platforms never share state.

use crate::config::PlatformConfig;
use crate::dataset::Dataset;
use crate::error::CollabError;
use collab_access::{
    AccessResolver, CacheStats, IdentityDirectory, ProjectStore, ResolvedView, WorkspaceRegistry,
};
use collab_model::{CustomerId, Principal, Role};
use collab_onboarding::{
    Creator, DataSection, FieldValue, OnboardingDossier, OnboardingStore, PhaseId, StartOutcome,
};
use collab_permissions::{AccessLevel, Capability, Module, PermissionEngine};
use std::sync::Arc;

/// Record counts applied by [`CollabPlatform::load_dataset`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Principals registered
    pub principals: usize,
    /// Projects inserted or replaced
    pub projects: usize,
    /// Customer actions added
    pub customer_actions: usize,
    /// Feedback items added
    pub feedback: usize,
    /// Workspaces registered
    pub workspaces: usize,
    /// Dossiers restored
    pub dossiers: usize,
}

/// Collaboration platform core
#[derive(Debug)]
pub struct CollabPlatform {
    config: PlatformConfig,
    projects: Arc<ProjectStore>,
    workspaces: Arc<WorkspaceRegistry>,
    identities: Arc<IdentityDirectory>,
    onboarding: Arc<OnboardingStore>,
    permissions: PermissionEngine,
    resolver: AccessResolver,
}

impl CollabPlatform {
    /// Create platform with empty stores
    ///
    /// # Errors
    /// `CollabError::Config` if the configuration fails validation
    pub fn new(config: PlatformConfig) -> Result<Self, CollabError> {
        config.validate()?;

        let projects = Arc::new(ProjectStore::new());
        let workspaces = Arc::new(WorkspaceRegistry::new());
        let onboarding = Arc::new(OnboardingStore::with_catalog(config.phases.clone()));
        let permissions = PermissionEngine::with_overrides(
            &config.permission_overrides,
            &config.capability_overrides,
        );
        let resolver = AccessResolver::new(
            Arc::clone(&projects),
            Arc::clone(&workspaces),
            onboarding.clone(),
        )
        .with_cache_capacity(config.view_cache_capacity);

        tracing::info!(
            phases = config.phases.len(),
            view_cache_capacity = config.view_cache_capacity,
            permission_overrides = config.permission_overrides.len(),
            capability_overrides = config.capability_overrides.len(),
            "platform initialized"
        );

        Ok(Self {
            config,
            projects,
            workspaces,
            identities: Arc::new(IdentityDirectory::new()),
            onboarding,
            permissions,
            resolver,
        })
    }

    /// Create platform and load a dataset into it
    ///
    /// # Errors
    /// Returns the first configuration or store error
    pub fn with_dataset(config: PlatformConfig, dataset: Dataset) -> Result<Self, CollabError> {
        let platform = Self::new(config)?;
        platform.load_dataset(dataset)?;
        Ok(platform)
    }

    /// Add a dataset's records to the stores
    ///
    /// Stops at the first rejected record; records before it stay loaded.
    ///
    /// # Errors
    /// - `CollabError::Registry` on duplicate workspaces or emails
    /// - `CollabError::Onboarding` on duplicate or invalid dossiers
    pub fn load_dataset(&self, dataset: Dataset) -> Result<LoadSummary, CollabError> {
        let summary = LoadSummary {
            principals: dataset.principals.len(),
            projects: dataset.projects.len(),
            customer_actions: dataset.customer_actions.len(),
            feedback: dataset.feedback.len(),
            workspaces: dataset.workspaces.len(),
            dossiers: dataset.dossiers.len(),
        };

        for principal in dataset.principals {
            self.identities.register(principal)?;
        }
        for project in dataset.projects {
            self.projects.upsert_project(project);
        }
        for action in dataset.customer_actions {
            self.projects.add_action(action);
        }
        for item in dataset.feedback {
            self.projects.add_feedback(item);
        }
        for workspace in dataset.workspaces {
            self.workspaces.insert(workspace)?;
        }
        for dossier in dataset.dossiers {
            self.onboarding.restore(dossier)?;
        }

        tracing::info!(?summary, "dataset loaded");
        Ok(summary)
    }

    /// Current contents of every store
    #[must_use]
    pub fn export_dataset(&self) -> Dataset {
        Dataset {
            principals: self.identities.list(),
            projects: self.projects.list(),
            customer_actions: self.projects.actions(),
            feedback: self.projects.feedback(),
            workspaces: self.workspaces.list(),
            dossiers: self.onboarding.dossiers(),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Project/activity store
    #[inline]
    #[must_use]
    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    /// Workspace registry
    #[inline]
    #[must_use]
    pub fn workspaces(&self) -> &WorkspaceRegistry {
        &self.workspaces
    }

    /// Identity directory
    #[inline]
    #[must_use]
    pub fn identities(&self) -> &IdentityDirectory {
        &self.identities
    }

    /// Onboarding store
    #[inline]
    #[must_use]
    pub fn onboarding(&self) -> &OnboardingStore {
        &self.onboarding
    }

    /// Permission engine
    #[inline]
    #[must_use]
    pub fn permissions(&self) -> &PermissionEngine {
        &self.permissions
    }

    // ----- Access -----

    /// Everything `principal` may see
    pub fn resolve_view(&self, principal: &Principal) -> Arc<ResolvedView> {
        self.resolver.resolve_view(principal)
    }

    /// Everything the principal registered under `email` may see
    ///
    /// # Errors
    /// `CollabError::UnknownPrincipal` if no principal has this email
    pub fn resolve_view_for_email(&self, email: &str) -> Result<Arc<ResolvedView>, CollabError> {
        let principal = self
            .identities
            .lookup(email)
            .ok_or_else(|| CollabError::UnknownPrincipal(email.to_string()))?;
        Ok(self.resolve_view(&principal))
    }

    /// View memoization statistics
    #[must_use]
    pub fn view_cache_stats(&self) -> CacheStats {
        self.resolver.cache_stats()
    }

    // ----- Permissions -----

    /// Access level of `role` on `module`
    #[inline]
    #[must_use]
    pub fn access_for(&self, role: Role, module: Module) -> AccessLevel {
        self.permissions.access_for(role, module)
    }

    /// Capability of `role` on `module`
    #[inline]
    #[must_use]
    pub fn capability_for(&self, module: Module, role: Role) -> Capability {
        self.permissions.capability_for(module, role)
    }

    // ----- Onboarding -----

    /// See [`OnboardingStore::start_onboarding`]
    ///
    /// # Errors
    /// `CollabError::Onboarding` if the customer id is empty
    pub fn start_onboarding(
        &self,
        customer_id: impl Into<CustomerId>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        created_by: Creator,
    ) -> Result<StartOutcome, CollabError> {
        Ok(self
            .onboarding
            .start_onboarding(customer_id, customer_name, customer_email, created_by)?)
    }

    /// Make an existing dossier active
    ///
    /// # Errors
    /// `CollabError::Onboarding` if the customer has no dossier
    pub fn select_onboarding(
        &self,
        customer_id: &CustomerId,
    ) -> Result<OnboardingDossier, CollabError> {
        Ok(self.onboarding.select(customer_id)?)
    }

    /// See [`OnboardingStore::set_current_phase`]
    ///
    /// # Errors
    /// `CollabError::Onboarding` without an active dossier or for an unknown phase
    pub fn set_current_phase(&self, phase: PhaseId) -> Result<OnboardingDossier, CollabError> {
        Ok(self.onboarding.set_current_phase(phase)?)
    }

    /// See [`OnboardingStore::complete_phase`]
    ///
    /// # Errors
    /// `CollabError::Onboarding` without an active dossier or for an unknown phase
    pub fn complete_phase(&self, phase: PhaseId) -> Result<OnboardingDossier, CollabError> {
        Ok(self.onboarding.complete_phase(phase)?)
    }

    /// See [`OnboardingStore::update_onboarding_data`]
    ///
    /// # Errors
    /// `CollabError::Onboarding` without an active dossier
    pub fn update_onboarding_data<I, K, V>(
        &self,
        section: DataSection,
        fields: I,
    ) -> Result<OnboardingDossier, CollabError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Ok(self.onboarding.update_onboarding_data(section, fields)?)
    }

    /// See [`OnboardingStore::complete_onboarding`]
    ///
    /// # Errors
    /// `CollabError::Onboarding` without an active dossier
    pub fn complete_onboarding(&self) -> Result<OnboardingDossier, CollabError> {
        Ok(self.onboarding.complete_onboarding()?)
    }

    /// Dossier of a customer
    #[must_use]
    pub fn get_onboarding_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Option<OnboardingDossier> {
        self.onboarding.get_onboarding_by_customer_id(customer_id)
    }

    /// Whether the customer's onboarding is closed
    #[must_use]
    pub fn is_onboarding_complete(&self, customer_id: &CustomerId) -> bool {
        self.onboarding.is_onboarding_complete(customer_id)
    }
}
