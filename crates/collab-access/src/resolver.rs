//! View resolution
//!
//! [`resolve`] is the pure four-step algorithm over a set of records.
//! [`AccessResolver`] reads the live stores and memoizes results per
//! principal and store revisions.

use crate::policy::{ProjectVisibility, VisibilityPolicy};
use crate::stores::{ProjectStore, WorkspaceRegistry};
use crate::view::{ProjectMatch, ProjectView, ResolvedView};
use collab_model::{
    CustomerAction, CustomerId, Feedback, Principal, Project, ProjectId, Role, Workspace,
};
use collab_onboarding::{OnboardingDossier, OnboardingStore};
use moka::sync::Cache;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default number of memoized views
pub const DEFAULT_VIEW_CACHE_CAPACITY: u64 = 1024;

/// Read access to onboarding dossiers
pub trait DossierLookup: Send + Sync {
    /// Dossier keyed by customer id
    fn dossier_for(&self, customer_id: &CustomerId) -> Option<OnboardingDossier>;

    /// Revision that changes on every dossier write
    fn revision(&self) -> u64;
}

impl DossierLookup for OnboardingStore {
    fn dossier_for(&self, customer_id: &CustomerId) -> Option<OnboardingDossier> {
        self.get_onboarding_by_customer_id(customer_id)
    }

    fn revision(&self) -> u64 {
        OnboardingStore::revision(self)
    }
}

/// Records a view is resolved from
#[derive(Debug, Clone, Copy)]
pub struct Records<'a> {
    /// Every project
    pub projects: &'a [Project],
    /// Every workspace
    pub workspaces: &'a [Workspace],
    /// Every customer action
    pub actions: &'a [CustomerAction],
    /// Every feedback item
    pub feedback: &'a [Feedback],
}

/// Resolve what `principal` may see
///
/// Missing linking ids and absent dossiers yield empty parts, never errors.
#[must_use]
pub fn resolve(
    principal: &Principal,
    records: Records<'_>,
    dossiers: &dyn DossierLookup,
) -> ResolvedView {
    let policy = VisibilityPolicy::for_role(principal.role);
    if policy.requires_link && principal.linking_id.is_none() {
        tracing::debug!(principal = %principal.id, role = %principal.role, "no linking id, empty view");
        return ResolvedView::empty();
    }

    // Step 1: workspaces
    let workspaces: Vec<Workspace> = records
        .workspaces
        .iter()
        .filter(|w| policy.workspaces.admits(principal, w))
        .cloned()
        .collect();

    // Step 2: projects
    let mut projects: Vec<ProjectView> = records
        .projects
        .iter()
        .filter_map(|project| {
            match_project(&policy, principal, &workspaces, project)
                .map(|matched_by| ProjectView::new(project.clone(), matched_by))
        })
        .collect();

    // Step 3: activity on visible projects
    let visible: HashSet<&ProjectId> = projects.iter().map(|p| &p.project.id).collect();
    let customer_actions: Vec<CustomerAction> = records
        .actions
        .iter()
        .filter(|a| visible.contains(&a.project_id))
        .cloned()
        .collect();
    let feedback: Vec<Feedback> = records
        .feedback
        .iter()
        .filter(|f| visible.contains(&f.project_id))
        .cloned()
        .collect();

    // Step 4: onboarding merge
    let onboarding = if principal.role == Role::Customer {
        principal
            .linking_id
            .as_ref()
            .and_then(|link| dossiers.dossier_for(&link.as_customer()))
    } else {
        None
    };
    if let Some(dossier) = &onboarding {
        merge_onboarding(&mut projects, dossier);
    }

    tracing::debug!(
        principal = %principal.id,
        role = %principal.role,
        projects = projects.len(),
        workspaces = workspaces.len(),
        actions = customer_actions.len(),
        feedback = feedback.len(),
        onboarding = onboarding.is_some(),
        "view resolved"
    );

    ResolvedView {
        projects,
        workspaces,
        customer_actions,
        feedback,
        onboarding,
    }
}

fn match_project(
    policy: &VisibilityPolicy,
    principal: &Principal,
    workspaces: &[Workspace],
    project: &Project,
) -> Option<ProjectMatch> {
    if let Some(ws) = workspaces.iter().find(|w| links(w, project)) {
        return Some(ProjectMatch::Structural {
            workspace_id: ws.id.clone(),
        });
    }
    match policy.projects {
        ProjectVisibility::Unrestricted => Some(ProjectMatch::Unrestricted),
        ProjectVisibility::ScopedToAssignment { legacy } => legacy
            .matches(principal, project)
            .then_some(ProjectMatch::LegacyName),
    }
}

/// Structural link: same project name or same customer name, blanks excluded
fn links(workspace: &Workspace, project: &Project) -> bool {
    let same_project = !project.name.is_empty() && workspace.project_name == project.name;
    let same_customer =
        !project.client_contact.is_empty() && workspace.customer_name == project.client_contact;
    same_project || same_customer
}

fn merge_onboarding(projects: &mut [ProjectView], dossier: &OnboardingDossier) {
    let budget_range = dossier.data.budget_range();
    for view in projects.iter_mut().filter(|p| p.matched_by.is_structural()) {
        if let Some(range) = budget_range {
            view.project.budget.approved = range.to_string();
        }
        view.onboarding_data = Some(dossier.data.clone());
    }
}

/// Memo cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
    /// Lookups served from cache
    pub hits: u64,
    /// Lookups that resolved afresh
    pub misses: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ViewKey {
    principal: Principal,
    projects: u64,
    workspaces: u64,
    onboarding: u64,
}

/// Resolver over the live stores
pub struct AccessResolver {
    projects: Arc<ProjectStore>,
    workspaces: Arc<WorkspaceRegistry>,
    onboarding: Arc<dyn DossierLookup>,
    cache: Option<Cache<ViewKey, Arc<ResolvedView>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AccessResolver {
    /// Create resolver with the default cache capacity
    #[must_use]
    pub fn new(
        projects: Arc<ProjectStore>,
        workspaces: Arc<WorkspaceRegistry>,
        onboarding: Arc<dyn DossierLookup>,
    ) -> Self {
        Self {
            projects,
            workspaces,
            onboarding,
            cache: Some(Cache::new(DEFAULT_VIEW_CACHE_CAPACITY)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Set cache capacity; `0` disables memoization
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: u64) -> Self {
        self.cache = (capacity > 0).then(|| Cache::new(capacity));
        self
    }

    /// Resolve what `principal` may see, memoized
    ///
    /// Revisions are read before the records, so an entry never holds data
    /// older than its key.
    pub fn resolve_view(&self, principal: &Principal) -> Arc<ResolvedView> {
        let Some(cache) = &self.cache else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return Arc::new(self.resolve_uncached(principal));
        };

        let key = ViewKey {
            principal: principal.clone(),
            projects: self.projects.revision(),
            workspaces: self.workspaces.revision(),
            onboarding: self.onboarding.revision(),
        };
        if let Some(view) = cache.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(principal = %principal.id, "view cache hit");
            return view;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let view = Arc::new(self.resolve_uncached(principal));
        cache.insert(key, Arc::clone(&view));
        view
    }

    /// Resolve without touching the cache
    #[must_use]
    pub fn resolve_uncached(&self, principal: &Principal) -> ResolvedView {
        let projects = self.projects.list();
        let workspaces = self.workspaces.list();
        let actions = self.projects.actions();
        let feedback = self.projects.feedback();
        resolve(
            principal,
            Records {
                projects: &projects,
                workspaces: &workspaces,
                actions: &actions,
                feedback: &feedback,
            },
            self.onboarding.as_ref(),
        )
    }

    /// Drop every memoized view
    pub fn invalidate_all(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }

    /// Cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.as_ref().map_or(0, |c| {
                c.run_pending_tasks();
                c.entry_count()
            }),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Whether memoization is enabled
    #[inline]
    #[must_use]
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }
}

impl std::fmt::Debug for AccessResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessResolver")
            .field("projects", &self.projects.revision())
            .field("workspaces", &self.workspaces.revision())
            .field("onboarding", &self.onboarding.revision())
            .field("caching", &self.is_caching())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_model::{Budget, TeamMemberRef};
    use collab_onboarding::{Creator, DataSection};
    use pretty_assertions::assert_eq;

    struct NoDossiers;

    impl DossierLookup for NoDossiers {
        fn dossier_for(&self, _: &CustomerId) -> Option<OnboardingDossier> {
            None
        }

        fn revision(&self) -> u64 {
            0
        }
    }

    fn records() -> (Vec<Project>, Vec<Workspace>) {
        let projects = vec![
            Project::new("p-1", "Apollo").with_client_contact("Acme"),
            Project::new("p-2", "Legacy").with_client_contact("Ann"),
            Project::new("p-3", "Zephyr").with_client_contact("Globex"),
        ];
        let workspaces = vec![Workspace::new("w-1", "p-1", "Apollo", "c-1", "Acme")
            .with_sales(TeamMemberRef::new("tm-s", "Sam"))];
        (projects, workspaces)
    }

    fn view_of(principal: &Principal) -> ResolvedView {
        let (projects, workspaces) = records();
        resolve(
            principal,
            Records {
                projects: &projects,
                workspaces: &workspaces,
                actions: &[],
                feedback: &[],
            },
            &NoDossiers,
        )
    }

    #[test]
    fn structural_beats_legacy_tag() {
        let ann = Principal::new("u-1", "Acme", "ann@acme.io", Role::Customer).with_linking_id("c-1");
        let view = view_of(&ann);
        assert_eq!(view.projects.len(), 1);
        assert_eq!(
            view.projects[0].matched_by,
            ProjectMatch::Structural {
                workspace_id: "w-1".into()
            }
        );
    }

    #[test]
    fn legacy_match_is_tagged() {
        let ann = Principal::new("u-1", "Ann", "ann@acme.io", Role::Customer).with_linking_id("c-7");
        let view = view_of(&ann);
        assert!(view.workspaces.is_empty());
        assert_eq!(view.projects.len(), 1);
        assert_eq!(view.projects[0].project.id.as_str(), "p-2");
        assert_eq!(view.projects[0].matched_by, ProjectMatch::LegacyName);
    }

    #[test]
    fn unlinked_customer_sees_nothing() {
        let ann = Principal::new("u-1", "Ann", "ann@acme.io", Role::Customer);
        assert_eq!(view_of(&ann), ResolvedView::empty());
    }

    #[test]
    fn consultant_projects_are_unrestricted() {
        let cleo = Principal::new("u-2", "Cleo", "cleo@example.com", Role::Consultant);
        let view = view_of(&cleo);
        assert_eq!(view.projects.len(), 3);
        assert!(view
            .projects
            .iter()
            .all(|p| p.matched_by == ProjectMatch::Unrestricted));
    }

    #[test]
    fn merge_only_touches_structural_projects() {
        let store = OnboardingStore::new();
        store
            .start_onboarding("c-1", "Acme", "ann@acme.io", Creator::Customer)
            .unwrap();
        store
            .update_onboarding_data(DataSection::Commercial, [("budgetRange", "$1M")])
            .unwrap();

        let projects = vec![
            Project::new("p-1", "Apollo").with_budget(Budget {
                approved: "$500k".into(),
                current: "$10k".into(),
                change_impact: Some("+5%".into()),
            }),
            Project::new("p-2", "Legacy")
                .with_client_contact("Ann")
                .with_budget(Budget {
                    approved: "$20k".into(),
                    ..Budget::default()
                }),
        ];
        let workspaces = vec![Workspace::new("w-1", "p-1", "Apollo", "c-1", "Acme")];
        let ann = Principal::new("u-1", "Ann", "ann@acme.io", Role::Customer).with_linking_id("c-1");

        let view = resolve(
            &ann,
            Records {
                projects: &projects,
                workspaces: &workspaces,
                actions: &[],
                feedback: &[],
            },
            &store,
        );

        let apollo = view.project("p-1").unwrap();
        assert_eq!(apollo.project.budget.approved, "$1M");
        assert_eq!(apollo.project.budget.current, "$10k");
        assert_eq!(apollo.project.budget.change_impact.as_deref(), Some("+5%"));
        assert!(apollo.onboarding_data.is_some());

        let legacy = view.project("p-2").unwrap();
        assert_eq!(legacy.project.budget.approved, "$20k");
        assert!(legacy.onboarding_data.is_none());
        assert_eq!(
            view.onboarding.as_ref().map(|d| d.customer_id.as_str()),
            Some("c-1")
        );
    }

    #[test]
    fn team_members_never_get_a_dossier() {
        let store = OnboardingStore::new();
        store
            .start_onboarding("tm-s", "Odd", "odd@example.com", Creator::Sales)
            .unwrap();
        let (projects, workspaces) = records();
        let sam = Principal::new("u-3", "Sam", "sam@example.com", Role::Sales).with_linking_id("tm-s");
        let view = resolve(
            &sam,
            Records {
                projects: &projects,
                workspaces: &workspaces,
                actions: &[],
                feedback: &[],
            },
            &store,
        );
        assert!(view.onboarding.is_none());
        assert_eq!(view.workspaces.len(), 1);
    }

    #[test]
    fn resolver_memoizes_until_a_store_changes() {
        let projects = Arc::new(ProjectStore::new());
        projects.upsert_project(Project::new("p-1", "Apollo"));
        let workspaces = Arc::new(WorkspaceRegistry::new());
        let resolver = AccessResolver::new(projects.clone(), workspaces, Arc::new(NoDossiers));
        let admin = Principal::new("u-0", "Root", "root@example.com", Role::Admin);

        let first = resolver.resolve_view(&admin);
        let second = resolver.resolve_view(&admin);
        assert!(Arc::ptr_eq(&first, &second));

        projects.upsert_project(Project::new("p-2", "Zephyr"));
        let third = resolver.resolve_view(&admin);
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.projects.len(), 2);

        let stats = resolver.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let resolver = AccessResolver::new(
            Arc::new(ProjectStore::new()),
            Arc::new(WorkspaceRegistry::new()),
            Arc::new(NoDossiers),
        )
        .with_cache_capacity(0);
        let admin = Principal::new("u-0", "Root", "root@example.com", Role::Admin);

        let first = resolver.resolve_view(&admin);
        let second = resolver.resolve_view(&admin);
        assert!(!resolver.is_caching());
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.cache_stats().entry_count, 0);
    }
}
