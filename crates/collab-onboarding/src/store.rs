//! Onboarding store
//!
//! Exclusive owner of all dossiers. Mutations act on the active dossier,
//! the one most recently started or selected. The collection is the only
//! copy of each dossier; the active dossier is just a key into it, so a
//! fetch by customer id always matches what the active view shows.
//!
//! Each mutation holds the dossier's map entry for its whole duration,
//! which serializes writers per customer. Phase completion is a set union,
//! so applying the same `complete_phase` twice is harmless.

use crate::catalog::{PhaseCatalog, PhaseId};
use crate::dossier::{Creator, DataSection, FieldValue, OnboardingDossier, SectionRecord};
use crate::error::OnboardingError;
use chrono::Utc;
use collab_model::CustomerId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Result of [`OnboardingStore::start_onboarding`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new dossier was created
    Created(OnboardingDossier),
    /// A dossier already existed and is now active, unchanged
    Resumed(OnboardingDossier),
}

impl StartOutcome {
    /// The active dossier
    #[inline]
    #[must_use]
    pub fn dossier(&self) -> &OnboardingDossier {
        match self {
            Self::Created(d) | Self::Resumed(d) => d,
        }
    }

    /// Whether a new dossier was created
    #[inline]
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Per-customer onboarding dossiers
#[derive(Debug)]
pub struct OnboardingStore {
    catalog: Arc<PhaseCatalog>,
    dossiers: DashMap<CustomerId, OnboardingDossier>,
    active: RwLock<Option<CustomerId>>,
    revision: AtomicU64,
}

impl OnboardingStore {
    /// Create empty store with the default five-phase catalog
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(PhaseCatalog::default())
    }

    /// Create empty store with a custom catalog
    #[must_use]
    pub fn with_catalog(catalog: PhaseCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            dossiers: DashMap::new(),
            active: RwLock::new(None),
            revision: AtomicU64::new(0),
        }
    }

    /// Phase catalog driving transitions
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &PhaseCatalog {
        &self.catalog
    }

    /// Snapshot identity; changes on every successful mutation
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    /// Open onboarding for a customer, or resume the existing dossier
    ///
    /// An existing dossier becomes active and is returned unchanged; none of
    /// its fields are overwritten.
    ///
    /// # Errors
    /// - `OnboardingError::EmptyCustomerId` if `customer_id` is empty
    pub fn start_onboarding(
        &self,
        customer_id: impl Into<CustomerId>,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        created_by: Creator,
    ) -> Result<StartOutcome, OnboardingError> {
        let customer_id = customer_id.into();
        if customer_id.as_str().is_empty() {
            return Err(OnboardingError::EmptyCustomerId);
        }

        let outcome = match self.dossiers.entry(customer_id.clone()) {
            Entry::Occupied(existing) => StartOutcome::Resumed(existing.get().clone()),
            Entry::Vacant(slot) => {
                let dossier = OnboardingDossier::new(
                    &self.catalog,
                    customer_id.clone(),
                    customer_name,
                    customer_email,
                    created_by,
                    Utc::now(),
                );
                slot.insert(dossier.clone());
                self.bump();
                StartOutcome::Created(dossier)
            }
        };

        *self.active.write() = Some(customer_id.clone());

        if outcome.is_created() {
            tracing::info!(customer = %customer_id, ?created_by, "onboarding started");
        } else {
            tracing::debug!(customer = %customer_id, "onboarding resumed");
        }
        Ok(outcome)
    }

    /// Make an existing dossier active
    ///
    /// # Errors
    /// - `OnboardingError::UnknownCustomer` if no dossier exists
    pub fn select(&self, customer_id: &CustomerId) -> Result<OnboardingDossier, OnboardingError> {
        let dossier = self
            .get_onboarding_by_customer_id(customer_id)
            .ok_or_else(|| OnboardingError::UnknownCustomer(customer_id.clone()))?;
        *self.active.write() = Some(customer_id.clone());
        Ok(dossier)
    }

    /// Jump to any catalog phase
    ///
    /// Jumps are not checked against completed phases; a jump past the first
    /// incomplete phase is logged.
    ///
    /// # Errors
    /// - `OnboardingError::NoActiveDossier` if nothing is active
    /// - `OnboardingError::PhaseOutOfRange` if `phase` is not in the catalog
    pub fn set_current_phase(&self, phase: PhaseId) -> Result<OnboardingDossier, OnboardingError> {
        self.mutate_active("set_current_phase", |catalog, dossier| {
            ensure_in_catalog(catalog, phase)?;
            if let Some(frontier) = dossier.next_incomplete_phase(catalog) {
                if phase > frontier {
                    tracing::warn!(
                        customer = %dossier.customer_id,
                        %phase,
                        %frontier,
                        "current phase moved past first incomplete phase"
                    );
                }
            }
            dossier.current_phase = phase;
            Ok(())
        })
    }

    /// Mark a phase completed and advance to the next one
    ///
    /// Completion is a set union. The current phase moves to the phase after
    /// `phase`, or stays at `phase` when it is the last one.
    ///
    /// # Errors
    /// - `OnboardingError::NoActiveDossier` if nothing is active
    /// - `OnboardingError::PhaseOutOfRange` if `phase` is not in the catalog
    pub fn complete_phase(&self, phase: PhaseId) -> Result<OnboardingDossier, OnboardingError> {
        self.mutate_active("complete_phase", |catalog, dossier| {
            ensure_in_catalog(catalog, phase)?;
            let newly = dossier.completed_phases.insert(phase);
            dossier.current_phase = catalog.next_after(phase).unwrap_or(phase);
            tracing::debug!(
                customer = %dossier.customer_id,
                %phase,
                newly,
                current = %dossier.current_phase,
                "phase completed"
            );
            Ok(())
        })
    }

    /// Shallow-merge fields into one section of the active dossier
    ///
    /// Keys not listed in `fields` keep their values; other sections are
    /// untouched.
    ///
    /// # Errors
    /// - `OnboardingError::NoActiveDossier` if nothing is active
    pub fn update_onboarding_data<I, K, V>(
        &self,
        section: DataSection,
        fields: I,
    ) -> Result<OnboardingDossier, OnboardingError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        let fields: SectionRecord = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.mutate_active("update_onboarding_data", |_, dossier| {
            tracing::debug!(
                customer = %dossier.customer_id,
                %section,
                fields = fields.len(),
                "onboarding data merged"
            );
            dossier.data.merge(section, fields);
            Ok(())
        })
    }

    /// Close onboarding regardless of individual phase progress
    ///
    /// # Errors
    /// - `OnboardingError::NoActiveDossier` if nothing is active
    pub fn complete_onboarding(&self) -> Result<OnboardingDossier, OnboardingError> {
        self.mutate_active("complete_onboarding", |catalog, dossier| {
            dossier.completed_phases.extend(catalog.ids());
            dossier.is_complete = true;
            tracing::info!(customer = %dossier.customer_id, "onboarding completed");
            Ok(())
        })
    }

    /// Dossier for a customer
    #[must_use]
    pub fn get_onboarding_by_customer_id(
        &self,
        customer_id: &CustomerId,
    ) -> Option<OnboardingDossier> {
        self.dossiers.get(customer_id).map(|d| d.value().clone())
    }

    /// Whether the customer's onboarding is closed; false when no dossier exists
    #[must_use]
    pub fn is_onboarding_complete(&self, customer_id: &CustomerId) -> bool {
        self.dossiers
            .get(customer_id)
            .is_some_and(|d| d.is_complete)
    }

    /// Active dossier, if any
    #[must_use]
    pub fn active(&self) -> Option<OnboardingDossier> {
        let key = self.active.read().clone()?;
        self.get_onboarding_by_customer_id(&key)
    }

    /// Active customer id, if any
    #[must_use]
    pub fn active_customer(&self) -> Option<CustomerId> {
        self.active.read().clone()
    }

    /// All dossiers, ordered by customer id
    #[must_use]
    pub fn dossiers(&self) -> Vec<OnboardingDossier> {
        let mut all: Vec<_> = self.dossiers.iter().map(|d| d.value().clone()).collect();
        all.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        all
    }

    /// Number of dossiers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dossiers.len()
    }

    /// Check if store has no dossiers
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dossiers.is_empty()
    }

    /// First phase the customer has not completed
    #[must_use]
    pub fn next_incomplete_phase(&self, customer_id: &CustomerId) -> Option<PhaseId> {
        self.dossiers
            .get(customer_id)
            .and_then(|d| d.next_incomplete_phase(&self.catalog))
    }

    /// Required fields of `phase` the customer has not filled in
    ///
    /// # Errors
    /// - `OnboardingError::UnknownCustomer` if no dossier exists
    /// - `OnboardingError::PhaseOutOfRange` if `phase` is not in the catalog
    pub fn missing_required_fields(
        &self,
        customer_id: &CustomerId,
        phase: PhaseId,
    ) -> Result<Vec<String>, OnboardingError> {
        ensure_in_catalog(&self.catalog, phase)?;
        let dossier = self
            .dossiers
            .get(customer_id)
            .ok_or_else(|| OnboardingError::UnknownCustomer(customer_id.clone()))?;
        Ok(dossier.missing_required_fields(&self.catalog, phase))
    }

    /// Load an archived dossier into the store
    ///
    /// Does not change the active dossier.
    ///
    /// # Errors
    /// - `OnboardingError::InvalidDossier` if it violates a record invariant
    /// - `OnboardingError::DuplicateDossier` if the customer already has one
    pub fn restore(&self, dossier: OnboardingDossier) -> Result<(), OnboardingError> {
        if dossier.customer_id.as_str().is_empty() {
            return Err(OnboardingError::EmptyCustomerId);
        }
        dossier
            .check_invariants(&self.catalog)
            .map_err(|reason| OnboardingError::InvalidDossier {
                customer_id: dossier.customer_id.clone(),
                reason,
            })?;

        match self.dossiers.entry(dossier.customer_id.clone()) {
            Entry::Occupied(existing) => {
                Err(OnboardingError::DuplicateDossier(existing.key().clone()))
            }
            Entry::Vacant(slot) => {
                slot.insert(dossier);
                self.bump();
                Ok(())
            }
        }
    }

    fn mutate_active<F>(&self, op: &'static str, f: F) -> Result<OnboardingDossier, OnboardingError>
    where
        F: FnOnce(&PhaseCatalog, &mut OnboardingDossier) -> Result<(), OnboardingError>,
    {
        let result = self.apply_to_active(f);
        if let Err(err) = &result {
            tracing::warn!(op, error = %err, "onboarding mutation rejected");
        }
        result
    }

    fn apply_to_active<F>(&self, f: F) -> Result<OnboardingDossier, OnboardingError>
    where
        F: FnOnce(&PhaseCatalog, &mut OnboardingDossier) -> Result<(), OnboardingError>,
    {
        let key = self
            .active
            .read()
            .clone()
            .ok_or(OnboardingError::NoActiveDossier)?;
        let mut entry = self
            .dossiers
            .get_mut(&key)
            .ok_or(OnboardingError::UnknownCustomer(key))?;

        let dossier = entry.value_mut();
        f(&self.catalog, dossier)?;
        dossier.last_updated = Utc::now().max(dossier.last_updated);
        self.bump();
        Ok(dossier.clone())
    }
}

impl Default for OnboardingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_in_catalog(catalog: &PhaseCatalog, phase: PhaseId) -> Result<(), OnboardingError> {
    if catalog.contains(phase) {
        Ok(())
    } else {
        Err(OnboardingError::PhaseOutOfRange {
            phase,
            first: catalog.first(),
            last: catalog.last(),
        })
    }
}
