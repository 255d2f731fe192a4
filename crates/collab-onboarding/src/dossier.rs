//! Onboarding dossier: per-customer intake record

use crate::catalog::{PhaseCatalog, PhaseId};
use chrono::{DateTime, Utc};
use collab_model::CustomerId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Intake data section
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSection {
    /// Company details
    Organization,
    /// Project outline
    Project,
    /// Functional requirements
    Requirements,
    /// Safety and compliance
    Safety,
    /// Budget and procurement
    Commercial,
}

impl DataSection {
    /// Every section
    pub const ALL: [DataSection; 5] = [
        DataSection::Organization,
        DataSection::Project,
        DataSection::Requirements,
        DataSection::Safety,
        DataSection::Commercial,
    ];

    /// Lowercase section name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSection::Organization => "organization",
            DataSection::Project => "project",
            DataSection::Requirements => "requirements",
            DataSection::Safety => "safety",
            DataSection::Commercial => "commercial",
        }
    }
}

impl std::fmt::Display for DataSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DataSection::ALL
            .into_iter()
            .find(|d| d.as_str() == normalized)
            .ok_or_else(|| format!("unknown data section: {s}"))
    }
}

/// Intake field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free text
    Text(String),
    /// List of strings
    List(Vec<String>),
}

impl FieldValue {
    /// Empty string or empty list
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// Text content, if this is a text field
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::List(value.into_iter().map(str::to_string).collect())
    }
}

/// Flat record of one section, in insertion order
pub type SectionRecord = IndexMap<String, FieldValue>;

/// All intake data of a dossier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingData {
    /// Company details
    #[serde(default)]
    pub organization: SectionRecord,
    /// Project outline
    #[serde(default)]
    pub project: SectionRecord,
    /// Functional requirements
    #[serde(default)]
    pub requirements: SectionRecord,
    /// Safety and compliance
    #[serde(default)]
    pub safety: SectionRecord,
    /// Budget and procurement
    #[serde(default)]
    pub commercial: SectionRecord,
}

impl OnboardingData {
    /// Every field the catalog declares, set to its empty value
    #[must_use]
    pub fn seeded(catalog: &PhaseCatalog) -> Self {
        let mut data = Self::default();
        for section in DataSection::ALL {
            let record = data.section_mut(section);
            for field in catalog.fields_for(section) {
                record.insert(field.name.clone(), field.kind.empty_value());
            }
        }
        data
    }

    /// Borrow a section
    #[must_use]
    pub fn section(&self, section: DataSection) -> &SectionRecord {
        match section {
            DataSection::Organization => &self.organization,
            DataSection::Project => &self.project,
            DataSection::Requirements => &self.requirements,
            DataSection::Safety => &self.safety,
            DataSection::Commercial => &self.commercial,
        }
    }

    /// Mutably borrow a section
    pub fn section_mut(&mut self, section: DataSection) -> &mut SectionRecord {
        match section {
            DataSection::Organization => &mut self.organization,
            DataSection::Project => &mut self.project,
            DataSection::Requirements => &mut self.requirements,
            DataSection::Safety => &mut self.safety,
            DataSection::Commercial => &mut self.commercial,
        }
    }

    /// Shallow merge: listed keys are replaced, other keys and sections kept
    pub fn merge(&mut self, section: DataSection, fields: SectionRecord) {
        self.section_mut(section).extend(fields);
    }

    /// Non-empty text value of a field
    #[must_use]
    pub fn text(&self, section: DataSection, field: &str) -> Option<&str> {
        self.section(section)
            .get(field)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
    }

    /// Commercial `budgetRange`, when filled in
    #[inline]
    #[must_use]
    pub fn budget_range(&self) -> Option<&str> {
        self.text(DataSection::Commercial, "budgetRange")
    }
}

/// Who opened the dossier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Creator {
    /// Customer self-service
    Customer,
    /// Sales on behalf of the customer
    Sales,
}

/// Per-customer onboarding record
///
/// Invariants, upheld by [`crate::OnboardingStore`]:
/// - `completed_phases` never loses a member
/// - `current_phase` is a catalog phase
/// - `is_complete` implies every catalog phase is in `completed_phases`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingDossier {
    /// Customer id (unique key)
    pub customer_id: CustomerId,
    /// Customer name
    pub customer_name: String,
    /// Customer email
    pub customer_email: String,
    /// Phase the customer is working on
    pub current_phase: PhaseId,
    /// Phases marked completed
    pub completed_phases: BTreeSet<PhaseId>,
    /// Whether onboarding is closed
    pub is_complete: bool,
    /// Intake data
    pub data: OnboardingData,
    /// Who opened the dossier
    pub created_by: Creator,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last mutation time
    pub last_updated: DateTime<Utc>,
}

impl OnboardingDossier {
    /// Fresh dossier at the first catalog phase
    #[must_use]
    pub fn new(
        catalog: &PhaseCatalog,
        customer_id: CustomerId,
        customer_name: impl Into<String>,
        customer_email: impl Into<String>,
        created_by: Creator,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            customer_name: customer_name.into(),
            customer_email: customer_email.into(),
            current_phase: catalog.first(),
            completed_phases: BTreeSet::new(),
            is_complete: false,
            data: OnboardingData::seeded(catalog),
            created_by,
            created_at: now,
            last_updated: now,
        }
    }

    /// Whether `phase` is marked completed
    #[inline]
    #[must_use]
    pub fn has_completed(&self, phase: PhaseId) -> bool {
        self.completed_phases.contains(&phase)
    }

    /// First catalog phase not yet completed
    #[must_use]
    pub fn next_incomplete_phase(&self, catalog: &PhaseCatalog) -> Option<PhaseId> {
        catalog.ids().find(|p| !self.has_completed(*p))
    }

    /// Required fields of `phase` that are still empty
    #[must_use]
    pub fn missing_required_fields(&self, catalog: &PhaseCatalog, phase: PhaseId) -> Vec<String> {
        let Some(definition) = catalog.get(phase) else {
            return Vec::new();
        };
        let record = self.data.section(definition.section);
        definition
            .required_fields()
            .filter(|name| record.get(*name).map_or(true, FieldValue::is_empty))
            .map(str::to_string)
            .collect()
    }

    /// Check the record invariants against `catalog`
    ///
    /// # Errors
    /// Returns a description of the first violated invariant.
    pub fn check_invariants(&self, catalog: &PhaseCatalog) -> Result<(), String> {
        if !catalog.contains(self.current_phase) {
            return Err(format!("current phase {} is not in the catalog", self.current_phase));
        }
        if let Some(unknown) = self.completed_phases.iter().find(|p| !catalog.contains(**p)) {
            return Err(format!("completed phase {unknown} is not in the catalog"));
        }
        if self.is_complete && self.next_incomplete_phase(catalog).is_some() {
            return Err("marked complete with phases outstanding".to_string());
        }
        if self.last_updated < self.created_at {
            return Err("last update precedes creation".to_string());
        }
        Ok(())
    }
}
