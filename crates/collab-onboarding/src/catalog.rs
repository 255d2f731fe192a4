//! Phase catalog
//!
//! The ordered list of onboarding phases. Transition logic asks the catalog
//! for `first`, `last` and `next_after`; it never assumes a phase count.

use crate::dossier::{DataSection, FieldValue};
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Phase number, starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseId(pub u8);

impl PhaseId {
    /// Numeric value
    #[inline]
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PhaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for PhaseId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Shape of an intake field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    #[default]
    Text,
    /// List of strings
    List,
}

impl FieldKind {
    /// Empty value of this kind
    #[inline]
    #[must_use]
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::List => FieldValue::List(Vec::new()),
        }
    }
}

/// One intake field collected by a phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field key inside the section record
    pub name: String,
    /// Value shape
    #[serde(default)]
    pub kind: FieldKind,
    /// Whether the phase needs a non-empty value before it is considered ready
    #[serde(default)]
    pub required: bool,
}

impl FieldDefinition {
    /// Optional text field
    #[inline]
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            required: false,
        }
    }

    /// Optional list field
    #[inline]
    #[must_use]
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List,
            required: false,
        }
    }

    /// Mark as required
    #[inline]
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// One onboarding phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinition {
    /// Phase number
    pub id: PhaseId,
    /// Display label
    pub label: String,
    /// Data section this phase fills
    pub section: DataSection,
    /// Fields collected in this phase
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl PhaseDefinition {
    /// Create phase without fields
    #[must_use]
    pub fn new(id: impl Into<PhaseId>, label: impl Into<String>, section: DataSection) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            section,
            fields: Vec::new(),
        }
    }

    /// With field
    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Names of required fields
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().filter(|f| f.required).map(|f| f.name.as_str())
    }
}

/// Ordered, validated list of phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhaseCatalog {
    phases: Vec<PhaseDefinition>,
}

impl PhaseCatalog {
    /// Validate and build a catalog
    ///
    /// # Errors
    /// - `CatalogError::Empty` if `phases` is empty
    /// - `CatalogError::NonConsecutive` unless ids run 1, 2, 3, … in order
    /// - `CatalogError::DuplicateField` if a section declares a field twice
    pub fn new(phases: Vec<PhaseDefinition>) -> Result<Self, CatalogError> {
        if phases.is_empty() {
            return Err(CatalogError::Empty);
        }

        for (idx, phase) in phases.iter().enumerate() {
            let expected = u8::try_from(idx + 1).map_err(|_| CatalogError::TooManyPhases)?;
            if phase.id.0 != expected {
                return Err(CatalogError::NonConsecutive {
                    expected: PhaseId(expected),
                    found: phase.id,
                });
            }
        }

        let mut seen: HashSet<(DataSection, &str)> = HashSet::new();
        for phase in &phases {
            for field in &phase.fields {
                if !seen.insert((phase.section, field.name.as_str())) {
                    return Err(CatalogError::DuplicateField {
                        section: phase.section,
                        field: field.name.clone(),
                    });
                }
            }
        }

        Ok(Self { phases })
    }

    /// First phase
    #[inline]
    #[must_use]
    pub fn first(&self) -> PhaseId {
        self.phases[0].id
    }

    /// Last phase
    #[inline]
    #[must_use]
    pub fn last(&self) -> PhaseId {
        self.phases[self.phases.len() - 1].id
    }

    /// Whether `phase` is part of the catalog
    #[inline]
    #[must_use]
    pub fn contains(&self, phase: PhaseId) -> bool {
        self.get(phase).is_some()
    }

    /// Phase definition by id
    #[must_use]
    pub fn get(&self, phase: PhaseId) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == phase)
    }

    /// Phase following `phase`; `None` for the last phase or unknown ids
    #[must_use]
    pub fn next_after(&self, phase: PhaseId) -> Option<PhaseId> {
        let idx = self.phases.iter().position(|p| p.id == phase)?;
        self.phases.get(idx + 1).map(|p| p.id)
    }

    /// Phase ids in order
    pub fn ids(&self) -> impl Iterator<Item = PhaseId> + '_ {
        self.phases.iter().map(|p| p.id)
    }

    /// Phase definitions in order
    pub fn iter(&self) -> impl Iterator<Item = &PhaseDefinition> {
        self.phases.iter()
    }

    /// Number of phases
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false for a validated catalog
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Fields declared for `section`, across all phases
    pub fn fields_for(&self, section: DataSection) -> impl Iterator<Item = &FieldDefinition> {
        self.phases
            .iter()
            .filter(move |p| p.section == section)
            .flat_map(|p| p.fields.iter())
    }
}

impl Default for PhaseCatalog {
    /// The five-phase customer intake
    fn default() -> Self {
        let phases = vec![
            PhaseDefinition::new(PhaseId(1), "Organization", DataSection::Organization)
                .with_field(FieldDefinition::text("companyName").required())
                .with_field(FieldDefinition::text("industry").required())
                .with_field(FieldDefinition::text("companySize"))
                .with_field(FieldDefinition::text("address"))
                .with_field(FieldDefinition::text("contactPerson").required())
                .with_field(FieldDefinition::text("contactPhone"))
                .with_field(FieldDefinition::text("website")),
            PhaseDefinition::new(PhaseId(2), "Project", DataSection::Project)
                .with_field(FieldDefinition::text("projectName").required())
                .with_field(FieldDefinition::text("projectType").required())
                .with_field(FieldDefinition::text("description").required())
                .with_field(FieldDefinition::text("location"))
                .with_field(FieldDefinition::text("startDate"))
                .with_field(FieldDefinition::text("targetCompletion")),
            PhaseDefinition::new(PhaseId(3), "Requirements", DataSection::Requirements)
                .with_field(FieldDefinition::list("objectives").required())
                .with_field(FieldDefinition::text("scope").required())
                .with_field(FieldDefinition::list("deliverables"))
                .with_field(FieldDefinition::list("constraints"))
                .with_field(FieldDefinition::list("integrations")),
            PhaseDefinition::new(PhaseId(4), "Safety & Compliance", DataSection::Safety)
                .with_field(FieldDefinition::list("safetyStandards").required())
                .with_field(FieldDefinition::list("certifications"))
                .with_field(FieldDefinition::text("riskAssessment").required())
                .with_field(FieldDefinition::text("environmentalRequirements")),
            PhaseDefinition::new(PhaseId(5), "Commercial", DataSection::Commercial)
                .with_field(FieldDefinition::text("budgetRange").required())
                .with_field(FieldDefinition::text("paymentTerms").required())
                .with_field(FieldDefinition::list("decisionMakers"))
                .with_field(FieldDefinition::text("procurementProcess"))
                .with_field(FieldDefinition::text("expectedStartDate")),
        ];

        Self { phases }
    }
}

impl<'de> Deserialize<'de> for PhaseCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let phases = Vec::<PhaseDefinition>::deserialize(deserializer)?;
        PhaseCatalog::new(phases).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_five_phases() {
        let catalog = PhaseCatalog::default();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.first(), PhaseId(1));
        assert_eq!(catalog.last(), PhaseId(5));
        assert!(PhaseCatalog::new(catalog.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn next_after_walks_in_order() {
        let catalog = PhaseCatalog::default();
        assert_eq!(catalog.next_after(PhaseId(1)), Some(PhaseId(2)));
        assert_eq!(catalog.next_after(PhaseId(4)), Some(PhaseId(5)));
        assert_eq!(catalog.next_after(PhaseId(5)), None);
        assert_eq!(catalog.next_after(PhaseId(9)), None);
    }

    #[test]
    fn contains_respects_bounds() {
        let catalog = PhaseCatalog::default();
        assert!(!catalog.contains(PhaseId(0)));
        assert!(catalog.contains(PhaseId(3)));
        assert!(!catalog.contains(PhaseId(6)));
    }

    #[test]
    fn rejects_empty_catalog() {
        assert_eq!(PhaseCatalog::new(vec![]), Err(CatalogError::Empty));
    }

    #[test]
    fn rejects_gaps_in_ids() {
        let result = PhaseCatalog::new(vec![
            PhaseDefinition::new(PhaseId(1), "One", DataSection::Organization),
            PhaseDefinition::new(PhaseId(3), "Three", DataSection::Project),
        ]);
        assert_eq!(
            result,
            Err(CatalogError::NonConsecutive {
                expected: PhaseId(2),
                found: PhaseId(3),
            })
        );
    }

    #[test]
    fn rejects_duplicate_fields_in_section() {
        let result = PhaseCatalog::new(vec![
            PhaseDefinition::new(PhaseId(1), "One", DataSection::Commercial)
                .with_field(FieldDefinition::text("budgetRange")),
            PhaseDefinition::new(PhaseId(2), "Two", DataSection::Commercial)
                .with_field(FieldDefinition::text("budgetRange")),
        ]);
        assert!(matches!(result, Err(CatalogError::DuplicateField { .. })));
    }

    #[test]
    fn shorter_catalog_from_json() {
        let json = r#"[
            {"id": 1, "label": "Company", "section": "organization",
             "fields": [{"name": "companyName", "required": true}]},
            {"id": 2, "label": "Money", "section": "commercial",
             "fields": [{"name": "budgetRange", "kind": "text"}]}
        ]"#;

        let catalog: PhaseCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.last(), PhaseId(2));
        assert_eq!(
            catalog.get(PhaseId(1)).unwrap().required_fields().collect::<Vec<_>>(),
            vec!["companyName"]
        );
    }

    #[test]
    fn invalid_catalog_fails_deserialization() {
        let json = r#"[{"id": 2, "label": "Late start", "section": "project"}]"#;
        assert!(serde_json::from_str::<PhaseCatalog>(json).is_err());
    }
}
