//! Error types for onboarding
//!
//! Every failed mutation leaves the store untouched; the error only makes
//! the refusal observable to the caller.

use crate::catalog::PhaseId;
use crate::dossier::DataSection;
use collab_model::CustomerId;

/// Onboarding store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OnboardingError {
    /// Mutation attempted before any dossier was started or selected
    #[error("no active onboarding dossier")]
    NoActiveDossier,

    /// No dossier exists for this customer
    #[error("no onboarding dossier for customer {0}")]
    UnknownCustomer(CustomerId),

    /// Phase is not part of the catalog
    #[error("phase {phase} outside catalog range {first}..={last}")]
    PhaseOutOfRange {
        /// Requested phase
        phase: PhaseId,
        /// First catalog phase
        first: PhaseId,
        /// Last catalog phase
        last: PhaseId,
    },

    /// Customer id was empty
    #[error("customer id must not be empty")]
    EmptyCustomerId,

    /// Restoring a dossier whose key is taken
    #[error("onboarding dossier for customer {0} already exists")]
    DuplicateDossier(CustomerId),

    /// Restored dossier violates an invariant
    #[error("invalid onboarding dossier for customer {customer_id}: {reason}")]
    InvalidDossier {
        /// Offending dossier key
        customer_id: CustomerId,
        /// Violated invariant
        reason: String,
    },
}

impl OnboardingError {
    /// Whether the error stems from a missing dossier link
    #[inline]
    #[must_use]
    pub fn is_missing_link(&self) -> bool {
        matches!(self, Self::NoActiveDossier | Self::UnknownCustomer(_))
    }

    /// Whether the caller passed a bad argument
    #[inline]
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::PhaseOutOfRange { .. } | Self::EmptyCustomerId | Self::InvalidDossier { .. }
        )
    }
}

/// Phase catalog validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// No phases declared
    #[error("phase catalog is empty")]
    Empty,

    /// Phase ids must be 1, 2, 3, … in order
    #[error("expected phase {expected}, found {found}")]
    NonConsecutive {
        /// Id expected at this position
        expected: PhaseId,
        /// Id found
        found: PhaseId,
    },

    /// More phases than a phase id can number
    #[error("phase catalog exceeds {} phases", u8::MAX)]
    TooManyPhases,

    /// Field declared twice in one section
    #[error("field {field} declared twice in section {section}")]
    DuplicateField {
        /// Section
        section: DataSection,
        /// Field name
        field: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_error_display() {
        let err = OnboardingError::PhaseOutOfRange {
            phase: PhaseId(7),
            first: PhaseId(1),
            last: PhaseId(5),
        };
        assert_eq!(err.to_string(), "phase 7 outside catalog range 1..=5");
    }

    #[test]
    fn onboarding_error_classification() {
        assert!(OnboardingError::NoActiveDossier.is_missing_link());
        assert!(OnboardingError::UnknownCustomer("c-1".into()).is_missing_link());
        assert!(!OnboardingError::EmptyCustomerId.is_missing_link());
        assert!(OnboardingError::EmptyCustomerId.is_caller_error());
        assert!(!OnboardingError::DuplicateDossier("c-1".into()).is_caller_error());
    }
}
