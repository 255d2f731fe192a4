//! Collab Onboarding
//!
//! Sequential customer intake. Each customer gets one [`OnboardingDossier`]
//! that walks through the phases of a [`PhaseCatalog`] (five by default):
//!
//! ```text
//! start ─► 1 Organization ─► 2 Project ─► 3 Requirements ─► 4 Safety ─► 5 Commercial
//!                                                                      │
//!                                        complete_onboarding ◄─────────┘
//! ```
//!
//! - Completed phases only ever grow.
//! - Starting twice for the same customer resumes the existing dossier.
//! - Intake data is merged section by section.
//! - Mutations apply to the active dossier and report
//!   [`OnboardingError::NoActiveDossier`] when there is none.
//!
//! # Example
//!
//! ```rust
//! use collab_onboarding::{Creator, DataSection, OnboardingStore, PhaseId};
//!
//! let store = OnboardingStore::new();
//! store.start_onboarding("c-9", "Initech", "it@initech.io", Creator::Customer)?;
//! store.update_onboarding_data(DataSection::Organization, [("companyName", "Initech")])?;
//! let dossier = store.complete_phase(PhaseId(1))?;
//!
//! assert_eq!(dossier.current_phase, PhaseId(2));
//! # Ok::<(), collab_onboarding::OnboardingError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod dossier;
pub mod error;
pub mod store;

pub use catalog::{FieldDefinition, FieldKind, PhaseCatalog, PhaseDefinition, PhaseId};
pub use dossier::{
    Creator, DataSection, FieldValue, OnboardingData, OnboardingDossier, SectionRecord,
};
pub use error::{CatalogError, OnboardingError};
pub use store::{OnboardingStore, StartOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
