//! Data models for the diagnostic engine
//!
//! Inputs (species, readings, symptoms), derived annotations (value status) and
//! outputs (hypotheses with their closed diagnosis vocabulary).

pub mod diagnosis;
pub mod exam;
pub mod hypothesis;
pub mod query;
pub mod species;
pub mod status;
pub mod symptom;

pub use diagnosis::Diagnosis;
pub use exam::ExamReading;
pub use hypothesis::{Hypothesis, HypothesisSource, Priority};
pub use query::PatientQuery;
pub use species::Species;
pub use status::{Direction, ValueStatus};
pub use symptom::SymptomSet;
