//! Patient query submitted to the engine

use serde::{Deserialize, Serialize};

use super::exam::ExamReading;
use super::species::Species;
use super::symptom::SymptomSet;

/// A patient's species, lab readings and symptom flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientQuery {
    /// Patient species
    pub species: Species,
    /// Lab readings, at most one per exam name
    pub exams: Vec<ExamReading>,
    /// Symptom flags
    pub symptoms: SymptomSet,
}

impl PatientQuery {
    /// Create an empty query for a species
    #[must_use]
    pub fn new(species: Species) -> Self {
        Self {
            species,
            exams: Vec::new(),
            symptoms: SymptomSet::new(),
        }
    }

    /// Add a lab reading, replacing an earlier reading of the same exam
    #[must_use]
    pub fn with_exam(mut self, exam_name: &str, value: f64) -> Self {
        self.add_exam(ExamReading::new(exam_name, value));
        self
    }

    /// Add a symptom flag
    #[must_use]
    pub fn with_symptom(mut self, name: &str, present: bool) -> Self {
        self.symptoms.insert(name, present);
        self
    }

    /// Add a lab reading, replacing an earlier reading of the same exam
    pub fn add_exam(&mut self, reading: ExamReading) {
        if let Some(existing) = self
            .exams
            .iter_mut()
            .find(|existing| existing.exam_name == reading.exam_name)
        {
            log::debug!(
                "Replacing earlier {} reading {} with {}",
                reading.exam_name,
                existing.value,
                reading.value
            );
            *existing = reading;
        } else {
            self.exams.push(reading);
        }
    }

    /// Look up the submitted value of an exam
    #[must_use]
    pub fn exam_value(&self, exam_name: &str) -> Option<f64> {
        self.exams
            .iter()
            .find(|reading| reading.exam_name == exam_name)
            .map(|reading| reading.value)
    }

    /// Whether the query carries neither readings nor present symptoms
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exams.is_empty() && self.symptoms.none_present()
    }
}
