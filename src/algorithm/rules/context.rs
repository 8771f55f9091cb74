//! Inputs shared by every clinical rule during one evaluation

use crate::algorithm::critical::AnnotatedReading;
use crate::algorithm::critical::emergency::emergency_for;
use crate::config::RuleThresholds;
use crate::models::query::PatientQuery;
use crate::models::status::Direction;

/// Query, annotated readings and thresholds seen by rule triggers and resolvers
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub query: &'a PatientQuery,
    pub annotated: &'a [AnnotatedReading],
    pub thresholds: &'a RuleThresholds,
}

impl<'a> RuleContext<'a> {
    #[must_use]
    pub const fn new(
        query: &'a PatientQuery,
        annotated: &'a [AnnotatedReading],
        thresholds: &'a RuleThresholds,
    ) -> Self {
        Self {
            query,
            annotated,
            thresholds,
        }
    }

    /// Whether a symptom is present
    #[must_use]
    pub fn has(&self, symptom: &str) -> bool {
        self.query.symptoms.is_present(symptom)
    }

    /// How many of the given symptoms are present
    #[must_use]
    pub fn count(&self, symptoms: &[&str]) -> usize {
        self.query.symptoms.count_present(symptoms)
    }

    /// The annotated reading of an exam, if it was submitted
    #[must_use]
    pub fn reading(&self, exam: &str) -> Option<&'a AnnotatedReading> {
        self.annotated
            .iter()
            .find(|annotated| annotated.reading.exam_name == exam)
    }

    /// Whether an exam was classified and exceeds `multiple` times its normal high bound
    #[must_use]
    pub fn exceeds(&self, exam: &str, multiple: f64) -> bool {
        self.reading(exam)
            .is_some_and(|annotated| annotated.exceeds_high_multiple(multiple))
    }

    /// Whether an exam was classified below its normal range
    #[must_use]
    pub fn is_low(&self, exam: &str) -> bool {
        self.reading(exam)
            .is_some_and(|annotated| annotated.status.direction() == Some(Direction::Low))
    }

    /// `"<label> (<value> - normal: <high>)"` for a classified exam
    #[must_use]
    pub fn elevated(&self, label: &str, exam: &str) -> Option<String> {
        let annotated = self.reading(exam)?;
        let range = annotated.range.as_ref()?;
        Some(format!(
            "{label} ({:.1} - normal: {})",
            annotated.reading.value, range.normal_high
        ))
    }

    /// Whether any reading is critical
    #[must_use]
    pub fn any_critical(&self) -> bool {
        self.annotated.iter().any(|a| a.status.is_critical())
    }

    /// Whether any critical reading maps to an emergency diagnosis
    #[must_use]
    pub fn any_emergency(&self) -> bool {
        self.annotated.iter().any(|a| {
            a.status.is_critical()
                && a.status
                    .direction()
                    .and_then(|direction| emergency_for(&a.reading.exam_name, direction))
                    .is_some()
        })
    }

    /// Readings outside the normal range that are not critical
    pub fn altered(self) -> impl Iterator<Item = &'a AnnotatedReading> {
        self.annotated.iter().filter(|a| a.status.is_altered())
    }
}
