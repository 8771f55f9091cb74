//! Emergency mapping from critical readings to diagnoses

use log::debug;

use super::AnnotatedReading;
use crate::models::diagnosis::Diagnosis;
use crate::models::exam::names;
use crate::models::hypothesis::Hypothesis;
use crate::models::status::Direction;

/// One row of the emergency table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencyEntry {
    pub exam: &'static str,
    pub direction: Direction,
    pub diagnosis: Diagnosis,
}

const fn entry(exam: &'static str, direction: Direction, diagnosis: Diagnosis) -> EmergencyEntry {
    EmergencyEntry {
        exam,
        direction,
        diagnosis,
    }
}

/// Critical readings that map to an emergency diagnosis
pub const EMERGENCY_TABLE: &[EmergencyEntry] = &[
    entry(names::CREATININE, Direction::High, Diagnosis::AcuteRenalFailure),
    entry(names::GLUCOSE, Direction::Low, Diagnosis::CriticalHypoglycemia),
    entry(names::GLUCOSE, Direction::High, Diagnosis::CriticalHyperglycemia),
    entry(names::UREA, Direction::High, Diagnosis::SevereAzotemia),
    entry(names::HEMOGLOBIN, Direction::Low, Diagnosis::SevereAnemia),
    entry(names::HEMATOCRIT, Direction::Low, Diagnosis::SevereAnemia),
    entry(names::LEUKOCYTES, Direction::Low, Diagnosis::SevereLeukopenia),
    entry(names::ALBUMIN, Direction::Low, Diagnosis::SevereHypoalbuminemia),
    entry(names::ALT, Direction::High, Diagnosis::AcuteHepatocellularInjury),
];

/// Look up the emergency diagnosis for a critical deviation
#[must_use]
pub fn emergency_for(exam: &str, direction: Direction) -> Option<&'static Diagnosis> {
    EMERGENCY_TABLE
        .iter()
        .find(|entry| entry.exam == exam && entry.direction == direction)
        .map(|entry| &entry.diagnosis)
}

/// Build one critical hypothesis per critical reading that has a table entry
#[must_use]
pub fn critical_hypotheses(annotated: &[AnnotatedReading], score: f64) -> Vec<Hypothesis> {
    annotated
        .iter()
        .filter(|reading| reading.status.is_critical())
        .filter_map(|reading| {
            let direction = reading.status.direction()?;
            let Some(diagnosis) = emergency_for(&reading.reading.exam_name, direction) else {
                debug!(
                    "Critical {} reading has no emergency mapping",
                    reading.reading.exam_name
                );
                return None;
            };
            Some(Hypothesis::critical(
                diagnosis.clone(),
                score,
                vec![
                    reading.describe(),
                    "Critical value detected".to_string(),
                    "Immediate attention required".to_string(),
                ],
            ))
        })
        .collect()
}
