//! Critical value detection
//!
//! Annotates every submitted reading with its [`ValueStatus`] against the species
//! reference range, then maps critical readings to emergency hypotheses through the
//! table in [`emergency`].

pub mod emergency;

use log::{debug, warn};
use serde::Serialize;

use crate::models::exam::ExamReading;
use crate::models::species::Species;
use crate::models::status::ValueStatus;
use crate::reference::{ReferenceRange, ReferenceRangeRegistry};

pub use emergency::{EMERGENCY_TABLE, EmergencyEntry, critical_hypotheses};

/// A reading together with its classification and the range it was classified against
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedReading {
    pub reading: ExamReading,
    pub status: ValueStatus,
    /// `None` when the exam has no range for the species or the reading was not classified
    pub range: Option<ReferenceRange>,
}

impl AnnotatedReading {
    /// Human-readable description used in hypothesis criteria
    ///
    /// e.g. `creatinine: 3.2 (critically high, threshold >= 3.0)`
    #[must_use]
    pub fn describe(&self) -> String {
        let name = &self.reading.exam_name;
        let value = format_value(self.reading.value);
        let Some(range) = &self.range else {
            return format!("{name}: {value} ({})", self.status);
        };

        match self.status {
            ValueStatus::CriticalHigh => format!(
                "{name}: {value} ({}, threshold >= {})",
                self.status,
                format_value(range.critical_high)
            ),
            ValueStatus::CriticalLow => format!(
                "{name}: {value} ({}, threshold <= {})",
                self.status,
                format_value(range.critical_low)
            ),
            ValueStatus::AlteredLow | ValueStatus::AlteredHigh => format!(
                "{name}: {value} ({}, reference {}-{})",
                self.status,
                format_value(range.normal_low),
                format_value(range.normal_high)
            ),
            ValueStatus::Normal | ValueStatus::Unknown => {
                format!("{name}: {value} ({})", self.status)
            }
        }
    }

    /// Whether the reading exceeds `multiple` times its normal high bound
    #[must_use]
    pub fn exceeds_high_multiple(&self, multiple: f64) -> bool {
        self.range
            .as_ref()
            .is_some_and(|range| range.exceeds_high_multiple(self.reading.value, multiple))
    }
}

/// Format a lab value, keeping one decimal for whole numbers
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Classifies readings against the reference ranges of one registry
#[derive(Debug, Clone, Copy)]
pub struct CriticalValueDetector<'a> {
    registry: &'a ReferenceRangeRegistry,
    treat_non_positive_as_missing: bool,
}

impl<'a> CriticalValueDetector<'a> {
    /// Create a detector over a registry
    #[must_use]
    pub const fn new(
        registry: &'a ReferenceRangeRegistry,
        treat_non_positive_as_missing: bool,
    ) -> Self {
        Self {
            registry,
            treat_non_positive_as_missing,
        }
    }

    /// Annotate every reading, in submission order
    ///
    /// Unknown exams, non-finite values and (optionally) non-positive values are passed
    /// through with [`ValueStatus::Unknown`].
    #[must_use]
    pub fn annotate(&self, species: Species, readings: &[ExamReading]) -> Vec<AnnotatedReading> {
        readings
            .iter()
            .map(|reading| self.annotate_one(species, reading))
            .collect()
    }

    fn annotate_one(&self, species: Species, reading: &ExamReading) -> AnnotatedReading {
        let unknown = || AnnotatedReading {
            reading: reading.clone(),
            status: ValueStatus::Unknown,
            range: None,
        };

        if !reading.value.is_finite() {
            warn!(
                "Ignoring non-finite {} reading ({})",
                reading.exam_name, reading.value
            );
            return unknown();
        }
        if self.treat_non_positive_as_missing && reading.value <= 0.0 {
            debug!(
                "Treating {} reading {} as not measured",
                reading.exam_name, reading.value
            );
            return unknown();
        }

        match self.registry.lookup(species, &reading.exam_name) {
            Some(range) => AnnotatedReading {
                reading: reading.clone(),
                status: range.classify(reading.value),
                range: Some(range.clone()),
            },
            None => {
                debug!("No {species} reference range for '{}'", reading.exam_name);
                unknown()
            }
        }
    }
}
