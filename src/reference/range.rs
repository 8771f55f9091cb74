//! Species-specific reference ranges

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DiagnosisError, Result};
use crate::models::exam::normalize_name;
use crate::models::species::Species;
use crate::models::status::ValueStatus;

/// Factor applied to `normal_low` when a table carries no critical low bound
pub const DERIVED_CRITICAL_LOW_FACTOR: f64 = 0.5;
/// Factor applied to `normal_high` when a table carries no critical high bound
pub const DERIVED_CRITICAL_HIGH_FACTOR: f64 = 2.0;

/// Validated reference interval of one exam for one species
///
/// Always satisfies `critical_low <= normal_low <= normal_high <= critical_high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub species: Species,
    pub exam_name: String,
    pub normal_low: f64,
    pub normal_high: f64,
    pub critical_low: f64,
    pub critical_high: f64,
}

impl ReferenceRange {
    /// Create a validated reference range
    pub fn new(
        species: Species,
        exam_name: &str,
        normal: (f64, f64),
        critical: (f64, f64),
    ) -> Result<Self> {
        let range = Self {
            species,
            exam_name: normalize_name(exam_name),
            normal_low: normal.0,
            normal_high: normal.1,
            critical_low: critical.0,
            critical_high: critical.1,
        };
        range.validate()?;
        Ok(range)
    }

    fn validate(&self) -> Result<()> {
        if self.exam_name.is_empty() {
            return Err(DiagnosisError::invalid_range(
                self.species,
                "",
                "exam name is empty",
            ));
        }

        let bounds = [
            ("critical_low", self.critical_low),
            ("normal_low", self.normal_low),
            ("normal_high", self.normal_high),
            ("critical_high", self.critical_high),
        ];
        if let Some((name, value)) = bounds.iter().find(|(_, value)| !value.is_finite()) {
            return Err(DiagnosisError::invalid_range(
                self.species,
                &self.exam_name,
                format!("{name} is not finite ({value})"),
            ));
        }

        for pair in bounds.windows(2) {
            let (lower_name, lower) = pair[0];
            let (upper_name, upper) = pair[1];
            if lower > upper {
                return Err(DiagnosisError::invalid_range(
                    self.species,
                    &self.exam_name,
                    format!("{lower_name} ({lower}) exceeds {upper_name} ({upper})"),
                ));
            }
        }

        Ok(())
    }

    /// Classify a value against this range
    ///
    /// Critical bounds are inclusive and take precedence over the altered checks.
    #[must_use]
    pub fn classify(&self, value: f64) -> ValueStatus {
        if value <= self.critical_low {
            ValueStatus::CriticalLow
        } else if value >= self.critical_high {
            ValueStatus::CriticalHigh
        } else if value < self.normal_low {
            ValueStatus::AlteredLow
        } else if value > self.normal_high {
            ValueStatus::AlteredHigh
        } else {
            ValueStatus::Normal
        }
    }

    /// Whether a value exceeds `multiple` times the normal high bound
    #[must_use]
    pub fn exceeds_high_multiple(&self, value: f64, multiple: f64) -> bool {
        value > self.normal_high * multiple
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: normal {}-{}, critical <= {} or >= {}",
            self.species,
            self.exam_name,
            self.normal_low,
            self.normal_high,
            self.critical_low,
            self.critical_high
        )
    }
}

/// Unvalidated reference table row, as read from a table or written in code
///
/// Critical bounds are optional; absent ones are derived from the normal range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRangeRow {
    pub species: String,
    pub exam_name: String,
    pub normal_low: f64,
    pub normal_high: f64,
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
}

impl ReferenceRangeRow {
    /// Create a row with only a normal range
    #[must_use]
    pub fn normal(species: &str, exam_name: &str, normal_low: f64, normal_high: f64) -> Self {
        Self {
            species: species.to_string(),
            exam_name: exam_name.to_string(),
            normal_low,
            normal_high,
            critical_low: None,
            critical_high: None,
        }
    }

    /// Add explicit critical bounds
    #[must_use]
    pub const fn with_critical(mut self, critical_low: f64, critical_high: f64) -> Self {
        self.critical_low = Some(critical_low);
        self.critical_high = Some(critical_high);
        self
    }

    /// Resolve the species, derive missing critical bounds and validate
    pub fn into_range(self) -> Result<ReferenceRange> {
        let species: Species = self.species.parse()?;
        let critical_low = self
            .critical_low
            .unwrap_or(self.normal_low * DERIVED_CRITICAL_LOW_FACTOR);
        let critical_high = self
            .critical_high
            .unwrap_or(self.normal_high * DERIVED_CRITICAL_HIGH_FACTOR);

        ReferenceRange::new(
            species,
            &self.exam_name,
            (self.normal_low, self.normal_high),
            (critical_low, critical_high),
        )
    }
}
