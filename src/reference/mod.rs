//! Reference range registry
//!
//! Maps `(species, exam)` to a validated [`ReferenceRange`]. The registry is built once,
//! from rows written in code, from an arrow record batch or from the packaged default
//! table, and is read-only afterwards. Every table problem is reported at construction.

pub mod defaults;
pub mod range;

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;
use std::time::Instant;

use crate::error::{DiagnosisError, Result};
use crate::models::exam::normalize_name;
use crate::models::species::Species;
use crate::utils::arrow::{extract_f64, extract_strings};
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub use range::{ReferenceRange, ReferenceRangeRow};

/// Column names read by [`ReferenceRangeRegistry::from_record_batch`]
pub mod columns {
    pub const SPECIES: &str = "species";
    pub const EXAM: &str = "exam";
    pub const NORMAL_LOW: &str = "normal_low";
    pub const NORMAL_HIGH: &str = "normal_high";
    pub const CRITICAL_LOW: &str = "critical_low";
    pub const CRITICAL_HIGH: &str = "critical_high";
}

/// Lookup table of reference ranges keyed by species and normalized exam name
#[derive(Debug, Clone, Default)]
pub struct ReferenceRangeRegistry {
    ranges: FxHashMap<(Species, String), ReferenceRange>,
}

impl ReferenceRangeRegistry {
    /// Build a registry from table rows
    ///
    /// # Errors
    ///
    /// Fails on an unknown species label, a range that is not monotone or not finite,
    /// or a species/exam pair that appears more than once.
    pub fn from_rows(rows: impl IntoIterator<Item = ReferenceRangeRow>) -> Result<Self> {
        let start = Instant::now();
        let mut ranges = FxHashMap::default();

        for row in rows {
            let range = row.into_range()?;
            let key = (range.species, range.exam_name.clone());
            if ranges.contains_key(&key) {
                return Err(DiagnosisError::DuplicateReferenceRange {
                    species: range.species.to_string(),
                    exam: range.exam_name,
                });
            }
            ranges.insert(key, range);
        }

        log_operation_complete("loaded", "reference table", ranges.len(), Some(start.elapsed()));
        Ok(Self { ranges })
    }

    /// Build a registry from an arrow record batch
    ///
    /// Reads `species`, `exam`, `normal_low` and `normal_high`, plus the optional nullable
    /// `critical_low` and `critical_high` columns.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        log_operation_start("Reading reference ranges from", "record batch");

        let species = required_strings(batch, columns::SPECIES)?;
        let exams = required_strings(batch, columns::EXAM)?;
        let normal_low = required_f64(batch, columns::NORMAL_LOW)?;
        let normal_high = required_f64(batch, columns::NORMAL_HIGH)?;
        let critical_low = extract_f64(batch, columns::CRITICAL_LOW, false)?;
        let critical_high = extract_f64(batch, columns::CRITICAL_HIGH, false)?;

        let mut rows = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let missing = |column: &str| {
                DiagnosisError::invalid_dataset(format!(
                    "reference table row {row} has no value for '{column}'"
                ))
            };

            rows.push(ReferenceRangeRow {
                species: species[row].clone().ok_or_else(|| missing(columns::SPECIES))?,
                exam_name: exams[row].clone().ok_or_else(|| missing(columns::EXAM))?,
                normal_low: normal_low[row].ok_or_else(|| missing(columns::NORMAL_LOW))?,
                normal_high: normal_high[row].ok_or_else(|| missing(columns::NORMAL_HIGH))?,
                critical_low: critical_low.as_ref().and_then(|values| values[row]),
                critical_high: critical_high.as_ref().and_then(|values| values[row]),
            });
        }

        Self::from_rows(rows)
    }

    /// The packaged default table for canine, feline and equine patients
    pub fn builtin() -> Result<Self> {
        Self::from_rows(defaults::default_rows())
    }

    /// Look up the range of an exam for a species
    ///
    /// The exam name is normalized first; unknown pairs yield `None`.
    #[must_use]
    pub fn lookup(&self, species: Species, exam_name: &str) -> Option<&ReferenceRange> {
        self.ranges.get(&(species, normalize_name(exam_name)))
    }

    /// Number of loaded ranges
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether the registry holds no ranges
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Exam names with a range for the given species, sorted
    #[must_use]
    pub fn exams_for(&self, species: Species) -> Vec<&str> {
        let mut exams: Vec<&str> = self
            .ranges
            .keys()
            .filter(|(range_species, _)| *range_species == species)
            .map(|(_, exam)| exam.as_str())
            .collect();
        exams.sort_unstable();
        exams
    }
}

fn required_strings(batch: &RecordBatch, column: &str) -> Result<Vec<Option<String>>> {
    extract_strings(batch, column, true)?.ok_or_else(|| DiagnosisError::ColumnNotFound {
        column: column.to_string(),
    })
}

fn required_f64(batch: &RecordBatch, column: &str) -> Result<Vec<Option<f64>>> {
    extract_f64(batch, column, true)?.ok_or_else(|| DiagnosisError::ColumnNotFound {
        column: column.to_string(),
    })
}
