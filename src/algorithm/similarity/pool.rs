//! Historical case pool
//!
//! Cases are stored as dense feature vectors aligned to one [`FeatureSchema`]. Missing
//! values are imputed with the column median when the pool is built, so every vector is
//! complete by the time the similarity engine standardises it.

use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::time::Instant;

use super::schema::{FeatureKind, FeatureSchema};
use crate::error::{DiagnosisError, Result};
use crate::models::diagnosis::Diagnosis;
use crate::models::exam::normalize_name;
use crate::models::species::Species;
use crate::utils::arrow::{extract_f64, extract_strings, is_feature_type};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Columns of a historical table that never become features
pub const METADATA_COLUMNS: &[&str] = &[
    "id",
    "date",
    "species",
    "breed",
    "sex",
    "age_years",
    "diagnosis",
];

const SPECIES_COLUMN: &str = "species";
const DIAGNOSIS_COLUMN: &str = "diagnosis";

/// A past patient record with a known diagnosis
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalCase {
    /// `None` when the source carried no usable species
    pub species: Option<Species>,
    /// Complete feature vector in schema order
    pub features: Vec<f64>,
    pub diagnosis: Diagnosis,
}

/// Historical cases sharing one feature schema
#[derive(Debug, Clone, Default)]
pub struct HistoricalDataset {
    schema: FeatureSchema,
    cases: Vec<HistoricalCase>,
}

impl HistoricalDataset {
    /// A dataset with no cases; similarity search yields nothing against it
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a dataset in code
    #[must_use]
    pub fn builder() -> HistoricalDatasetBuilder {
        HistoricalDatasetBuilder::default()
    }

    #[must_use]
    pub const fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[must_use]
    pub fn cases(&self) -> &[HistoricalCase] {
        &self.cases
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Whether any case carries species metadata
    #[must_use]
    pub fn has_species(&self) -> bool {
        self.cases.iter().any(|case| case.species.is_some())
    }

    /// Read a dataset from an arrow record batch
    ///
    /// `diagnosis` is required; `species` is optional. Every other numeric or boolean
    /// column outside [`METADATA_COLUMNS`] becomes a feature, in column order. Rows
    /// without a diagnosis are skipped.
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        let start = Instant::now();
        log_operation_start("Reading historical cases from", "record batch");

        let diagnoses = extract_strings(batch, DIAGNOSIS_COLUMN, true)?.ok_or_else(|| {
            DiagnosisError::ColumnNotFound {
                column: DIAGNOSIS_COLUMN.to_string(),
            }
        })?;
        let species = extract_strings(batch, SPECIES_COLUMN, false)?;

        let schema_ref = batch.schema();
        let mut features = Vec::new();
        let mut columns = Vec::new();
        for field in schema_ref.fields() {
            let name = normalize_name(field.name());
            if METADATA_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            if !is_feature_type(field.data_type()) {
                debug!(
                    "Skipping non-numeric column '{}' ({:?})",
                    field.name(),
                    field.data_type()
                );
                continue;
            }
            let kind = FeatureKind::classify(&name, *field.data_type() == DataType::Boolean);
            let values = extract_f64(batch, field.name(), true)?.ok_or_else(|| {
                DiagnosisError::ColumnNotFound {
                    column: field.name().to_string(),
                }
            })?;
            features.push((name, kind));
            columns.push(values);
        }

        if features.is_empty() && batch.num_rows() > 0 {
            return Err(DiagnosisError::invalid_dataset(
                "historical table has no numeric feature columns",
            ));
        }

        let schema = FeatureSchema::new(features);
        if schema.len() != columns.len() {
            return Err(DiagnosisError::invalid_dataset(
                "historical table repeats a feature column",
            ));
        }

        let mut rows = Vec::with_capacity(batch.num_rows());
        let mut skipped = 0usize;
        for row in 0..batch.num_rows() {
            let Some(label) = &diagnoses[row] else {
                skipped += 1;
                continue;
            };
            let case_species = species
                .as_ref()
                .and_then(|values| values[row].as_deref())
                .and_then(|label| {
                    let parsed = Species::from_label(label);
                    if parsed.is_none() {
                        debug!("Row {row}: unrecognised species '{label}'");
                    }
                    parsed
                });
            let values = columns.iter().map(|column| column[row]).collect();
            rows.push(PendingCase {
                species: case_species,
                values,
                diagnosis: Diagnosis::from_label(label),
            });
        }

        if skipped > 0 {
            warn!("Skipped {skipped} historical rows without a diagnosis");
        }

        let dataset = Self::impute(schema, rows);
        log_operation_complete("loaded", "historical table", dataset.len(), Some(start.elapsed()));
        Ok(dataset)
    }

    /// Fill missing values with column medians and freeze the pool
    fn impute(schema: FeatureSchema, rows: Vec<PendingCase>) -> Self {
        let medians: Vec<f64> = (0..schema.len())
            .map(|column| {
                let present = rows
                    .iter()
                    .filter_map(|row| row.values[column])
                    .filter(|value| value.is_finite());
                median(present).unwrap_or(0.0)
            })
            .collect();

        let imputed = rows
            .iter()
            .map(|row| {
                row.values
                    .iter()
                    .filter(|value| !value.is_some_and(f64::is_finite))
                    .count()
            })
            .sum::<usize>();
        if imputed > 0 {
            debug!("Imputed {imputed} missing historical values with column medians");
        }

        let cases = rows
            .into_iter()
            .map(|row| HistoricalCase {
                species: row.species,
                features: row
                    .values
                    .iter()
                    .zip(&medians)
                    .map(|(value, median)| value.filter(|v| v.is_finite()).unwrap_or(*median))
                    .collect(),
                diagnosis: row.diagnosis,
            })
            .collect();

        Self { schema, cases }
    }
}

/// Median of the finite values, `None` when there are none
fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let sorted: Vec<f64> = values.sorted_by(f64::total_cmp).collect();
    let mid = sorted.len() / 2;
    match sorted.len() {
        0 => None,
        len if len % 2 == 1 => Some(sorted[mid]),
        _ => Some((sorted[mid - 1] + sorted[mid]) / 2.0),
    }
}

#[derive(Debug)]
struct PendingCase {
    species: Option<Species>,
    values: Vec<Option<f64>>,
    diagnosis: Diagnosis,
}

/// A historical case described by feature name, for [`HistoricalDatasetBuilder`]
#[derive(Debug, Clone)]
pub struct CaseRecord {
    species: Option<Species>,
    diagnosis: Diagnosis,
    values: FxHashMap<String, f64>,
}

impl CaseRecord {
    /// Start a record with its diagnosis label
    #[must_use]
    pub fn new(species: Option<Species>, diagnosis: &str) -> Self {
        Self {
            species,
            diagnosis: Diagnosis::from_label(diagnosis),
            values: FxHashMap::default(),
        }
    }

    /// Set an exam value
    #[must_use]
    pub fn exam(mut self, name: &str, value: f64) -> Self {
        self.values.insert(normalize_name(name), value);
        self
    }

    /// Set a symptom flag
    #[must_use]
    pub fn symptom(mut self, name: &str, present: bool) -> Self {
        self.values
            .insert(normalize_name(name), if present { 1.0 } else { 0.0 });
        self
    }
}

/// Builder for constructing a historical dataset in code
#[derive(Debug, Clone, Default)]
pub struct HistoricalDatasetBuilder {
    features: Vec<(String, FeatureKind)>,
    records: Vec<CaseRecord>,
}

impl HistoricalDatasetBuilder {
    /// Declare an exam feature column
    #[must_use]
    pub fn exam_feature(mut self, name: &str) -> Self {
        self.features.push((normalize_name(name), FeatureKind::Exam));
        self
    }

    /// Declare a symptom feature column
    #[must_use]
    pub fn symptom_feature(mut self, name: &str) -> Self {
        self.features
            .push((normalize_name(name), FeatureKind::Symptom));
        self
    }

    /// Add a case
    #[must_use]
    pub fn case(mut self, record: CaseRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Align records to the declared features and impute missing values
    ///
    /// # Errors
    ///
    /// Fails when a record names a feature that was not declared, or when cases exist
    /// but no features were declared.
    pub fn build(self) -> Result<HistoricalDataset> {
        if self.features.is_empty() && !self.records.is_empty() {
            return Err(DiagnosisError::invalid_dataset(
                "historical cases need at least one feature",
            ));
        }

        let schema = FeatureSchema::new(self.features);
        let mut rows = Vec::with_capacity(self.records.len());
        for (row, record) in self.records.into_iter().enumerate() {
            if let Some(unknown) = record
                .values
                .keys()
                .filter(|name| schema.position(name).is_none())
                .sorted()
                .next()
            {
                return Err(DiagnosisError::invalid_dataset(format!(
                    "case {row} has undeclared feature '{unknown}'"
                )));
            }

            // a symptom left unset on a record was absent
            let values = schema
                .names()
                .iter()
                .enumerate()
                .map(|(position, name)| match record.values.get(name) {
                    Some(value) => Some(*value),
                    None if schema.kind(position) == Some(FeatureKind::Symptom) => Some(0.0),
                    None => None,
                })
                .collect();
            rows.push(PendingCase {
                species: record.species,
                values,
                diagnosis: record.diagnosis,
            });
        }

        if rows.iter().all(|row| row.species.is_none()) && !rows.is_empty() {
            log_warning("Historical cases carry no species", Some("species filter disabled"));
        }

        Ok(HistoricalDataset::impute(schema, rows))
    }
}
