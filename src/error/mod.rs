//! Error handling for the diagnostic engine.
//!
//! Every variant here is raised while an engine is being constructed (reference tables,
//! historical datasets, calibration values). Request-time problems such as unknown exam
//! names are recovered locally and never surface as errors.

use arrow::error::ArrowError;

/// Specialized error type for the diagnostic engine
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisError {
    /// A reference range violates `critical_low <= normal_low <= normal_high <= critical_high`
    #[error("Invalid reference range for {species} '{exam}': {reason}")]
    InvalidReferenceRange {
        species: String,
        exam: String,
        reason: String,
    },

    /// The same species/exam pair appears twice in a reference table
    #[error("Duplicate reference range for {species} '{exam}'")]
    DuplicateReferenceRange { species: String, exam: String },

    /// A species label that cannot be mapped to a known species
    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    /// A historical dataset that cannot back a similarity index
    #[error("Invalid historical dataset: {0}")]
    InvalidDataset(String),

    /// A required column is missing from a record batch
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A column exists but has an unusable data type
    #[error("Column '{column}' is not a {expected} array")]
    ColumnType { column: String, expected: String },

    /// Calibration values out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Query and pool vectors disagree on the feature schema
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Error raised by arrow while reading a record batch
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error parsing JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DiagnosisError {
    /// Create an invalid reference range error
    pub fn invalid_range(
        species: impl ToString,
        exam: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidReferenceRange {
            species: species.to_string(),
            exam: exam.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid dataset error
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::InvalidDataset(message.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether this error came from a broken configuration table rather than bad data
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidReferenceRange { .. }
                | Self::DuplicateReferenceRange { .. }
                | Self::UnknownSpecies(_)
                | Self::InvalidConfig(_)
        )
    }
}

/// Result type for diagnostic engine operations
pub type Result<T> = std::result::Result<T, DiagnosisError>;
