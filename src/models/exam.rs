//! Laboratory exam readings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical exam names used by the built-in reference table and the rule catalog
pub mod names {
    pub const CREATININE: &str = "creatinine";
    pub const UREA: &str = "urea";
    pub const GLUCOSE: &str = "glucose";
    pub const HEMOGLOBIN: &str = "hemoglobin";
    pub const HEMATOCRIT: &str = "hematocrit";
    pub const LEUKOCYTES: &str = "leukocytes";
    pub const ALT: &str = "alt";
    pub const ALBUMIN: &str = "albumin";
    pub const PLATELETS: &str = "platelets";
    pub const AST: &str = "ast";
    pub const ALKALINE_PHOSPHATASE: &str = "alkaline_phosphatase";
    pub const TOTAL_PROTEIN: &str = "total_protein";
    pub const CHOLESTEROL: &str = "cholesterol";
    pub const TRIGLYCERIDES: &str = "triglycerides";
}

/// Normalize an exam or symptom name for lookups
///
/// Names are trimmed, lower-cased, and spaces or dashes become underscores, so
/// `"Alkaline Phosphatase"` and `"alkaline_phosphatase"` refer to the same exam.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// A submitted lab observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamReading {
    /// Normalized exam name
    pub exam_name: String,
    /// Measured value
    pub value: f64,
}

impl ExamReading {
    /// Create a new reading, normalizing the exam name
    #[must_use]
    pub fn new(exam_name: impl AsRef<str>, value: f64) -> Self {
        Self {
            exam_name: normalize_name(exam_name.as_ref()),
            value,
        }
    }
}

impl fmt::Display for ExamReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.1}", self.exam_name, self.value)
    }
}
