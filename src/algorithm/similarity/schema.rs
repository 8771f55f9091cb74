//! Frozen feature schema shared by the historical pool and query vectors

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::models::exam::normalize_name;
use crate::models::query::PatientQuery;
use crate::models::symptom::names as symptom_names;

/// Kind of a feature column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureKind {
    /// Lab exam value
    Exam,
    /// Symptom flag encoded as 0/1
    Symptom,
}

impl FeatureKind {
    /// Classify a column by name and by whether it holds booleans
    #[must_use]
    pub fn classify(name: &str, is_boolean: bool) -> Self {
        if is_boolean || symptom_names::ALL.contains(&name) {
            Self::Symptom
        } else {
            Self::Exam
        }
    }
}

/// Ordered feature columns; the order is fixed when the schema is built
#[derive(Debug, Clone, Default)]
pub struct FeatureSchema {
    names: Vec<String>,
    kinds: Vec<FeatureKind>,
    index: FxHashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from `(name, kind)` pairs; a repeated name keeps its first position
    pub fn new<S: AsRef<str>>(features: impl IntoIterator<Item = (S, FeatureKind)>) -> Self {
        let mut schema = Self::default();
        for (name, kind) in features {
            let name = normalize_name(name.as_ref());
            if schema.index.contains_key(&name) {
                continue;
            }
            schema.index.insert(name.clone(), schema.names.len());
            schema.names.push(name);
            schema.kinds.push(kind);
        }
        schema
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a feature
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Feature names in schema order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Kind of the feature at a position
    #[must_use]
    pub fn kind(&self, position: usize) -> Option<FeatureKind> {
        self.kinds.get(position).copied()
    }

    /// Encode a query as a feature vector
    ///
    /// Exams take their submitted value and symptoms 1.0/0.0; anything absent is 0.0.
    /// Submitted names the schema does not know are dropped.
    #[must_use]
    pub fn vectorize(&self, query: &PatientQuery) -> Vec<f64> {
        self.names
            .iter()
            .zip(&self.kinds)
            .map(|(name, kind)| match kind {
                FeatureKind::Exam => query
                    .exam_value(name)
                    .filter(|value| value.is_finite())
                    .unwrap_or(0.0),
                FeatureKind::Symptom => {
                    if query.symptoms.is_present(name) {
                        1.0
                    } else {
                        0.0
                    }
                }
            })
            .collect()
    }
}
