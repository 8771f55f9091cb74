//! Algorithms of the diagnostic pipeline
//!
//! Critical value detection runs first and annotates the readings. Case similarity and
//! the clinical rules then generate hypotheses independently from the same annotated
//! query, and the aggregator merges everything into one ranked list.

pub mod aggregate;
pub mod critical;
pub mod rules;
pub mod similarity;

use crate::error::Result;
use crate::models::hypothesis::Hypothesis;
use crate::models::query::PatientQuery;

use critical::AnnotatedReading;

/// A producer of hypotheses from an annotated query
///
/// A generator that fails is skipped for that request; the others still answer.
pub trait HypothesisGenerator: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &'static str;

    /// Generate hypotheses for one query
    fn generate(&self, query: &PatientQuery, annotated: &[AnnotatedReading])
    -> Result<Vec<Hypothesis>>;
}

impl HypothesisGenerator for similarity::CaseSimilarityEngine {
    fn name(&self) -> &'static str {
        "case similarity"
    }

    fn generate(
        &self,
        query: &PatientQuery,
        annotated: &[AnnotatedReading],
    ) -> Result<Vec<Hypothesis>> {
        self.hypotheses(query, annotated)
    }
}

impl HypothesisGenerator for rules::ClinicalRuleEngine {
    fn name(&self) -> &'static str {
        "clinical rules"
    }

    fn generate(
        &self,
        query: &PatientQuery,
        annotated: &[AnnotatedReading],
    ) -> Result<Vec<Hypothesis>> {
        Ok(self.evaluate(query, annotated))
    }
}
