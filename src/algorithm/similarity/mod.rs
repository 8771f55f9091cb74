//! Case similarity engine
//!
//! Finds the historical cases closest to a query in standardised feature space and turns
//! the diagnoses of those neighbours into scored hypotheses. The scaler is fitted once on
//! the whole pool and the scaled pool vectors are precomputed, so a query costs one
//! transform plus one pass over the candidate cases.

pub mod neighbors;
pub mod pool;
pub mod scaler;
pub mod schema;

use log::debug;
use smallvec::SmallVec;

use crate::algorithm::critical::AnnotatedReading;
use crate::config::{PriorityBands, SimilarityConfig};
use crate::error::{DiagnosisError, Result};
use crate::models::diagnosis::Diagnosis;
use crate::models::hypothesis::{Hypothesis, HypothesisSource};
use crate::models::query::PatientQuery;
use crate::models::species::Species;

pub use neighbors::{Neighbor, cosine_similarity, nearest_neighbors};
pub use pool::{CaseRecord, HistoricalCase, HistoricalDataset, HistoricalDatasetBuilder};
pub use scaler::StandardScaler;
pub use schema::{FeatureKind, FeatureSchema};

/// Neighbour similarities of one diagnosis group
type GroupSimilarities = SmallVec<[f64; 8]>;

/// Nearest-neighbour index over a historical dataset
#[derive(Debug, Clone)]
pub struct CaseSimilarityEngine {
    dataset: HistoricalDataset,
    scaler: StandardScaler,
    scaled: Vec<Vec<f64>>,
    config: SimilarityConfig,
    bands: PriorityBands,
}

impl CaseSimilarityEngine {
    /// Fit the scaler and precompute the scaled pool
    #[must_use]
    pub fn new(dataset: HistoricalDataset, config: SimilarityConfig, bands: PriorityBands) -> Self {
        let dimension = dataset.schema().len();
        let raw: Vec<Vec<f64>> = dataset
            .cases()
            .iter()
            .map(|case| case.features.clone())
            .collect();
        let scaler = StandardScaler::fit(&raw, dimension);
        let scaled = raw.iter().map(|features| scaler.transform(features)).collect();

        Self {
            dataset,
            scaler,
            scaled,
            config,
            bands,
        }
    }

    #[must_use]
    pub const fn dataset(&self) -> &HistoricalDataset {
        &self.dataset
    }

    /// Pool indices eligible for a species
    ///
    /// Falls back to the whole pool when filtering is off, when the pool has no species
    /// metadata, or when no case matches.
    fn candidates(&self, species: Species) -> Vec<usize> {
        let all = || (0..self.dataset.len()).collect::<Vec<_>>();
        if !self.config.filter_by_species || !self.dataset.has_species() {
            return all();
        }

        let matching: Vec<usize> = self
            .dataset
            .cases()
            .iter()
            .enumerate()
            .filter(|(_, case)| case.species == Some(species))
            .map(|(index, _)| index)
            .collect();

        if matching.is_empty() {
            debug!("No historical {species} cases; comparing against the whole pool");
            all()
        } else {
            matching
        }
    }

    /// Retrieve the nearest neighbours of a query
    pub fn neighbors(&self, query: &PatientQuery) -> Result<Vec<Neighbor>> {
        if self.dataset.is_empty() {
            return Ok(Vec::new());
        }

        let vector = self.dataset.schema().vectorize(query);
        if vector.len() != self.scaler.dimension() {
            return Err(DiagnosisError::DimensionMismatch {
                expected: self.scaler.dimension(),
                actual: vector.len(),
            });
        }
        let scaled_query = self.scaler.transform(&vector);
        let candidates = self.candidates(query.species);

        Ok(nearest_neighbors(
            &scaled_query,
            &self.scaled,
            &candidates,
            self.config.neighbors,
            self.config.parallel_threshold,
        ))
    }

    /// Score one hypothesis per diagnosis found among the nearest neighbours
    ///
    /// Groups keep the order in which their diagnosis first appears among the neighbours.
    /// A query with neither readings nor present symptoms matches nothing.
    pub fn hypotheses(
        &self,
        query: &PatientQuery,
        annotated: &[AnnotatedReading],
    ) -> Result<Vec<Hypothesis>> {
        if query.is_empty() {
            debug!("Query carries no readings or symptoms; skipping similarity search");
            return Ok(Vec::new());
        }
        let neighbors = self.neighbors(query)?;
        if neighbors.is_empty() {
            return Ok(Vec::new());
        }

        let k_eff = neighbors.len() as f64;
        let mut groups: Vec<(&Diagnosis, GroupSimilarities)> = Vec::new();
        for neighbor in &neighbors {
            let diagnosis = &self.dataset.cases()[neighbor.index].diagnosis;
            match groups.iter_mut().find(|(label, _)| *label == diagnosis) {
                Some((_, similarities)) => similarities.push(neighbor.similarity),
                None => groups.push((diagnosis, SmallVec::from_slice(&[neighbor.similarity]))),
            }
        }

        let altered: Vec<String> = annotated
            .iter()
            .filter(|reading| reading.status.is_altered())
            .take(self.config.max_altered_criteria)
            .map(AnnotatedReading::describe)
            .collect();

        let hypotheses = groups
            .into_iter()
            .map(|(diagnosis, similarities)| {
                let count = similarities.len();
                let frequency = count as f64 / k_eff;
                let mean_similarity = similarities.iter().sum::<f64>() / count as f64;
                let score = self.config.frequency_weight * frequency
                    + self.config.similarity_weight * mean_similarity;

                let mut criteria = vec![
                    format!("Found {count} similar cases with this diagnosis"),
                    format!("Mean similarity: {mean_similarity:.2}"),
                    format!("Frequency among similar cases: {:.1}%", frequency * 100.0),
                ];
                criteria.extend(altered.iter().cloned());

                Hypothesis::scored(
                    diagnosis.clone(),
                    score,
                    HypothesisSource::Similarity,
                    criteria,
                    &self.bands,
                )
            })
            .collect();

        Ok(hypotheses)
    }
}
