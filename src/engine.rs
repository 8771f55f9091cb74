//! Diagnostic engine facade
//!
//! [`DiagnosticEngine`] wires the pipeline together: critical value detection, then case
//! similarity and clinical rules in parallel, then aggregation. It is immutable once built.
//! [`EngineHandle`] lets a running service swap in a rebuilt engine without blocking
//! requests already in flight.

use log::debug;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use crate::algorithm::HypothesisGenerator;
use crate::algorithm::aggregate::HypothesisAggregator;
use crate::algorithm::critical::{AnnotatedReading, CriticalValueDetector, critical_hypotheses};
use crate::algorithm::rules::ClinicalRuleEngine;
use crate::algorithm::similarity::{CaseSimilarityEngine, HistoricalDataset};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::hypothesis::Hypothesis;
use crate::models::query::PatientQuery;
use crate::reference::ReferenceRangeRegistry;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// The hybrid diagnostic pipeline over one registry, one historical pool and one config
pub struct DiagnosticEngine {
    registry: ReferenceRangeRegistry,
    similarity: Box<dyn HypothesisGenerator>,
    rules: Box<dyn HypothesisGenerator>,
    aggregator: HypothesisAggregator,
    config: EngineConfig,
}

impl std::fmt::Debug for DiagnosticEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticEngine")
            .field("reference_ranges", &self.registry.len())
            .field("similarity", &self.similarity.name())
            .field("rules", &self.rules.name())
            .field("config", &self.config)
            .finish()
    }
}

impl DiagnosticEngine {
    /// Build an engine
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate.
    pub fn new(
        registry: ReferenceRangeRegistry,
        dataset: HistoricalDataset,
        config: EngineConfig,
    ) -> Result<Self> {
        let start = Instant::now();
        log_operation_start("Building diagnostic engine over", "historical pool");
        config.validate()?;

        if dataset.is_empty() {
            log_warning(
                "Historical pool is empty",
                Some("similarity hypotheses disabled"),
            );
        }
        let pool_size = dataset.len();

        let similarity =
            CaseSimilarityEngine::new(dataset, config.similarity.clone(), config.priority);
        let rules = ClinicalRuleEngine::new(config.rules.clone(), config.priority);
        let aggregator = HypothesisAggregator::new(config.priority, config.top_n);

        log_operation_complete("indexed", "historical pool", pool_size, Some(start.elapsed()));
        Ok(Self {
            registry,
            similarity: Box::new(similarity),
            rules: Box::new(rules),
            aggregator,
            config,
        })
    }

    /// Build an engine with the packaged reference table and default configuration
    pub fn with_defaults(dataset: HistoricalDataset) -> Result<Self> {
        Self::new(
            ReferenceRangeRegistry::builtin()?,
            dataset,
            EngineConfig::default(),
        )
    }

    /// Replace the similarity generator
    #[must_use]
    pub fn with_similarity(mut self, generator: impl HypothesisGenerator + 'static) -> Self {
        self.similarity = Box::new(generator);
        self
    }

    /// Replace the rule generator
    #[must_use]
    pub fn with_rules(mut self, generator: impl HypothesisGenerator + 'static) -> Self {
        self.rules = Box::new(generator);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &ReferenceRangeRegistry {
        &self.registry
    }

    /// Annotate a query's readings against the registry
    #[must_use]
    pub fn annotate(&self, query: &PatientQuery) -> Vec<AnnotatedReading> {
        CriticalValueDetector::new(&self.registry, self.config.treat_non_positive_as_missing)
            .annotate(query.species, &query.exams)
    }

    /// Rank diagnostic hypotheses for a query
    ///
    /// Never fails: a generator that errors is logged and left out of the answer.
    #[must_use]
    pub fn diagnose(&self, query: &PatientQuery) -> Vec<Hypothesis> {
        let start = Instant::now();
        let annotated = self.annotate(query);
        let critical = critical_hypotheses(&annotated, self.config.critical_score);

        let (similar, rules) = rayon::join(
            || run_generator(self.similarity.as_ref(), query, &annotated),
            || run_generator(self.rules.as_ref(), query, &annotated),
        );

        let candidates: Vec<Hypothesis> =
            critical.into_iter().chain(similar).chain(rules).collect();
        let candidate_count = candidates.len();
        let ranked = self.aggregator.aggregate(candidates);

        debug!(
            "Ranked {} of {candidate_count} {} hypotheses in {:?}",
            ranked.len(),
            query.species,
            start.elapsed()
        );
        ranked
    }
}

fn run_generator(
    generator: &dyn HypothesisGenerator,
    query: &PatientQuery,
    annotated: &[AnnotatedReading],
) -> Vec<Hypothesis> {
    match generator.generate(query, annotated) {
        Ok(hypotheses) => hypotheses,
        Err(err) => {
            log_warning(
                &format!("Hypothesis generator '{}' failed", generator.name()),
                Some(&err.to_string()),
            );
            Vec::new()
        }
    }
}

/// Shared, swappable reference to the current engine
#[derive(Debug)]
pub struct EngineHandle {
    current: RwLock<Arc<DiagnosticEngine>>,
}

impl EngineHandle {
    #[must_use]
    pub fn new(engine: DiagnosticEngine) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    /// The engine serving requests right now
    #[must_use]
    pub fn current(&self) -> Arc<DiagnosticEngine> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Diagnose with the current engine
    #[must_use]
    pub fn diagnose(&self, query: &PatientQuery) -> Vec<Hypothesis> {
        self.current().diagnose(query)
    }

    /// Swap in a new engine, returning the one it replaces
    ///
    /// Requests holding the previous engine finish against it.
    pub fn replace(&self, engine: DiagnosticEngine) -> Arc<DiagnosticEngine> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(engine))
    }

    /// Build a new engine and swap it in
    ///
    /// On error the current engine keeps serving.
    pub fn reload(
        &self,
        registry: ReferenceRangeRegistry,
        dataset: HistoricalDataset,
        config: EngineConfig,
    ) -> Result<()> {
        let engine = DiagnosticEngine::new(registry, dataset, config)?;
        self.replace(engine);
        Ok(())
    }
}
