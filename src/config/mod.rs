//! Configuration for the diagnostic engine.
//!
//! All calibration parameters (neighbour count, score weights, priority bands and the
//! lab-value multiples used by the clinical rules) live here with their clinical defaults.
//! Configurations can be built in code with [`EngineConfig::builder`] or read from JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DiagnosisError, Result};

/// Score thresholds separating High, Medium and Low priority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityBands {
    /// Scores strictly above this are High
    pub high: f64,
    /// Scores strictly above this (and not High) are Medium
    pub medium: f64,
}

impl Default for PriorityBands {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.4,
        }
    }
}

/// Parameters of the case similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Number of nearest neighbours to retrieve
    pub neighbors: usize,
    /// Weight of the diagnosis frequency among neighbours
    pub frequency_weight: f64,
    /// Weight of the mean similarity of the diagnosis group
    pub similarity_weight: f64,
    /// Restrict the pool to the query's species when species metadata exists
    pub filter_by_species: bool,
    /// Candidate count above which distances are computed in parallel
    pub parallel_threshold: usize,
    /// Maximum number of altered readings appended to each similarity hypothesis
    pub max_altered_criteria: usize,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            neighbors: 10,
            frequency_weight: 0.6,
            similarity_weight: 0.4,
            filter_by_species: true,
            parallel_threshold: 2048,
            max_altered_criteria: 2,
        }
    }
}

/// Multiples of the species normal-high bound used by the clinical rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleThresholds {
    /// Lab elevation that resolves PU/PD to diabetes or kidney disease
    pub pupd_resolution_multiple: f64,
    /// Marked elevation for isolated glucose, creatinine and leukocyte rules
    pub marked_elevation_multiple: f64,
    /// Urea elevation that suggests renal insufficiency
    pub urea_failure_multiple: f64,
    /// Leukocyte elevation that points to periodontal disease
    pub periodontal_leukocytosis_multiple: f64,
    /// Mild leukocyte elevation that, with fever or apathy, points to otitis
    pub mild_leukocytosis_multiple: f64,
    /// Glucose tiers (multiple, bonus) for the cardinal-sign rule, highest first
    pub glucose_tiers: Vec<(f64, f64)>,
    /// How many of the four cardinal signs trigger the cardinal-sign rule
    pub cardinal_sign_minimum: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            pupd_resolution_multiple: 1.2,
            marked_elevation_multiple: 1.5,
            urea_failure_multiple: 2.0,
            periodontal_leukocytosis_multiple: 1.2,
            mild_leukocytosis_multiple: 1.1,
            glucose_tiers: vec![(3.0, 0.7), (2.0, 0.5), (1.5, 0.3)],
            cardinal_sign_minimum: 2,
        }
    }
}

/// Configuration for the diagnostic engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Similarity search parameters
    pub similarity: SimilarityConfig,
    /// Clinical rule calibration
    pub rules: RuleThresholds,
    /// Priority bands
    pub priority: PriorityBands,
    /// Score given to hypotheses raised from critical lab values
    pub critical_score: f64,
    /// Maximum number of hypotheses returned
    pub top_n: usize,
    /// Treat readings of zero or below as "not measured"
    pub treat_non_positive_as_missing: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similarity: SimilarityConfig::default(),
            rules: RuleThresholds::default(),
            priority: PriorityBands::default(),
            critical_score: 0.95,
            top_n: 5,
            treat_non_positive_as_missing: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder for constructing an engine configuration
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every calibration value is usable
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("similarity.frequency_weight", self.similarity.frequency_weight),
            ("similarity.similarity_weight", self.similarity.similarity_weight),
            ("critical_score", self.critical_score),
            ("priority.high", self.priority.high),
            ("priority.medium", self.priority.medium),
        ];
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(DiagnosisError::invalid_config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.priority.medium >= self.priority.high {
            return Err(DiagnosisError::invalid_config(format!(
                "priority.medium ({}) must be below priority.high ({})",
                self.priority.medium, self.priority.high
            )));
        }
        if self.similarity.neighbors == 0 {
            return Err(DiagnosisError::invalid_config(
                "similarity.neighbors must be at least 1",
            ));
        }
        if self.top_n == 0 {
            return Err(DiagnosisError::invalid_config("top_n must be at least 1"));
        }

        let multiples = [
            ("rules.pupd_resolution_multiple", self.rules.pupd_resolution_multiple),
            ("rules.marked_elevation_multiple", self.rules.marked_elevation_multiple),
            ("rules.urea_failure_multiple", self.rules.urea_failure_multiple),
            (
                "rules.periodontal_leukocytosis_multiple",
                self.rules.periodontal_leukocytosis_multiple,
            ),
            (
                "rules.mild_leukocytosis_multiple",
                self.rules.mild_leukocytosis_multiple,
            ),
        ];
        for (name, value) in multiples {
            if !value.is_finite() || value <= 0.0 {
                return Err(DiagnosisError::invalid_config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !(1..=4).contains(&self.rules.cardinal_sign_minimum) {
            return Err(DiagnosisError::invalid_config(format!(
                "rules.cardinal_sign_minimum must be between 1 and 4, got {}",
                self.rules.cardinal_sign_minimum
            )));
        }

        Ok(())
    }
}

impl fmt::Display for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Engine Configuration:")?;
        writeln!(f, "  Neighbours (k): {}", self.similarity.neighbors)?;
        writeln!(
            f,
            "  Similarity weights: frequency {:.2}, similarity {:.2}",
            self.similarity.frequency_weight, self.similarity.similarity_weight
        )?;
        writeln!(f, "  Filter by species: {}", self.similarity.filter_by_species)?;
        writeln!(
            f,
            "  Priority bands: high > {:.2}, medium > {:.2}",
            self.priority.high, self.priority.medium
        )?;
        writeln!(f, "  Critical score: {:.2}", self.critical_score)?;
        writeln!(f, "  Top N: {}", self.top_n)?;
        writeln!(
            f,
            "  PU/PD resolution multiple: {:.2}",
            self.rules.pupd_resolution_multiple
        )?;
        writeln!(
            f,
            "  Marked elevation multiple: {:.2}",
            self.rules.marked_elevation_multiple
        )?;
        writeln!(
            f,
            "  Cardinal sign minimum: {}",
            self.rules.cardinal_sign_minimum
        )?;
        Ok(())
    }
}

/// Builder for constructing an engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the number of nearest neighbours
    #[must_use]
    pub const fn neighbors(mut self, k: usize) -> Self {
        self.config.similarity.neighbors = k;
        self
    }

    /// Set the frequency and similarity weights of similarity scores
    #[must_use]
    pub const fn similarity_weights(mut self, frequency: f64, similarity: f64) -> Self {
        self.config.similarity.frequency_weight = frequency;
        self.config.similarity.similarity_weight = similarity;
        self
    }

    /// Set whether the historical pool is filtered by species
    #[must_use]
    pub const fn filter_by_species(mut self, filter: bool) -> Self {
        self.config.similarity.filter_by_species = filter;
        self
    }

    /// Set the candidate count above which distances are computed in parallel
    #[must_use]
    pub const fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.config.similarity.parallel_threshold = threshold;
        self
    }

    /// Set the priority bands
    #[must_use]
    pub const fn priority_bands(mut self, high: f64, medium: f64) -> Self {
        self.config.priority = PriorityBands { high, medium };
        self
    }

    /// Set the score of critical-value hypotheses
    #[must_use]
    pub const fn critical_score(mut self, score: f64) -> Self {
        self.config.critical_score = score;
        self
    }

    /// Set the maximum number of hypotheses returned
    #[must_use]
    pub const fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Set whether non-positive readings count as not measured
    #[must_use]
    pub const fn treat_non_positive_as_missing(mut self, treat: bool) -> Self {
        self.config.treat_non_positive_as_missing = treat;
        self
    }

    /// Set the clinical rule thresholds
    #[must_use]
    pub fn rules(mut self, rules: RuleThresholds) -> Self {
        self.config.rules = rules;
        self
    }

    /// Set how many cardinal signs trigger the cardinal-sign rule
    #[must_use]
    pub const fn cardinal_sign_minimum(mut self, minimum: usize) -> Self {
        self.config.rules.cardinal_sign_minimum = minimum;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EngineConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
