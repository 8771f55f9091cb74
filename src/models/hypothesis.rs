//! Diagnostic hypotheses produced by the engine

use serde::{Deserialize, Serialize};
use std::fmt;

use super::diagnosis::Diagnosis;
use crate::config::PriorityBands;

/// Priority tier of a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Emitted only for critical lab values; bypasses the score bands
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Rank used for ordering (higher ranks sort first)
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Band a score into High, Medium or Low
    #[must_use]
    pub fn from_score(score: f64, bands: &PriorityBands) -> Self {
        if score > bands.high {
            Self::High
        } else if score > bands.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Get the display label for this priority
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which signal source produced a hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HypothesisSource {
    /// Mapped from a critical lab value
    CriticalValue,
    /// Aggregated from similar historical cases
    Similarity,
    /// Produced by a clinical syndrome rule
    Rule,
    /// Emitted when no rule fired
    Fallback,
}

impl fmt::Display for HypothesisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CriticalValue => "critical value",
            Self::Similarity => "similar cases",
            Self::Rule => "clinical rule",
            Self::Fallback => "fallback",
        };
        write!(f, "{label}")
    }
}

/// A candidate diagnosis with its score, priority and supporting evidence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hypothesis {
    /// Diagnosis label
    pub diagnosis: Diagnosis,
    /// Confidence score in `[0, 1]`
    pub score: f64,
    /// Priority tier
    pub priority: Priority,
    /// Human-readable supporting criteria, in the order they were established
    pub criteria: Vec<String>,
    /// Signal source
    pub source: HypothesisSource,
}

impl Hypothesis {
    /// Create a hypothesis whose priority is banded from its score
    #[must_use]
    pub fn scored(
        diagnosis: Diagnosis,
        score: f64,
        source: HypothesisSource,
        criteria: Vec<String>,
        bands: &PriorityBands,
    ) -> Self {
        let score = clamp_score(score);
        Self {
            diagnosis,
            score,
            priority: Priority::from_score(score, bands),
            criteria,
            source,
        }
    }

    /// Create a critical-priority hypothesis from a critical lab value
    #[must_use]
    pub fn critical(diagnosis: Diagnosis, score: f64, criteria: Vec<String>) -> Self {
        Self {
            diagnosis,
            score: clamp_score(score),
            priority: Priority::Critical,
            criteria,
            source: HypothesisSource::CriticalValue,
        }
    }

    /// Whether this hypothesis carries critical priority
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.priority == Priority::Critical
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (score {:.2}, {}, {})",
            self.diagnosis, self.score, self.priority, self.source
        )?;
        for criterion in &self.criteria {
            writeln!(f, "  - {criterion}")?;
        }
        Ok(())
    }
}

/// Clamp a score into `[0, 1]`, mapping NaN to zero
#[must_use]
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}
