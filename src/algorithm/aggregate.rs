//! Merging hypotheses from all sources into one ranked list

use itertools::Itertools;
use std::cmp::Ordering;

use crate::config::PriorityBands;
use crate::models::hypothesis::{Hypothesis, HypothesisSource, Priority};

/// Deduplicates, re-bands, orders and truncates hypotheses
#[derive(Debug, Clone, Copy)]
pub struct HypothesisAggregator {
    bands: PriorityBands,
    top_n: usize,
}

impl HypothesisAggregator {
    #[must_use]
    pub const fn new(bands: PriorityBands, top_n: usize) -> Self {
        Self { bands, top_n }
    }

    /// Merge hypotheses given in source order (critical, similarity, rules)
    ///
    /// One hypothesis survives per diagnosis: the higher score wins and the first seen
    /// wins ties, criteria of both are kept in order without repeats, and critical
    /// priority is never lost. The result is ordered by priority rank then score.
    #[must_use]
    pub fn aggregate(&self, hypotheses: Vec<Hypothesis>) -> Vec<Hypothesis> {
        let mut merged: Vec<Hypothesis> = Vec::with_capacity(hypotheses.len());

        for candidate in hypotheses {
            match merged
                .iter()
                .position(|existing| existing.diagnosis == candidate.diagnosis)
            {
                Some(index) => merge_into(&mut merged[index], candidate),
                None => merged.push(candidate),
            }
        }

        for hypothesis in &mut merged {
            if hypothesis.priority != Priority::Critical {
                hypothesis.priority = Priority::from_score(hypothesis.score, &self.bands);
            }
        }

        merged.sort_by(compare_rank);
        merged.truncate(self.top_n);
        merged
    }
}

fn merge_into(existing: &mut Hypothesis, candidate: Hypothesis) {
    let critical = existing.is_critical() || candidate.is_critical();
    let other_criteria = if candidate.score > existing.score {
        std::mem::replace(existing, candidate).criteria
    } else {
        candidate.criteria
    };

    let criteria = std::mem::take(&mut existing.criteria);
    existing.criteria = criteria.into_iter().chain(other_criteria).unique().collect();
    if critical {
        existing.priority = Priority::Critical;
        existing.source = HypothesisSource::CriticalValue;
    }
}

/// Priority rank descending, then score descending; stable sorting keeps input order on ties
fn compare_rank(a: &Hypothesis, b: &Hypothesis) -> Ordering {
    b.priority
        .rank()
        .cmp(&a.priority.rank())
        .then_with(|| b.score.total_cmp(&a.score))
}
