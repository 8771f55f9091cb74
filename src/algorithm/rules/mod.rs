//! Clinical rule engine
//!
//! Evaluates the rule [`catalog`] against a query. Syndrome rules are tried in order and
//! the first whose trigger holds is the only syndrome that fires; every independent rule
//! whose trigger holds fires too. When nothing fires and no reading raised an emergency,
//! a fallback hypothesis describes what was submitted.

pub mod catalog;
pub mod context;

use log::debug;

use crate::algorithm::critical::AnnotatedReading;
use crate::config::{PriorityBands, RuleThresholds};
use crate::models::diagnosis::Diagnosis;
use crate::models::hypothesis::{Hypothesis, HypothesisSource};
use crate::models::query::PatientQuery;
use crate::models::symptom::display_symptom;

pub use catalog::{Bonus, CATALOG, ClinicalRule, Resolution, RuleGroup};
pub use context::RuleContext;

const INVESTIGATION_SCORE: f64 = 0.4;
const ROUTINE_SCORE: f64 = 0.1;

/// Evaluates a rule catalog with one set of thresholds
#[derive(Debug, Clone)]
pub struct ClinicalRuleEngine {
    catalog: &'static [ClinicalRule],
    thresholds: RuleThresholds,
    bands: PriorityBands,
}

impl ClinicalRuleEngine {
    /// Create an engine over the built-in catalog
    #[must_use]
    pub fn new(thresholds: RuleThresholds, bands: PriorityBands) -> Self {
        Self::with_catalog(CATALOG, thresholds, bands)
    }

    /// Create an engine over a custom catalog
    #[must_use]
    pub const fn with_catalog(
        catalog: &'static [ClinicalRule],
        thresholds: RuleThresholds,
        bands: PriorityBands,
    ) -> Self {
        Self {
            catalog,
            thresholds,
            bands,
        }
    }

    /// Apply every rule, falling back when none fires
    ///
    /// No fallback is emitted next to an emergency raised from a critical reading.
    #[must_use]
    pub fn evaluate(
        &self,
        query: &PatientQuery,
        annotated: &[AnnotatedReading],
    ) -> Vec<Hypothesis> {
        let ctx = RuleContext::new(query, annotated, &self.thresholds);
        let mut syndrome_fired = false;
        let mut hypotheses = Vec::new();

        for rule in self.catalog {
            if rule.group == RuleGroup::Syndrome && syndrome_fired {
                continue;
            }
            if !(rule.trigger)(&ctx) {
                continue;
            }
            if rule.group == RuleGroup::Syndrome {
                syndrome_fired = true;
            }
            debug!("Rule '{}' ({}) fired", rule.name, rule.group);
            hypotheses.push(self.fire(rule, &ctx));
        }

        if hypotheses.is_empty() && !ctx.any_emergency() {
            hypotheses.push(self.fallback(&ctx));
        }
        hypotheses
    }

    fn fire(&self, rule: &ClinicalRule, ctx: &RuleContext<'_>) -> Hypothesis {
        let resolution = (rule.resolve)(ctx);
        let mut score = rule.base_score + resolution.bonus;
        let mut criteria: Vec<String> = rule.headline.iter().map(ToString::to_string).collect();
        criteria.extend(resolution.criteria);

        for bonus in rule.bonuses.iter().filter(|bonus| ctx.has(bonus.symptom)) {
            score += bonus.increment;
            criteria.push(bonus.criterion.to_string());
        }

        Hypothesis::scored(
            resolution.diagnosis,
            score.min(1.0),
            HypothesisSource::Rule,
            criteria,
            &self.bands,
        )
    }

    fn fallback(&self, ctx: &RuleContext<'_>) -> Hypothesis {
        let abnormal: Vec<String> = ctx
            .annotated
            .iter()
            .filter(|annotated| annotated.status.is_abnormal())
            .map(AnnotatedReading::describe)
            .collect();
        let lab_line = if abnormal.is_empty() {
            "Laboratory values within normal limits".to_string()
        } else {
            format!("Abnormal laboratory values: {}", abnormal.join("; "))
        };

        let present: Vec<String> = ctx.query.symptoms.present().map(display_symptom).collect();
        let (diagnosis, score, criteria) = if present.is_empty() {
            (
                Diagnosis::RoutineExam,
                ROUTINE_SCORE,
                vec![
                    "No specific symptoms reported".to_string(),
                    lab_line,
                    "Maintain routine follow-up".to_string(),
                ],
            )
        } else {
            (
                Diagnosis::InvestigationNeeded,
                INVESTIGATION_SCORE,
                vec![
                    format!("Present symptoms: {}", present.join(", ")),
                    lab_line,
                    "Further investigation and follow-up recommended".to_string(),
                ],
            )
        };

        Hypothesis::scored(
            diagnosis,
            score,
            HypothesisSource::Fallback,
            criteria,
            &self.bands,
        )
    }
}
