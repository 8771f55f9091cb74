//! The clinical rule catalog
//!
//! Each rule is a descriptor: a trigger predicate, a base score, the corroborating
//! symptoms that raise it, and a resolver that picks the diagnosis label. Syndrome rules
//! are mutually exclusive and tried in catalog order; independent rules are all tried.

use std::fmt;

use super::context::RuleContext;
use crate::models::diagnosis::Diagnosis;
use crate::models::exam::names as exam;
use crate::models::symptom::names as symptom;

/// Precedence group of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleGroup {
    /// At most one syndrome rule fires per query, the first in catalog order
    Syndrome,
    /// Fires whenever its trigger holds
    Independent,
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syndrome => write!(f, "syndrome"),
            Self::Independent => write!(f, "independent"),
        }
    }
}

/// A corroborating symptom that raises a rule's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    pub symptom: &'static str,
    pub increment: f64,
    pub criterion: &'static str,
}

const fn bonus(symptom: &'static str, increment: f64, criterion: &'static str) -> Bonus {
    Bonus {
        symptom,
        increment,
        criterion,
    }
}

/// Diagnosis chosen by a rule plus any label-specific score and criteria
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub diagnosis: Diagnosis,
    pub bonus: f64,
    pub criteria: Vec<String>,
}

impl Resolution {
    fn label(diagnosis: Diagnosis) -> Self {
        Self {
            diagnosis,
            bonus: 0.0,
            criteria: Vec::new(),
        }
    }

    fn with_bonus(mut self, bonus: f64) -> Self {
        self.bonus = bonus;
        self
    }

    fn with_criteria(mut self, criteria: impl IntoIterator<Item = String>) -> Self {
        self.criteria.extend(criteria);
        self
    }
}

/// Declarative description of one clinical rule
#[derive(Clone, Copy)]
pub struct ClinicalRule {
    pub name: &'static str,
    pub group: RuleGroup,
    /// Criteria listed first whenever the rule fires
    pub headline: &'static [&'static str],
    pub base_score: f64,
    pub trigger: fn(&RuleContext<'_>) -> bool,
    pub bonuses: &'static [Bonus],
    pub resolve: fn(&RuleContext<'_>) -> Resolution,
}

impl fmt::Debug for ClinicalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClinicalRule")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("base_score", &self.base_score)
            .finish_non_exhaustive()
    }
}

const CARDINAL_SIGNS: &[&str] = &[
    symptom::POLYURIA,
    symptom::POLYDIPSIA,
    symptom::WEIGHT_LOSS,
    symptom::APATHY,
];

/// Rules in evaluation order
pub const CATALOG: &[ClinicalRule] = &[
    ClinicalRule {
        name: "pu_pd",
        group: RuleGroup::Syndrome,
        headline: &["PU/PD syndrome (polyuria + polydipsia)"],
        base_score: 0.7,
        trigger: |ctx| ctx.has(symptom::POLYURIA) && ctx.has(symptom::POLYDIPSIA),
        bonuses: &[
            bonus(symptom::WEIGHT_LOSS, 0.15, "Weight loss"),
            bonus(symptom::APATHY, 0.1, "Apathy"),
        ],
        resolve: resolve_pupd,
    },
    ClinicalRule {
        name: "consumptive",
        group: RuleGroup::Syndrome,
        headline: &[
            "Consumptive syndrome (weight loss + apathy)",
            "Investigate metabolic, neoplastic or infectious causes",
        ],
        base_score: 0.6,
        trigger: |ctx| ctx.has(symptom::WEIGHT_LOSS) && ctx.has(symptom::APATHY),
        bonuses: &[
            bonus(symptom::FEVER, 0.2, "Fever"),
            bonus(symptom::VOMITING, 0.1, "Vomiting"),
        ],
        resolve: |_| Resolution::label(Diagnosis::ConsumptiveSyndrome),
    },
    ClinicalRule {
        name: "cardinal_signs",
        group: RuleGroup::Syndrome,
        headline: &["Two or more cardinal signs of diabetes"],
        base_score: 0.0,
        trigger: |ctx| ctx.count(CARDINAL_SIGNS) >= ctx.thresholds.cardinal_sign_minimum,
        bonuses: &[
            bonus(symptom::POLYURIA, 0.1, "Polyuria (increased urination)"),
            bonus(symptom::POLYDIPSIA, 0.1, "Polydipsia (increased thirst)"),
            bonus(symptom::WEIGHT_LOSS, 0.1, "Weight loss"),
        ],
        resolve: resolve_cardinal_signs,
    },
    ClinicalRule {
        name: "marked_hyperglycemia",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.8,
        trigger: |ctx| ctx.exceeds(exam::GLUCOSE, ctx.thresholds.marked_elevation_multiple),
        bonuses: &[bonus(symptom::WEIGHT_LOSS, 0.1, "Weight loss")],
        resolve: |ctx| {
            Resolution::label(Diagnosis::DiabetesMellitus)
                .with_criteria(ctx.elevated("Markedly elevated glucose", exam::GLUCOSE))
        },
    },
    ClinicalRule {
        name: "marked_creatinine",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.8,
        trigger: |ctx| ctx.exceeds(exam::CREATININE, ctx.thresholds.marked_elevation_multiple),
        bonuses: &[bonus(symptom::APATHY, 0.1, "Apathy")],
        resolve: |ctx| {
            Resolution::label(Diagnosis::ChronicKidneyDisease)
                .with_criteria(ctx.elevated("Markedly elevated creatinine", exam::CREATININE))
        },
    },
    ClinicalRule {
        name: "urea_failure",
        group: RuleGroup::Independent,
        headline: &["Investigate pre-renal, renal and post-renal causes"],
        base_score: 0.8,
        trigger: |ctx| ctx.exceeds(exam::UREA, ctx.thresholds.urea_failure_multiple),
        bonuses: &[bonus(symptom::APATHY, 0.1, "Apathy")],
        resolve: |ctx| {
            Resolution::label(Diagnosis::RenalInsufficiency)
                .with_criteria(ctx.elevated("Urea more than twice the upper limit", exam::UREA))
        },
    },
    ClinicalRule {
        name: "leukocytosis_with_fever",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.7,
        trigger: |ctx| {
            ctx.has(symptom::FEVER)
                && ctx.exceeds(exam::LEUKOCYTES, ctx.thresholds.marked_elevation_multiple)
        },
        bonuses: &[],
        resolve: |ctx| {
            Resolution::label(Diagnosis::InflammatoryProcess).with_criteria(
                ctx.elevated("Leukocytosis", exam::LEUKOCYTES)
                    .into_iter()
                    .chain([
                        "Fever".to_string(),
                        "Investigate infectious or inflammatory focus".to_string(),
                    ]),
            )
        },
    },
    ClinicalRule {
        name: "isolated_fever",
        group: RuleGroup::Independent,
        headline: &[
            "Fever",
            "Investigate infectious or inflammatory cause",
            "Consider complementary exams",
        ],
        base_score: 0.5,
        trigger: |ctx| ctx.has(symptom::FEVER) && ctx.count(CARDINAL_SIGNS) == 0,
        bonuses: &[],
        resolve: |_| Resolution::label(Diagnosis::FebrileSyndrome),
    },
    ClinicalRule {
        name: "gastroenteritis",
        group: RuleGroup::Independent,
        headline: &[
            "Vomiting and diarrhea",
            "Investigate viral, bacterial or parasitic cause",
            "Monitor hydration",
        ],
        base_score: 0.6,
        trigger: |ctx| ctx.has(symptom::VOMITING) && ctx.has(symptom::DIARRHEA),
        bonuses: &[],
        resolve: |_| Resolution::label(Diagnosis::Gastroenteritis),
    },
    ClinicalRule {
        name: "anemia",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.6,
        trigger: |ctx| ctx.is_low(exam::HEMOGLOBIN),
        bonuses: &[bonus(symptom::APATHY, 0.1, "Apathy")],
        resolve: |ctx| {
            let low = ctx.reading(exam::HEMOGLOBIN).map(|annotated| {
                format!("Low hemoglobin: {}", annotated.describe())
            });
            Resolution::label(Diagnosis::Anemia)
                .with_criteria(low.into_iter().chain(["Investigate cause of anemia".to_string()]))
        },
    },
    ClinicalRule {
        name: "periodontal_disease",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| {
            ctx.exceeds(exam::LEUKOCYTES, ctx.thresholds.periodontal_leukocytosis_multiple)
                || (ctx.has(symptom::APATHY) && ctx.has(symptom::WEIGHT_LOSS))
                || ctx.has(symptom::FEVER)
        },
        bonuses: &[
            bonus(symptom::FEVER, 0.3, "Fever"),
            bonus(symptom::APATHY, 0.2, "Apathy"),
            bonus(symptom::WEIGHT_LOSS, 0.1, "Weight loss"),
        ],
        resolve: |ctx| {
            let multiple = ctx.thresholds.periodontal_leukocytosis_multiple;
            let resolution = Resolution::label(Diagnosis::PeriodontalDisease);
            if ctx.exceeds(exam::LEUKOCYTES, multiple) {
                resolution
                    .with_bonus(0.4)
                    .with_criteria(ctx.elevated("Leukocytosis", exam::LEUKOCYTES))
            } else {
                resolution
            }
        },
    },
    ClinicalRule {
        name: "otitis",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| {
            (ctx.exceeds(exam::LEUKOCYTES, ctx.thresholds.mild_leukocytosis_multiple)
                && (ctx.has(symptom::FEVER) || ctx.has(symptom::APATHY)))
                || ctx.has(symptom::LETHARGY)
        },
        bonuses: &[
            bonus(symptom::FEVER, 0.4, "Fever"),
            bonus(symptom::APATHY, 0.3, "Apathy"),
            bonus(symptom::LETHARGY, 0.3, "Lethargy"),
        ],
        resolve: |ctx| {
            let multiple = ctx.thresholds.mild_leukocytosis_multiple;
            let resolution = Resolution::label(Diagnosis::Otitis);
            match ctx.reading(exam::LEUKOCYTES) {
                Some(annotated) if annotated.exceeds_high_multiple(multiple) => resolution
                    .with_bonus(0.2)
                    .with_criteria([format!(
                        "Mild leukocytosis ({:.1})",
                        annotated.reading.value
                    )]),
                _ => resolution,
            }
        },
    },
    ClinicalRule {
        name: "dermatitis",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| {
            ctx.has(symptom::SKIN_LESIONS)
                || (ctx.has(symptom::APATHY) && ctx.has(symptom::WEIGHT_LOSS))
        },
        bonuses: &[
            bonus(symptom::SKIN_LESIONS, 0.8, "Skin lesions/wounds"),
            bonus(symptom::APATHY, 0.2, "Apathy"),
        ],
        resolve: |_| Resolution::label(Diagnosis::Dermatitis),
    },
    ClinicalRule {
        name: "cardiac_disease",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| ctx.has(symptom::COUGH) && ctx.has(symptom::APATHY),
        bonuses: &[
            bonus(symptom::COUGH, 0.6, "Cough"),
            bonus(symptom::APATHY, 0.4, "Apathy"),
        ],
        resolve: |_| Resolution::label(Diagnosis::CardiacDisease),
    },
    ClinicalRule {
        name: "neoplasia",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| {
            ctx.has(symptom::WEIGHT_LOSS) && ctx.has(symptom::APATHY) && ctx.has(symptom::FEVER)
        },
        bonuses: &[
            bonus(symptom::WEIGHT_LOSS, 0.4, "Weight loss"),
            bonus(symptom::APATHY, 0.3, "Apathy"),
            bonus(symptom::FEVER, 0.3, "Fever"),
        ],
        resolve: |_| Resolution::label(Diagnosis::Neoplasia),
    },
    // obesity and arthrosis share a trigger and both fire
    ClinicalRule {
        name: "obesity",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| ctx.has(symptom::APATHY) && ctx.has(symptom::LETHARGY),
        bonuses: &[
            bonus(symptom::APATHY, 0.5, "Apathy"),
            bonus(symptom::LETHARGY, 0.5, "Lethargy"),
        ],
        resolve: |_| Resolution::label(Diagnosis::Obesity),
    },
    ClinicalRule {
        name: "arthrosis",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.0,
        trigger: |ctx| ctx.has(symptom::APATHY) && ctx.has(symptom::LETHARGY),
        bonuses: &[
            bonus(symptom::APATHY, 0.5, "Apathy"),
            bonus(symptom::LETHARGY, 0.5, "Lethargy"),
        ],
        resolve: |_| Resolution::label(Diagnosis::Arthrosis),
    },
    ClinicalRule {
        name: "laboratory_alterations",
        group: RuleGroup::Independent,
        headline: &[],
        base_score: 0.6,
        trigger: |ctx| ctx.altered().next().is_some() && !ctx.any_critical(),
        bonuses: &[],
        resolve: |ctx| {
            Resolution::label(Diagnosis::LaboratoryAlterations)
                .with_criteria(ctx.altered().map(|annotated| annotated.describe()))
        },
    },
];

/// Diabetes when glucose is elevated, kidney disease when creatinine or urea is,
/// otherwise the syndrome itself
fn resolve_pupd(ctx: &RuleContext<'_>) -> Resolution {
    let multiple = ctx.thresholds.pupd_resolution_multiple;

    if ctx.exceeds(exam::GLUCOSE, multiple) {
        return Resolution::label(Diagnosis::DiabetesMellitus)
            .with_bonus(0.2)
            .with_criteria(ctx.elevated("Elevated glucose", exam::GLUCOSE));
    }

    let creatinine = ctx.exceeds(exam::CREATININE, multiple);
    let urea = ctx.exceeds(exam::UREA, multiple);
    if creatinine || urea {
        let criteria = [
            creatinine
                .then(|| ctx.elevated("Elevated creatinine", exam::CREATININE))
                .flatten(),
            urea.then(|| ctx.elevated("Elevated urea", exam::UREA))
                .flatten(),
        ];
        return Resolution::label(Diagnosis::ChronicKidneyDisease)
            .with_bonus(0.2)
            .with_criteria(criteria.into_iter().flatten());
    }

    Resolution::label(Diagnosis::PolyuriaPolydipsiaSyndrome).with_criteria([
        "No specific laboratory alteration".to_string(),
        "Investigate diabetes, kidney disease, hyperadrenocorticism".to_string(),
    ])
}

/// Diabetes with a bonus for the highest glucose tier reached
fn resolve_cardinal_signs(ctx: &RuleContext<'_>) -> Resolution {
    let tier = ctx
        .thresholds
        .glucose_tiers
        .iter()
        .find(|(multiple, _)| ctx.exceeds(exam::GLUCOSE, *multiple));

    match tier {
        Some(&(multiple, bonus)) => Resolution::label(Diagnosis::DiabetesMellitus)
            .with_bonus(bonus)
            .with_criteria(
                ctx.elevated(&format!("Glucose above {multiple}x the upper limit"), exam::GLUCOSE),
            ),
        None => Resolution::label(Diagnosis::DiabetesMellitus),
    }
}
