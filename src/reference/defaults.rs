//! Packaged default reference table
//!
//! Canine and feline rows carry clinic-specified critical bounds for the eight exams the
//! emergency table covers. The remaining rows only carry normal ranges and get derived
//! critical bounds.

use super::range::ReferenceRangeRow;
use crate::models::exam::names;

/// (exam, critical low, critical high, normal low, normal high)
type CriticalRow = (&'static str, f64, f64, f64, f64);
/// (exam, normal low, normal high)
type NormalRow = (&'static str, f64, f64);

const CANINE_CRITICAL: &[CriticalRow] = &[
    (names::CREATININE, 0.2, 3.0, 0.5, 1.6),
    (names::UREA, 10.0, 100.0, 20.0, 50.0),
    (names::GLUCOSE, 40.0, 300.0, 70.0, 120.0),
    (names::HEMOGLOBIN, 6.0, 20.0, 12.0, 18.0),
    (names::HEMATOCRIT, 20.0, 70.0, 37.0, 55.0),
    (names::LEUKOCYTES, 2.0, 30.0, 6.0, 17.0),
    (names::ALT, 5.0, 200.0, 10.0, 100.0),
    (names::ALBUMIN, 1.5, 5.0, 2.5, 3.8),
];

const FELINE_CRITICAL: &[CriticalRow] = &[
    (names::CREATININE, 0.3, 4.0, 0.8, 2.0),
    (names::UREA, 15.0, 120.0, 30.0, 60.0),
    (names::GLUCOSE, 40.0, 350.0, 70.0, 150.0),
    (names::HEMOGLOBIN, 5.0, 18.0, 9.0, 15.0),
    (names::HEMATOCRIT, 15.0, 60.0, 30.0, 45.0),
    (names::LEUKOCYTES, 2.0, 35.0, 5.5, 19.5),
    (names::ALT, 5.0, 150.0, 10.0, 80.0),
    (names::ALBUMIN, 1.5, 5.0, 2.5, 3.9),
];

const CANINE_NORMAL: &[NormalRow] = &[
    (names::PLATELETS, 200.0, 500.0),
    (names::AST, 15.0, 50.0),
    (names::ALKALINE_PHOSPHATASE, 20.0, 150.0),
    (names::TOTAL_PROTEIN, 5.4, 7.5),
    (names::CHOLESTEROL, 130.0, 270.0),
    (names::TRIGLYCERIDES, 20.0, 150.0),
];

const FELINE_NORMAL: &[NormalRow] = &[
    (names::PLATELETS, 300.0, 700.0),
    (names::AST, 10.0, 50.0),
    (names::ALKALINE_PHOSPHATASE, 10.0, 80.0),
    (names::TOTAL_PROTEIN, 6.0, 8.5),
    (names::CHOLESTEROL, 90.0, 200.0),
    (names::TRIGLYCERIDES, 25.0, 100.0),
];

const EQUINE_NORMAL: &[NormalRow] = &[
    (names::HEMOGLOBIN, 11.0, 19.0),
    (names::HEMATOCRIT, 32.0, 53.0),
    (names::LEUKOCYTES, 5.5, 12.5),
    (names::PLATELETS, 100.0, 600.0),
    (names::GLUCOSE, 75.0, 115.0),
    (names::UREA, 21.0, 51.0),
    (names::CREATININE, 1.0, 2.0),
    (names::ALT, 3.0, 20.0),
    (names::AST, 138.0, 409.0),
    (names::ALKALINE_PHOSPHATASE, 143.0, 395.0),
    (names::TOTAL_PROTEIN, 5.9, 7.9),
    (names::ALBUMIN, 2.6, 3.7),
    (names::CHOLESTEROL, 75.0, 150.0),
    (names::TRIGLYCERIDES, 4.0, 44.0),
];

/// Rows of the packaged reference table
#[must_use]
pub fn default_rows() -> Vec<ReferenceRangeRow> {
    let critical = [("Canine", CANINE_CRITICAL), ("Feline", FELINE_CRITICAL)]
        .into_iter()
        .flat_map(|(species, rows)| {
            rows.iter().map(move |&(exam, crit_low, crit_high, low, high)| {
                ReferenceRangeRow::normal(species, exam, low, high)
                    .with_critical(crit_low, crit_high)
            })
        });

    let normal_only = [
        ("Canine", CANINE_NORMAL),
        ("Feline", FELINE_NORMAL),
        ("Equine", EQUINE_NORMAL),
    ]
    .into_iter()
    .flat_map(|(species, rows)| {
        rows.iter()
            .map(move |&(exam, low, high)| ReferenceRangeRow::normal(species, exam, low, high))
    });

    critical.chain(normal_only).collect()
}
