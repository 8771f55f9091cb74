//! Tests for critical value detection and the emergency mapping

use vet_hypothesis::{
    CriticalValueDetector, Diagnosis, ExamReading, PatientQuery, Priority,
    ReferenceRangeRegistry, Species, ValueStatus,
};

use crate::utils::{empty_pool_engine, init_logging};

fn statuses(species: Species, readings: &[(&str, f64)]) -> Vec<ValueStatus> {
    let registry = ReferenceRangeRegistry::builtin().unwrap();
    let readings: Vec<_> = readings
        .iter()
        .map(|(name, value)| ExamReading::new(name, *value))
        .collect();
    CriticalValueDetector::new(&registry, true)
        .annotate(species, &readings)
        .into_iter()
        .map(|annotated| annotated.status)
        .collect()
}

#[test]
fn test_critical_bounds_are_inclusive() {
    assert_eq!(
        statuses(Species::Canine, &[("creatinine", 3.0), ("glucose", 40.0)]),
        vec![ValueStatus::CriticalHigh, ValueStatus::CriticalLow]
    );
}

#[test]
fn test_thresholds_are_species_specific() {
    assert_eq!(
        statuses(Species::Canine, &[("creatinine", 3.2)]),
        vec![ValueStatus::CriticalHigh]
    );
    assert_eq!(
        statuses(Species::Feline, &[("creatinine", 3.2)]),
        vec![ValueStatus::AlteredHigh]
    );
}

#[test]
fn test_unknown_exam_passes_through() {
    assert_eq!(
        statuses(Species::Canine, &[("troponin", 12.0), ("urea", 35.0)]),
        vec![ValueStatus::Unknown, ValueStatus::Normal]
    );
}

#[test]
fn test_critical_creatinine_raises_renal_failure() {
    init_logging();
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine).with_exam("creatinine", 3.2);

    let hypotheses = engine.diagnose(&query);
    let first = &hypotheses[0];
    assert_eq!(first.diagnosis, Diagnosis::AcuteRenalFailure);
    assert_eq!(first.priority, Priority::Critical);
    assert!((first.score - 0.95).abs() < f64::EPSILON);
    assert_eq!(
        first.criteria,
        vec![
            "creatinine: 3.2 (critically high, threshold >= 3.0)",
            "Critical value detected",
            "Immediate attention required",
        ]
    );
}

#[test]
fn test_critical_without_mapping_raises_nothing() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine).with_exam("platelets", 50.0);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::RoutineExam);
    assert_eq!(
        hypotheses[0].criteria[1],
        "Abnormal laboratory values: platelets: 50.0 (critically low, threshold <= 100.0)"
    );
}

#[test]
fn test_two_anemia_readings_merge_into_one_hypothesis() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_exam("hemoglobin", 5.0)
        .with_exam("hematocrit", 18.0);

    let hypotheses = engine.diagnose(&query);
    let anemia: Vec<_> = hypotheses
        .iter()
        .filter(|h| h.diagnosis == Diagnosis::SevereAnemia)
        .collect();
    assert_eq!(anemia.len(), 1);
    assert_eq!(anemia[0].priority, Priority::Critical);
    assert!(
        anemia[0]
            .criteria
            .iter()
            .any(|c| c.starts_with("hemoglobin: 5.0"))
    );
    assert!(
        anemia[0]
            .criteria
            .iter()
            .any(|c| c.starts_with("hematocrit: 18.0"))
    );
    assert_eq!(
        anemia[0]
            .criteria
            .iter()
            .filter(|c| *c == "Critical value detected")
            .count(),
        1
    );
}

#[test]
fn test_equine_uses_derived_bounds() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Equine).with_exam("glucose", 240.0);
    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::CriticalHyperglycemia);
}

#[test]
fn test_zero_reading_means_not_measured() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine).with_exam("glucose", 0.0);
    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::RoutineExam);
}

#[test]
fn test_critical_value_alone_has_no_fallback() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine).with_exam("glucose", 35.0);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::CriticalHypoglycemia);
    assert!(
        hypotheses
            .iter()
            .all(|h| h.diagnosis != Diagnosis::RoutineExam)
    );
}
