//! Tests for loading and validating reference range tables

use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array};
use vet_hypothesis::{DiagnosisError, ReferenceRangeRegistry, ReferenceRangeRow, Species};

use crate::utils::{batch, floats, init_logging, strings};

#[test]
fn test_builtin_critical_bounds() {
    init_logging();
    let registry = ReferenceRangeRegistry::builtin().unwrap();

    let creatinine = registry.lookup(Species::Canine, "creatinine").unwrap();
    assert_eq!(
        (
            creatinine.critical_low,
            creatinine.normal_low,
            creatinine.normal_high,
            creatinine.critical_high
        ),
        (0.2, 0.5, 1.6, 3.0)
    );

    let glucose = registry.lookup(Species::Feline, "glucose").unwrap();
    assert_eq!((glucose.critical_low, glucose.critical_high), (40.0, 350.0));
}

#[test]
fn test_builtin_derives_missing_critical_bounds() {
    let registry = ReferenceRangeRegistry::builtin().unwrap();

    let platelets = registry.lookup(Species::Canine, "platelets").unwrap();
    assert!((platelets.critical_low - 100.0).abs() < 1e-9);
    assert!((platelets.critical_high - 1000.0).abs() < 1e-9);

    let equine_creatinine = registry.lookup(Species::Equine, "creatinine").unwrap();
    assert!((equine_creatinine.critical_low - 0.5).abs() < 1e-9);
    assert!((equine_creatinine.critical_high - 4.0).abs() < 1e-9);
}

#[test]
fn test_every_builtin_range_is_monotone() {
    let registry = ReferenceRangeRegistry::builtin().unwrap();
    for species in Species::all() {
        for exam in registry.exams_for(species) {
            let range = registry.lookup(species, exam).unwrap();
            assert!(range.critical_low <= range.normal_low, "{range}");
            assert!(range.normal_low <= range.normal_high, "{range}");
            assert!(range.normal_high <= range.critical_high, "{range}");
        }
    }
}

#[test]
fn test_non_monotone_rows_fail_construction() {
    let cases = [
        ReferenceRangeRow::normal("Canine", "glucose", 120.0, 70.0),
        ReferenceRangeRow::normal("Canine", "glucose", 70.0, 120.0).with_critical(80.0, 300.0),
        ReferenceRangeRow::normal("Canine", "glucose", 70.0, 120.0).with_critical(40.0, 100.0),
        ReferenceRangeRow::normal("Canine", "glucose", 70.0, f64::INFINITY),
    ];

    for row in cases {
        let result = ReferenceRangeRegistry::from_rows(vec![row]);
        assert!(
            matches!(result, Err(DiagnosisError::InvalidReferenceRange { .. })),
            "expected an invalid range error, got {result:?}"
        );
    }
}

#[test]
fn test_configuration_errors_are_flagged() {
    let err = ReferenceRangeRegistry::from_rows(vec![ReferenceRangeRow::normal(
        "Reptile", "glucose", 60.0, 100.0,
    )])
    .unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_registry_from_record_batch() {
    init_logging();
    let normal_low: ArrayRef = Arc::new(Int64Array::from(vec![70, 70]));
    let input = batch(vec![
        ("species", strings(&[Some("Canina"), Some("Feline")])),
        ("exam", strings(&[Some("Glucose"), Some("glucose")])),
        ("normal_low", normal_low),
        ("normal_high", floats(&[Some(120.0), Some(150.0)])),
        ("critical_low", floats(&[Some(40.0), None])),
        ("critical_high", floats(&[Some(300.0), None])),
    ]);

    let registry = ReferenceRangeRegistry::from_record_batch(&input).unwrap();
    assert_eq!(registry.len(), 2);

    let canine = registry.lookup(Species::Canine, "glucose").unwrap();
    assert_eq!((canine.critical_low, canine.critical_high), (40.0, 300.0));

    let feline = registry.lookup(Species::Feline, "GLUCOSE").unwrap();
    assert!((feline.critical_low - 35.0).abs() < 1e-9);
    assert!((feline.critical_high - 300.0).abs() < 1e-9);
}

#[test]
fn test_record_batch_without_critical_columns() {
    let input = batch(vec![
        ("species", strings(&[Some("Equine")])),
        ("exam", strings(&[Some("urea")])),
        ("normal_low", floats(&[Some(21.0)])),
        ("normal_high", floats(&[Some(51.0)])),
    ]);
    let registry = ReferenceRangeRegistry::from_record_batch(&input).unwrap();
    let urea = registry.lookup(Species::Equine, "urea").unwrap();
    assert!((urea.critical_high - 102.0).abs() < 1e-9);
}

#[test]
fn test_record_batch_missing_column() {
    let input = batch(vec![
        ("species", strings(&[Some("Canine")])),
        ("normal_low", floats(&[Some(1.0)])),
        ("normal_high", floats(&[Some(2.0)])),
    ]);
    let result = ReferenceRangeRegistry::from_record_batch(&input);
    assert!(matches!(
        result,
        Err(DiagnosisError::ColumnNotFound { column }) if column == "exam"
    ));
}

#[test]
fn test_record_batch_null_bound() {
    let input = batch(vec![
        ("species", strings(&[Some("Canine")])),
        ("exam", strings(&[Some("urea")])),
        ("normal_low", floats(&[None])),
        ("normal_high", floats(&[Some(50.0)])),
    ]);
    assert!(matches!(
        ReferenceRangeRegistry::from_record_batch(&input),
        Err(DiagnosisError::InvalidDataset(_))
    ));
}
