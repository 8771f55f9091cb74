//! Tests for building historical pools and engines from Arrow record batches

use vet_hypothesis::algorithm::similarity::FeatureKind;
use vet_hypothesis::{
    Diagnosis, DiagnosisError, DiagnosticEngine, EngineConfig, HistoricalDataset,
    HypothesisSource, PatientQuery, ReferenceRangeRegistry, Species,
};

use crate::utils::{batch, flags, floats, init_logging, strings};

fn historical_batch() -> vet_hypothesis::RecordBatch {
    batch(vec![
        ("id", strings(&[Some("a1"), Some("a2"), Some("a3"), Some("a4")])),
        (
            "species",
            strings(&[Some("Canina"), Some("Felina"), None, Some("Avian")]),
        ),
        ("age_years", floats(&[Some(7.0), Some(12.0), Some(3.0), Some(1.0)])),
        (
            "Glucose",
            floats(&[Some(300.0), None, Some(100.0), Some(120.0)]),
        ),
        (
            "fever",
            flags(&[Some(true), Some(false), Some(false), Some(true)]),
        ),
        (
            "diagnosis",
            strings(&[
                Some("Diabetes Mellitus"),
                Some("Saudável"),
                None,
                Some("Cinomose"),
            ]),
        ),
        (
            "notes",
            strings(&[Some("thin"), None, Some("ok"), Some("coughing")]),
        ),
    ])
}

#[test]
fn test_pool_from_record_batch() -> anyhow::Result<()> {
    init_logging();
    let dataset = HistoricalDataset::from_record_batch(&historical_batch())?;

    assert_eq!(dataset.len(), 3);
    assert_eq!(dataset.schema().names(), ["glucose", "fever"]);
    assert_eq!(dataset.schema().kind(0), Some(FeatureKind::Exam));
    assert_eq!(dataset.schema().kind(1), Some(FeatureKind::Symptom));

    let cases = dataset.cases();
    assert_eq!(
        cases.iter().map(|c| c.species).collect::<Vec<_>>(),
        vec![Some(Species::Canine), Some(Species::Feline), None]
    );
    assert_eq!(
        cases.iter().map(|c| c.diagnosis.clone()).collect::<Vec<_>>(),
        vec![
            Diagnosis::DiabetesMellitus,
            Diagnosis::Healthy,
            Diagnosis::Distemper
        ]
    );
    assert_eq!(cases[0].features, vec![300.0, 1.0]);
    // median of the glucose values on kept rows
    assert_eq!(cases[1].features, vec![210.0, 0.0]);
    assert_eq!(cases[2].features, vec![120.0, 1.0]);
    Ok(())
}

#[test]
fn test_pool_requires_diagnosis_column() {
    let input = batch(vec![
        ("species", strings(&[Some("Canine")])),
        ("glucose", floats(&[Some(100.0)])),
    ]);
    let result = HistoricalDataset::from_record_batch(&input);
    assert!(matches!(
        result,
        Err(DiagnosisError::ColumnNotFound { column }) if column == "diagnosis"
    ));
}

#[test]
fn test_pool_requires_a_feature_column() {
    let input = batch(vec![
        ("species", strings(&[Some("Canine")])),
        ("diagnosis", strings(&[Some("Healthy")])),
        ("notes", strings(&[Some("none")])),
    ]);
    assert!(matches!(
        HistoricalDataset::from_record_batch(&input),
        Err(DiagnosisError::InvalidDataset(_))
    ));
}

#[test]
fn test_engine_over_loaded_pool() {
    let dataset = HistoricalDataset::from_record_batch(&historical_batch()).unwrap();
    let engine = DiagnosticEngine::new(
        ReferenceRangeRegistry::builtin().unwrap(),
        dataset,
        EngineConfig::default(),
    )
    .unwrap();

    // mildly high glucose so no rule also proposes diabetes
    let query = PatientQuery::new(Species::Canine).with_exam("glucose", 130.0);
    let hypotheses = engine.diagnose(&query);

    let similar: Vec<_> = hypotheses
        .iter()
        .filter(|h| h.source == HypothesisSource::Similarity)
        .collect();
    assert_eq!(similar.len(), 1);
    assert_eq!(
        similar[0].criteria[0],
        "Found 1 similar cases with this diagnosis"
    );
    assert_eq!(similar[0].diagnosis, Diagnosis::DiabetesMellitus);
    assert!(
        hypotheses
            .iter()
            .any(|h| h.diagnosis == Diagnosis::LaboratoryAlterations)
    );
}
