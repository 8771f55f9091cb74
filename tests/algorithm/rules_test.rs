//! Tests for the clinical rule catalog through the engine

use vet_hypothesis::{
    Diagnosis, DiagnosticEngine, EngineConfig, HistoricalDataset, HypothesisSource,
    PatientQuery, Priority, ReferenceRangeRegistry, Species,
};

use crate::utils::{empty_pool_engine, init_logging};

fn find(hypotheses: &[vet_hypothesis::Hypothesis], diagnosis: &Diagnosis) -> Option<usize> {
    hypotheses.iter().position(|h| &h.diagnosis == diagnosis)
}

#[test]
fn test_pupd_with_high_glucose_is_diabetes() {
    init_logging();
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("polyuria", true)
        .with_symptom("polydipsia", true)
        .with_exam("glucose", 200.0);

    let hypotheses = engine.diagnose(&query);
    let index = find(&hypotheses, &Diagnosis::DiabetesMellitus).unwrap();
    let diabetes = &hypotheses[index];
    assert!(diabetes.priority.rank() >= Priority::High.rank());
    assert!((diabetes.score - 0.9).abs() < 1e-9);
    assert_eq!(diabetes.source, HypothesisSource::Rule);
    // the PU/PD and marked-hyperglycemia criteria are merged
    assert!(
        diabetes
            .criteria
            .contains(&"PU/PD syndrome (polyuria + polydipsia)".to_string())
    );
    assert!(
        diabetes
            .criteria
            .contains(&"Markedly elevated glucose (200.0 - normal: 120)".to_string())
    );
}

#[test]
fn test_consumptive_syndrome_bonuses() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("weight_loss", true)
        .with_symptom("apathy", true)
        .with_symptom("fever", true)
        .with_symptom("vomiting", true);

    let hypotheses = engine.diagnose(&query);
    // weight loss, apathy and fever together also point to neoplasia
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::Neoplasia);

    let consumptive = &hypotheses[find(&hypotheses, &Diagnosis::ConsumptiveSyndrome).unwrap()];
    assert!((consumptive.score - 0.9).abs() < 1e-9);
    assert_eq!(consumptive.priority, Priority::High);
    assert_eq!(
        consumptive.criteria[2..],
        ["Fever".to_string(), "Vomiting".to_string()]
    );
}

#[test]
fn test_leukocytosis_with_fever() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("fever", true)
        .with_exam("leukocytes", 28.0);

    let hypotheses = engine.diagnose(&query);
    let inflammatory = &hypotheses[find(&hypotheses, &Diagnosis::InflammatoryProcess).unwrap()];
    assert!((inflammatory.score - 0.7).abs() < 1e-9);
    assert_eq!(inflammatory.priority, Priority::Medium);
    assert_eq!(inflammatory.criteria[0], "Leukocytosis (28.0 - normal: 17)");

    assert!(find(&hypotheses, &Diagnosis::FebrileSyndrome).is_some());
    assert!(find(&hypotheses, &Diagnosis::LaboratoryAlterations).is_some());
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::InflammatoryProcess);
}

#[test]
fn test_severe_urea_raises_azotemia_and_renal_insufficiency() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine).with_exam("urea", 110.0);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::SevereAzotemia);
    assert_eq!(hypotheses[1].diagnosis, Diagnosis::RenalInsufficiency);
    assert_eq!(hypotheses[1].priority, Priority::High);
    assert!(find(&hypotheses, &Diagnosis::LaboratoryAlterations).is_none());
}

#[test]
fn test_low_hemoglobin_is_anemia() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Feline).with_exam("hemoglobin", 7.5);

    let hypotheses = engine.diagnose(&query);
    let anemia = &hypotheses[find(&hypotheses, &Diagnosis::Anemia).unwrap()];
    assert!((anemia.score - 0.6).abs() < 1e-9);
    assert_eq!(
        anemia.criteria[0],
        "Low hemoglobin: hemoglobin: 7.5 (low, reference 9.0-15.0)"
    );
}

#[test]
fn test_cardinal_sign_minimum_is_configurable() {
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("polyuria", true)
        .with_symptom("weight_loss", true);

    let default_engine = empty_pool_engine().unwrap();
    let hypotheses = default_engine.diagnose(&query);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::DiabetesMellitus);
    assert!((hypotheses[0].score - 0.2).abs() < 1e-9);
    assert_eq!(hypotheses[0].priority, Priority::Low);

    let strict = EngineConfig::builder().cardinal_sign_minimum(3).build().unwrap();
    let strict_engine = DiagnosticEngine::new(
        ReferenceRangeRegistry::builtin().unwrap(),
        HistoricalDataset::empty(),
        strict,
    )
    .unwrap();
    let hypotheses = strict_engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::InvestigationNeeded);
    assert_eq!(hypotheses[0].source, HypothesisSource::Fallback);
    assert_eq!(
        hypotheses[0].criteria[0],
        "Present symptoms: Polyuria, Weight Loss"
    );
}

#[test]
fn test_fallback_lists_normal_labs() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("cough", true)
        .with_exam("glucose", 95.0);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::InvestigationNeeded);
    assert!((hypotheses[0].score - 0.4).abs() < 1e-9);
    assert_eq!(hypotheses[0].priority, Priority::Low);
    assert_eq!(
        hypotheses[0].criteria[1],
        "Laboratory values within normal limits"
    );
}

#[test]
fn test_skin_lesions_suggest_dermatitis() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Feline)
        .with_symptom("skin_lesions", true)
        .with_symptom("apathy", true);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::Dermatitis);
    assert!((hypotheses[0].score - 1.0).abs() < 1e-9);
    assert_eq!(hypotheses[0].criteria, vec!["Skin lesions/wounds", "Apathy"]);
}

#[test]
fn test_cough_with_apathy_suggests_cardiac_disease() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("cough", true)
        .with_symptom("apathy", true);

    let hypotheses = engine.diagnose(&query);
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::CardiacDisease);
    assert_eq!(hypotheses[0].priority, Priority::High);
    assert_eq!(hypotheses[0].criteria, vec!["Cough", "Apathy"]);
}

#[test]
fn test_apathy_with_lethargy_raises_obesity_and_arthrosis() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("apathy", true)
        .with_symptom("lethargy", true);

    let hypotheses = engine.diagnose(&query);
    let diagnoses: Vec<_> = hypotheses.iter().map(|h| h.diagnosis.clone()).collect();
    assert_eq!(
        diagnoses,
        vec![Diagnosis::Obesity, Diagnosis::Arthrosis, Diagnosis::Otitis]
    );
    assert!((hypotheses[2].score - 0.6).abs() < 1e-9);
}

#[test]
fn test_leukocytosis_with_apathy_suggests_periodontal_disease_and_otitis() {
    let engine = empty_pool_engine().unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("apathy", true)
        .with_exam("leukocytes", 22.0);

    let hypotheses = engine.diagnose(&query);
    let diagnoses: Vec<_> = hypotheses.iter().map(|h| h.diagnosis.clone()).collect();
    assert_eq!(
        diagnoses,
        vec![
            Diagnosis::PeriodontalDisease,
            Diagnosis::LaboratoryAlterations,
            Diagnosis::Otitis
        ]
    );

    let periodontal = &hypotheses[0];
    assert!((periodontal.score - 0.6).abs() < 1e-9);
    assert_eq!(
        periodontal.criteria,
        vec!["Leukocytosis (22.0 - normal: 17)", "Apathy"]
    );

    let otitis = &hypotheses[2];
    assert!((otitis.score - 0.5).abs() < 1e-9);
    assert_eq!(otitis.priority, Priority::Medium);
    assert_eq!(otitis.criteria, vec!["Mild leukocytosis (22.0)", "Apathy"]);
}

#[test]
fn test_leukocyte_thresholds_are_configurable() {
    let config = EngineConfig {
        rules: vet_hypothesis::RuleThresholds {
            periodontal_leukocytosis_multiple: 1.5,
            ..vet_hypothesis::RuleThresholds::default()
        },
        ..EngineConfig::default()
    };
    let engine = DiagnosticEngine::new(
        ReferenceRangeRegistry::builtin().unwrap(),
        HistoricalDataset::empty(),
        config,
    )
    .unwrap();
    let query = PatientQuery::new(Species::Canine)
        .with_symptom("apathy", true)
        .with_exam("leukocytes", 22.0);

    let hypotheses = engine.diagnose(&query);
    assert!(find(&hypotheses, &Diagnosis::PeriodontalDisease).is_none());
    assert!(find(&hypotheses, &Diagnosis::Otitis).is_some());
}
