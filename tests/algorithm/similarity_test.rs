//! Tests for case similarity retrieval and scoring

use vet_hypothesis::algorithm::similarity::CaseSimilarityEngine;
use vet_hypothesis::{
    Diagnosis, EngineConfig, HypothesisSource, PatientQuery, PriorityBands, Species,
};

use crate::utils::{init_logging, sample_dataset, sample_engine};

fn similarity_engine(config: &EngineConfig) -> CaseSimilarityEngine {
    CaseSimilarityEngine::new(
        sample_dataset().unwrap(),
        config.similarity.clone(),
        config.priority,
    )
}

fn diabetic_query(species: Species) -> PatientQuery {
    PatientQuery::new(species)
        .with_exam("glucose", 290.0)
        .with_exam("creatinine", 1.0)
        .with_symptom("polyuria", true)
        .with_symptom("polydipsia", true)
}

#[test]
fn test_k_larger_than_filtered_pool_uses_every_candidate() {
    init_logging();
    let engine = similarity_engine(&EngineConfig::default());

    let neighbors = engine.neighbors(&diabetic_query(Species::Canine)).unwrap();
    assert_eq!(neighbors.len(), 7);

    let hypotheses = engine
        .hypotheses(&diabetic_query(Species::Canine), &[])
        .unwrap();
    let labels: Vec<_> = hypotheses.iter().map(|h| h.diagnosis.clone()).collect();
    assert_eq!(labels[0], Diagnosis::DiabetesMellitus);
    assert!(labels.contains(&Diagnosis::ChronicKidneyDisease));
    assert!(labels.contains(&Diagnosis::Healthy));
    assert_eq!(
        hypotheses[0].criteria[..3],
        [
            "Found 3 similar cases with this diagnosis".to_string(),
            hypotheses[0].criteria[1].clone(),
            "Frequency among similar cases: 42.9%".to_string(),
        ]
    );
    assert!(hypotheses[0].criteria[1].starts_with("Mean similarity: "));
}

#[test]
fn test_species_filter_falls_back_to_whole_pool() {
    let engine = similarity_engine(&EngineConfig::default());
    let neighbors = engine.neighbors(&diabetic_query(Species::Equine)).unwrap();
    assert_eq!(neighbors.len(), 9);
}

#[test]
fn test_species_filter_can_be_disabled() {
    let config = EngineConfig::builder().filter_by_species(false).build().unwrap();
    let engine = similarity_engine(&config);
    let neighbors = engine.neighbors(&diabetic_query(Species::Canine)).unwrap();
    assert_eq!(neighbors.len(), 9);

    let feline = similarity_engine(&EngineConfig::default())
        .neighbors(&diabetic_query(Species::Feline))
        .unwrap();
    assert_eq!(feline.len(), 2);
}

#[test]
fn test_neighbor_count_is_configurable() {
    let config = EngineConfig::builder().neighbors(2).build().unwrap();
    let engine = similarity_engine(&config);
    let hypotheses = engine
        .hypotheses(&diabetic_query(Species::Canine), &[])
        .unwrap();
    assert_eq!(hypotheses.len(), 1);
    assert_eq!(hypotheses[0].diagnosis, Diagnosis::DiabetesMellitus);
    assert_eq!(
        hypotheses[0].criteria[2],
        "Frequency among similar cases: 100.0%"
    );
    assert!(hypotheses[0].score > 0.6);
}

#[test]
fn test_scores_within_unit_interval() {
    let engine = similarity_engine(&EngineConfig::default());
    for species in Species::all() {
        for hypothesis in engine.hypotheses(&diabetic_query(species), &[]).unwrap() {
            assert!((0.0..=1.0).contains(&hypothesis.score), "{hypothesis}");
            assert_eq!(hypothesis.source, HypothesisSource::Similarity);
        }
    }
}

#[test]
fn test_parallel_and_sequential_search_agree() {
    let sequential = similarity_engine(&EngineConfig::default());
    let parallel = CaseSimilarityEngine::new(
        sample_dataset().unwrap(),
        EngineConfig::builder()
            .parallel_threshold(0)
            .build()
            .unwrap()
            .similarity,
        PriorityBands::default(),
    );
    let query = diabetic_query(Species::Canine);
    assert_eq!(
        sequential.neighbors(&query).unwrap(),
        parallel.neighbors(&query).unwrap()
    );
}

#[test]
fn test_altered_readings_are_appended_to_similarity_criteria() {
    let engine = sample_engine().unwrap();
    let query = diabetic_query(Species::Canine)
        .with_exam("alt", 150.0)
        .with_exam("ast", 60.0)
        .with_exam("cholesterol", 300.0);

    let hypotheses = engine.diagnose(&query);
    let healthy = hypotheses
        .iter()
        .find(|h| h.diagnosis == Diagnosis::Healthy)
        .unwrap();
    assert_eq!(healthy.source, HypothesisSource::Similarity);
    assert_eq!(healthy.criteria.len(), 5);
    assert_eq!(
        healthy.criteria[3],
        "glucose: 290.0 (high, reference 70.0-120.0)"
    );
    assert_eq!(healthy.criteria[4], "alt: 150.0 (high, reference 10.0-100.0)");
}
