//! A Rust library for ranking veterinary diagnostic hypotheses from lab readings,
//! clinical symptoms and similar historical cases.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod reference;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{
    EngineConfig, EngineConfigBuilder, PriorityBands, RuleThresholds, SimilarityConfig,
};
pub use engine::{DiagnosticEngine, EngineHandle};
pub use error::{DiagnosisError, Result};

// Inputs and outputs
pub use models::{
    Diagnosis, Direction, ExamReading, Hypothesis, HypothesisSource, PatientQuery, Priority,
    Species, SymptomSet, ValueStatus,
};

// Tables
pub use algorithm::similarity::{CaseRecord, HistoricalCase, HistoricalDataset};
pub use reference::{ReferenceRange, ReferenceRangeRegistry, ReferenceRangeRow};

// Pipeline stages
pub use algorithm::HypothesisGenerator;
pub use algorithm::critical::{AnnotatedReading, CriticalValueDetector};

// Arrow types
pub use arrow::record_batch::RecordBatch;
