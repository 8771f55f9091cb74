//! Diagnosis vocabulary
//!
//! Every label the engine emits comes from this closed set, so downstream consumers can
//! match exhaustively instead of comparing strings. Labels read from historical datasets
//! are resolved against the vocabulary (display names and dataset aliases); labels outside
//! it are carried as [`Diagnosis::Other`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic labels known to the engine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Diagnosis {
    // Emergencies raised from critical lab values
    AcuteRenalFailure,
    CriticalHypoglycemia,
    CriticalHyperglycemia,
    SevereAzotemia,
    SevereAnemia,
    SevereLeukopenia,
    SevereHypoalbuminemia,
    AcuteHepatocellularInjury,

    // Syndromes and conditions raised by clinical rules
    DiabetesMellitus,
    ChronicKidneyDisease,
    RenalInsufficiency,
    PolyuriaPolydipsiaSyndrome,
    ConsumptiveSyndrome,
    InflammatoryProcess,
    FebrileSyndrome,
    Gastroenteritis,
    Anemia,
    LaboratoryAlterations,
    PeriodontalDisease,
    Otitis,
    Dermatitis,
    CardiacDisease,
    Neoplasia,
    Obesity,
    Arthrosis,

    // Fallbacks
    InvestigationNeeded,
    RoutineExam,

    // Labels found in historical datasets
    Healthy,
    Hepatopathy,
    Leishmaniasis,
    Distemper,
    Pancreatitis,
    Hyperthyroidism,

    /// A historical label outside the vocabulary
    Other(String),
}

impl Diagnosis {
    /// Get the display name for this diagnosis
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::AcuteRenalFailure => "Acute/Severe Renal Failure",
            Self::CriticalHypoglycemia => "Critical Hypoglycemia",
            Self::CriticalHyperglycemia => "Critical Hyperglycemia/Severe Diabetes",
            Self::SevereAzotemia => "Severe Azotemia",
            Self::SevereAnemia => "Severe Anemia",
            Self::SevereLeukopenia => "Severe Leukopenia",
            Self::SevereHypoalbuminemia => "Severe Hypoalbuminemia",
            Self::AcuteHepatocellularInjury => "Acute Hepatocellular Injury",
            Self::DiabetesMellitus => "Diabetes Mellitus",
            Self::ChronicKidneyDisease => "Chronic Kidney Disease",
            Self::RenalInsufficiency => "Renal Insufficiency",
            Self::PolyuriaPolydipsiaSyndrome => "PU/PD Syndrome",
            Self::ConsumptiveSyndrome => "Consumptive Syndrome",
            Self::InflammatoryProcess => "Inflammatory/Infectious Process",
            Self::FebrileSyndrome => "Febrile Syndrome",
            Self::Gastroenteritis => "Gastroenteritis",
            Self::Anemia => "Anemia",
            Self::LaboratoryAlterations => "Laboratory Alterations",
            Self::PeriodontalDisease => "Periodontal Disease",
            Self::Otitis => "Otitis",
            Self::Dermatitis => "Dermatitis",
            Self::CardiacDisease => "Cardiac Disease",
            Self::Neoplasia => "Neoplasia",
            Self::Obesity => "Obesity",
            Self::Arthrosis => "Arthrosis",
            Self::InvestigationNeeded => "Investigation Needed",
            Self::RoutineExam => "Routine Exam",
            Self::Healthy => "Healthy",
            Self::Hepatopathy => "Hepatopathy",
            Self::Leishmaniasis => "Leishmaniasis",
            Self::Distemper => "Distemper",
            Self::Pancreatitis => "Pancreatitis",
            Self::Hyperthyroidism => "Hyperthyroidism",
            Self::Other(label) => label,
        }
    }

    /// Get every vocabulary entry (excluding `Other`)
    #[must_use]
    pub fn known() -> Vec<Self> {
        vec![
            Self::AcuteRenalFailure,
            Self::CriticalHypoglycemia,
            Self::CriticalHyperglycemia,
            Self::SevereAzotemia,
            Self::SevereAnemia,
            Self::SevereLeukopenia,
            Self::SevereHypoalbuminemia,
            Self::AcuteHepatocellularInjury,
            Self::DiabetesMellitus,
            Self::ChronicKidneyDisease,
            Self::RenalInsufficiency,
            Self::PolyuriaPolydipsiaSyndrome,
            Self::ConsumptiveSyndrome,
            Self::InflammatoryProcess,
            Self::FebrileSyndrome,
            Self::Gastroenteritis,
            Self::Anemia,
            Self::LaboratoryAlterations,
            Self::PeriodontalDisease,
            Self::Otitis,
            Self::Dermatitis,
            Self::CardiacDisease,
            Self::Neoplasia,
            Self::Obesity,
            Self::Arthrosis,
            Self::InvestigationNeeded,
            Self::RoutineExam,
            Self::Healthy,
            Self::Hepatopathy,
            Self::Leishmaniasis,
            Self::Distemper,
            Self::Pancreatitis,
            Self::Hyperthyroidism,
        ]
    }

    /// Resolve a free-form label against the vocabulary
    ///
    /// Matching is case-insensitive on display names and on the aliases used by the
    /// clinic's historical datasets. Unmatched labels become `Other` with the trimmed text.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        let lowered = trimmed.to_lowercase();

        if let Some(known) = Self::known()
            .into_iter()
            .find(|diagnosis| diagnosis.display_name().to_lowercase() == lowered)
        {
            return known;
        }

        Self::from_alias(&lowered).unwrap_or_else(|| Self::Other(trimmed.to_string()))
    }

    fn from_alias(lowered: &str) -> Option<Self> {
        let diagnosis = match lowered {
            "insuficiência renal aguda/grave" | "acute renal failure" => Self::AcuteRenalFailure,
            "hipoglicemia crítica" => Self::CriticalHypoglycemia,
            "hiperglicemia crítica/diabetes grave" => Self::CriticalHyperglycemia,
            "diabetes" | "diabetes melito" => Self::DiabetesMellitus,
            "doença renal crônica" | "ckd" | "chronic renal disease" => Self::ChronicKidneyDisease,
            "insuficiência renal" | "renal failure" => Self::RenalInsufficiency,
            "síndrome pu/pd" | "pu/pd" => Self::PolyuriaPolydipsiaSyndrome,
            "síndrome consumptiva" => Self::ConsumptiveSyndrome,
            "processo inflamatório/infeccioso" => Self::InflammatoryProcess,
            "síndrome febril" => Self::FebrileSyndrome,
            "gastroenterite" => Self::Gastroenteritis,
            "anemia" => Self::Anemia,
            "alterações laboratoriais" => Self::LaboratoryAlterations,
            "investigação necessária" => Self::InvestigationNeeded,
            "exame de rotina" => Self::RoutineExam,
            "saudável" | "saudavel" => Self::Healthy,
            "hepatopatia" | "liver disease" => Self::Hepatopathy,
            "leishmaniose" => Self::Leishmaniasis,
            "cinomose" => Self::Distemper,
            "pancreatite" => Self::Pancreatitis,
            "hipertireoidismo" => Self::Hyperthyroidism,
            "doença periodontal" => Self::PeriodontalDisease,
            "otite" => Self::Otitis,
            "dermatite" => Self::Dermatitis,
            "doença cardíaca" | "cardiopatia" => Self::CardiacDisease,
            "obesidade" => Self::Obesity,
            "artrose" | "osteoarthritis" => Self::Arthrosis,
            _ => return None,
        };
        Some(diagnosis)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl From<Diagnosis> for String {
    fn from(diagnosis: Diagnosis) -> Self {
        diagnosis.display_name().to_string()
    }
}

impl From<String> for Diagnosis {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}
