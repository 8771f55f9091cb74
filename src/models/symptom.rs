//! Clinical symptom flags

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::exam::normalize_name;

/// Canonical symptom names used by the rule catalog
pub mod names {
    pub const FEVER: &str = "fever";
    pub const APATHY: &str = "apathy";
    pub const WEIGHT_LOSS: &str = "weight_loss";
    pub const VOMITING: &str = "vomiting";
    pub const DIARRHEA: &str = "diarrhea";
    pub const COUGH: &str = "cough";
    pub const LETHARGY: &str = "lethargy";
    pub const SKIN_LESIONS: &str = "skin_lesions";
    pub const POLYURIA: &str = "polyuria";
    pub const POLYDIPSIA: &str = "polydipsia";
    pub const PAIN: &str = "pain";

    /// Symptoms recognised when classifying historical dataset columns
    pub const ALL: &[&str] = &[
        FEVER,
        APATHY,
        WEIGHT_LOSS,
        VOMITING,
        DIARRHEA,
        COUGH,
        LETHARGY,
        SKIN_LESIONS,
        POLYURIA,
        POLYDIPSIA,
        PAIN,
    ];
}

/// Symptom presence flags keyed by normalized symptom name
///
/// Backed by an ordered map so that iteration (and every criteria list built from it)
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomSet {
    flags: BTreeMap<String, bool>,
}

impl SymptomSet {
    /// Create an empty symptom set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a symptom flag, replacing any previous value for the same name
    pub fn insert(&mut self, name: impl AsRef<str>, present: bool) {
        self.flags.insert(normalize_name(name.as_ref()), present);
    }

    /// Whether a symptom was reported as present
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    /// Iterate over the names of present symptoms in name order
    pub fn present(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, present)| **present)
            .map(|(name, _)| name.as_str())
    }

    /// Count how many of the given symptoms are present
    #[must_use]
    pub fn count_present(&self, names: &[&str]) -> usize {
        names.iter().filter(|name| self.is_present(name)).count()
    }

    /// Whether no symptom is present
    #[must_use]
    pub fn none_present(&self) -> bool {
        self.present().next().is_none()
    }

    /// Iterate over all flags, present or not
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.flags.iter().map(|(name, present)| (name.as_str(), *present))
    }
}

impl<S: AsRef<str>> FromIterator<(S, bool)> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, present) in iter {
            set.insert(name, present);
        }
        set
    }
}

/// Render a symptom name for criteria lists (`weight_loss` becomes `Weight Loss`)
#[must_use]
pub fn display_symptom(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
