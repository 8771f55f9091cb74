//! Patient species
//!
//! The species selects which reference ranges apply and, when the historical dataset
//! carries species metadata, which historical cases are compared against.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DiagnosisError;

/// Species supported by the reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Dogs
    Canine,
    /// Cats
    Feline,
    /// Horses
    Equine,
}

impl Species {
    /// Get the display name for this species
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Canine => "Canine",
            Self::Feline => "Feline",
            Self::Equine => "Equine",
        }
    }

    /// Get all supported species
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::Canine, Self::Feline, Self::Equine]
    }

    /// Parse a species label, returning `None` for unrecognised labels
    ///
    /// Accepts English names, common nouns and the labels used by the
    /// clinic's historical datasets (`Canina`, `Felina`, `Equina`).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "canine" | "dog" | "canina" | "canino" | "cão" | "cao" => Some(Self::Canine),
            "feline" | "cat" | "felina" | "felino" | "gato" => Some(Self::Feline),
            "equine" | "horse" | "equina" | "equino" | "cavalo" => Some(Self::Equine),
            _ => None,
        }
    }
}

impl FromStr for Species {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| DiagnosisError::UnknownSpecies(s.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
