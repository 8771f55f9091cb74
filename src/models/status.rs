//! Classification of a lab reading against its reference range

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a deviation from the reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Below the range
    Low,
    /// Above the range
    High,
}

/// Status of a reading relative to its species reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueStatus {
    /// Within the normal range
    Normal,
    /// Below the normal range but above the critical low bound
    AlteredLow,
    /// Above the normal range but below the critical high bound
    AlteredHigh,
    /// At or below the critical low bound
    CriticalLow,
    /// At or above the critical high bound
    CriticalHigh,
    /// No reference range applies (unknown exam, or reading treated as not measured)
    Unknown,
}

impl ValueStatus {
    /// Whether the reading is at a critical level
    #[must_use]
    pub const fn is_critical(self) -> bool {
        matches!(self, Self::CriticalLow | Self::CriticalHigh)
    }

    /// Whether the reading is outside the normal range but not critical
    #[must_use]
    pub const fn is_altered(self) -> bool {
        matches!(self, Self::AlteredLow | Self::AlteredHigh)
    }

    /// Whether the reading is outside the normal range at any level
    #[must_use]
    pub const fn is_abnormal(self) -> bool {
        self.is_critical() || self.is_altered()
    }

    /// Direction of the deviation, if any
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::AlteredLow | Self::CriticalLow => Some(Direction::Low),
            Self::AlteredHigh | Self::CriticalHigh => Some(Direction::High),
            Self::Normal | Self::Unknown => None,
        }
    }

    /// Get a short description of this status
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::AlteredLow => "low",
            Self::AlteredHigh => "high",
            Self::CriticalLow => "critically low",
            Self::CriticalHigh => "critically high",
            Self::Unknown => "no reference",
        }
    }
}

impl fmt::Display for ValueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
