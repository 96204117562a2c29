//! Small validated value types shared by the pricers and the offer wizard.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Input rejected before it reaches a pricer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Frequency must be between 1 and 4 weeks, got {0}")]
    InvalidFrequency(u8),

    #[error("Week must be between 1 and 52, got {0}")]
    InvalidWeek(u8),

    #[error("Discount must be between 0 and 100, got {0}")]
    InvalidDiscount(u8),

    #[error("Unknown color count '{0}' (expected '1' or '2-3')")]
    InvalidColorCount(String),
}

/// Replacement cadence in weeks; selects the rental price tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Frequency(u8);

impl Frequency {
    pub const WEEKLY: Frequency = Frequency(1);
    pub const BIWEEKLY: Frequency = Frequency(2);
    pub const FOUR_WEEKLY: Frequency = Frequency(4);

    pub fn new(weeks: u8) -> Result<Self, PricingError> {
        if (1..=4).contains(&weeks) {
            Ok(Self(weeks))
        } else {
            Err(PricingError::InvalidFrequency(weeks))
        }
    }

    pub fn weeks(self) -> u8 {
        self.0
    }

    pub fn all() -> [Frequency; 4] {
        [Frequency(1), Frequency(2), Frequency(3), Frequency(4)]
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::FOUR_WEEKLY
    }
}

impl TryFrom<u8> for Frequency {
    type Error = PricingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Frequency> for u8 {
    fn from(value: Frequency) -> Self {
        value.0
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Calendar week, 1-52.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Week(u8);

impl Week {
    pub fn new(week: u8) -> Result<Self, PricingError> {
        if (1..=52).contains(&week) {
            Ok(Self(week))
        } else {
            Err(PricingError::InvalidWeek(week))
        }
    }

    /// ISO week 53 falls into week 52.
    pub fn from_iso(week: u32) -> Self {
        Self(week.clamp(1, 52) as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Week {
    type Error = PricingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Week> for u8 {
    fn from(value: Week) -> Self {
        value.0
    }
}

/// Which pricer owns an item's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Standard,
    Design,
    Custom,
    Optibrush,
}

impl ItemType {
    /// Dimension-priced items where the special-shape multiplier applies.
    pub fn is_dimension_priced(self) -> bool {
        matches!(self, ItemType::Design | ItemType::Custom)
    }
}

/// Rental or purchase, for offers that carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Purpose {
    Najem,
    Nakup,
}

impl Purpose {
    /// Item type a new item of this purpose starts with.
    pub fn default_item_type(self) -> ItemType {
        match self {
            Purpose::Najem => ItemType::Standard,
            Purpose::Nakup => ItemType::Design,
        }
    }
}

/// Optibrush print colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorCount {
    #[default]
    #[serde(rename = "1")]
    One,
    #[serde(rename = "2-3")]
    TwoToThree,
}

impl std::str::FromStr for ColorCount {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(ColorCount::One),
            "2-3" => Ok(ColorCount::TwoToThree),
            other => Err(PricingError::InvalidColorCount(other.to_string())),
        }
    }
}
