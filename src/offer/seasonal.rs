//! Two-period (normal / season) rental pricing for a single item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{DiscountedPrice, Frequency, Week};

/// Which of the two periods an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Normal,
    Season,
}

/// One pricing regime over a week range.
///
/// `from_week > to_week` wraps over the year end (45 → 12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPeriod {
    pub from_week: Week,
    pub to_week: Week,
    pub frequency: Frequency,
    #[serde(flatten)]
    pub price: DiscountedPrice,
}

impl PricingPeriod {
    pub fn contains(&self, week: Week) -> bool {
        if self.from_week <= self.to_week {
            self.from_week <= week && week <= self.to_week
        } else {
            week >= self.from_week || week <= self.to_week
        }
    }
}

/// Normal and season periods; exists as a whole or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalPricing {
    pub normal: PricingPeriod,
    pub season: PricingPeriod,
}

impl SeasonalPricing {
    pub const NORMAL_FREQUENCY: Frequency = Frequency::FOUR_WEEKLY;
    pub const SEASON_FREQUENCY: Frequency = Frequency::WEEKLY;

    /// Default split: normal weeks 13-44 every 4 weeks, season 45-12 weekly.
    ///
    /// `price_at` prices the item at a frequency; `None` leaves a period unpriced.
    pub fn seeded(price_at: impl Fn(Frequency) -> Option<Decimal>) -> Self {
        let period = |from: u32, to: u32, frequency: Frequency| PricingPeriod {
            from_week: Week::from_iso(from),
            to_week: Week::from_iso(to),
            frequency,
            price: price_at(frequency)
                .map(DiscountedPrice::new)
                .unwrap_or_default(),
        };
        Self {
            normal: period(13, 44, Self::NORMAL_FREQUENCY),
            season: period(45, 12, Self::SEASON_FREQUENCY),
        }
    }

    pub fn period(&self, kind: PeriodKind) -> &PricingPeriod {
        match kind {
            PeriodKind::Normal => &self.normal,
            PeriodKind::Season => &self.season,
        }
    }

    pub fn period_mut(&mut self, kind: PeriodKind) -> &mut PricingPeriod {
        match kind {
            PeriodKind::Normal => &mut self.normal,
            PeriodKind::Season => &mut self.season,
        }
    }

    /// Period billed in `week`; the season wins where the ranges overlap.
    pub fn active(&self, week: Week) -> &PricingPeriod {
        if self.season.contains(week) {
            &self.season
        } else {
            &self.normal
        }
    }

    pub fn is_priced(&self) -> bool {
        self.normal.price.is_priced() && self.season.price.is_priced()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn week(n: u8) -> Week {
        Week::new(n).unwrap()
    }

    #[test]
    fn test_seeded_defaults() {
        let seasonal = SeasonalPricing::seeded(|f| Some(dec!(10) + Decimal::from(f.weeks())));
        assert_eq!(seasonal.normal.from_week, week(13));
        assert_eq!(seasonal.normal.to_week, week(44));
        assert_eq!(seasonal.normal.frequency, Frequency::FOUR_WEEKLY);
        assert_eq!(seasonal.normal.price.current(), dec!(14));
        assert_eq!(seasonal.season.from_week, week(45));
        assert_eq!(seasonal.season.to_week, week(12));
        assert_eq!(seasonal.season.frequency, Frequency::WEEKLY);
        assert_eq!(seasonal.season.price.current(), dec!(11));
    }

    #[test]
    fn test_seeded_without_price() {
        let seasonal = SeasonalPricing::seeded(|_| None);
        assert!(!seasonal.is_priced());
    }

    #[test]
    fn test_wrapping_period_contains() {
        let seasonal = SeasonalPricing::seeded(|_| None);
        assert!(seasonal.season.contains(week(45)));
        assert!(seasonal.season.contains(week(52)));
        assert!(seasonal.season.contains(week(1)));
        assert!(seasonal.season.contains(week(12)));
        assert!(!seasonal.season.contains(week(13)));
        assert!(seasonal.normal.contains(week(30)));
    }

    #[test]
    fn test_active_period() {
        let seasonal = SeasonalPricing::seeded(|_| None);
        assert_eq!(seasonal.active(week(2)).frequency, Frequency::WEEKLY);
        assert_eq!(seasonal.active(week(20)).frequency, Frequency::FOUR_WEEKLY);
    }

    #[test]
    fn test_week_outside_both_ranges_bills_normal() {
        let mut seasonal = SeasonalPricing::seeded(|_| None);
        seasonal.normal.to_week = week(30);
        // Week 35 belongs to neither range
        assert_eq!(seasonal.active(week(35)).frequency, Frequency::FOUR_WEEKLY);
    }
}
