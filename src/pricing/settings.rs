//! Pricing settings snapshot.
//!
//! Values come from the `mat_pricing_settings` row when a database is
//! configured, with the built-in constants below as fallback.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::optibrush::OptibrushTierRow;
use super::types::Frequency;

/// Multiplier for special-shape design/custom mats (+50%).
pub const DEFAULT_SPECIAL_SHAPE_MULTIPLIER: Decimal = dec!(1.5);

/// Multiplier for special-shape Optibrush mats (+30%).
pub const DEFAULT_OPTIBRUSH_SPECIAL_SHAPE_MULTIPLIER: Decimal = dec!(1.3);

/// Purchase price per m² for design/custom mats.
pub const DEFAULT_PURCHASE_PRICE_PER_M2: Decimal = dec!(165);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingSettings {
    pub special_shape_multiplier: Decimal,
    pub optibrush_special_shape_multiplier: Decimal,
    pub purchase_price_per_m2: Decimal,
    /// Rental price per m² per replacement, by frequency
    pub rental_price_per_m2: BTreeMap<Frequency, Decimal>,
    /// Overrides the built-in Optibrush table where rows are present
    pub optibrush_tier_table: Option<Vec<OptibrushTierRow>>,
}

impl PricingSettings {
    /// Rental €/m² for a frequency; falls back to the built-in rate.
    pub fn rental_rate_per_m2(&self, frequency: Frequency) -> Decimal {
        self.rental_price_per_m2
            .get(&frequency)
            .copied()
            .unwrap_or_else(|| default_rental_rate(frequency))
    }

    pub fn shape_multiplier(&self, special_shape: bool) -> Decimal {
        if special_shape {
            self.special_shape_multiplier
        } else {
            Decimal::ONE
        }
    }

    pub fn optibrush_shape_multiplier(&self, special_shape: bool) -> Decimal {
        if special_shape {
            self.optibrush_special_shape_multiplier
        } else {
            Decimal::ONE
        }
    }
}

fn default_rental_rate(frequency: Frequency) -> Decimal {
    match frequency.weeks() {
        1 => dec!(26.00),
        2 => dec!(22.50),
        3 => dec!(20.50),
        _ => dec!(19.00),
    }
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            special_shape_multiplier: DEFAULT_SPECIAL_SHAPE_MULTIPLIER,
            optibrush_special_shape_multiplier: DEFAULT_OPTIBRUSH_SPECIAL_SHAPE_MULTIPLIER,
            purchase_price_per_m2: DEFAULT_PURCHASE_PRICE_PER_M2,
            rental_price_per_m2: Frequency::all()
                .into_iter()
                .map(|f| (f, default_rental_rate(f)))
                .collect(),
            optibrush_tier_table: None,
        }
    }
}
