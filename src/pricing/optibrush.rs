//! Optibrush tier pricing.
//!
//! Optibrush mats are priced per m² from a tier picked by five factors:
//! edge, color count, drainage holes, standard vs custom size and area class.
//! The configurable tier table wins where it has a row; the built-in table
//! covers every combination.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::calculators::round_money;
use super::dimensions::area_m2;
use super::settings::PricingSettings;
use super::types::ColorCount;

/// Area above which the large-mat tier applies
pub const LARGE_AREA_THRESHOLD_M2: Decimal = dec!(7.5);

/// Standard Optibrush sizes in cm (matched in either orientation)
pub const STANDARD_SIZES_CM: [(u32, u32); 7] = [
    (60, 85),
    (85, 150),
    (115, 180),
    (115, 200),
    (150, 250),
    (150, 300),
    (200, 400),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Standard,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaClass {
    Small,
    Large,
}

/// The classification a price per m² is looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptibrushTier {
    pub has_edge: bool,
    pub color_count: ColorCount,
    pub has_drainage: bool,
    pub size: SizeClass,
    pub area: AreaClass,
}

/// One row of a tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptibrushTierRow {
    pub has_edge: bool,
    pub color_count: ColorCount,
    pub has_drainage: bool,
    pub size: SizeClass,
    pub area: AreaClass,
    pub price_per_m2: Decimal,
}

impl OptibrushTierRow {
    fn tier(&self) -> OptibrushTier {
        OptibrushTier {
            has_edge: self.has_edge,
            color_count: self.color_count,
            has_drainage: self.has_drainage,
            size: self.size,
            area: self.area,
        }
    }
}

/// Inputs of one Optibrush configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptibrushConfig {
    pub has_edge: bool,
    pub color_count: ColorCount,
    pub has_drainage: bool,
    pub special_shape: bool,
    pub width_cm: Option<u32>,
    pub height_cm: Option<u32>,
}

impl OptibrushConfig {
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width_cm, self.height_cm) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    pub fn m2(&self) -> Decimal {
        self.dimensions()
            .map(|(w, h)| area_m2(Decimal::from(w), Decimal::from(h)))
            .unwrap_or(Decimal::ZERO)
    }

    pub fn size_class(&self) -> SizeClass {
        match self.dimensions() {
            Some((w, h)) if is_standard_size(w, h) => SizeClass::Standard,
            _ => SizeClass::Custom,
        }
    }

    pub fn classify(&self) -> OptibrushTier {
        OptibrushTier {
            has_edge: self.has_edge,
            color_count: self.color_count,
            has_drainage: self.has_drainage,
            size: self.size_class(),
            area: if self.m2() > LARGE_AREA_THRESHOLD_M2 {
                AreaClass::Large
            } else {
                AreaClass::Small
            },
        }
    }

    pub fn fingerprint(&self) -> OptibrushFingerprint {
        let mut flags = 0u8;
        if self.has_edge {
            flags |= 0b0001;
        }
        if self.color_count == ColorCount::TwoToThree {
            flags |= 0b0010;
        }
        if self.has_drainage {
            flags |= 0b0100;
        }
        if self.special_shape {
            flags |= 0b1000;
        }
        OptibrushFingerprint {
            flags,
            width_cm: self.width_cm.unwrap_or(0),
            height_cm: self.height_cm.unwrap_or(0),
        }
    }
}

/// Packed copy of every pricing input; equal fingerprints price identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptibrushFingerprint {
    flags: u8,
    width_cm: u32,
    height_cm: u32,
}

pub fn is_standard_size(width_cm: u32, height_cm: u32) -> bool {
    STANDARD_SIZES_CM
        .iter()
        .any(|&(w, h)| (w == width_cm && h == height_cm) || (w == height_cm && h == width_cm))
}

/// Priced Optibrush configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptibrushQuote {
    pub tier: OptibrushTier,
    /// Effective €/m², special shape included
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_m2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub m2: Decimal,
}

pub struct OptibrushPricer<'a> {
    settings: &'a PricingSettings,
}

impl<'a> OptibrushPricer<'a> {
    pub fn new(settings: &'a PricingSettings) -> Self {
        Self { settings }
    }

    pub fn quote(&self, config: &OptibrushConfig) -> OptibrushQuote {
        let tier = config.classify();
        let base = self.tier_price(&tier);
        let multiplier = self.settings.optibrush_shape_multiplier(config.special_shape);
        let price_per_m2 = round_money(base * multiplier, 2);
        let m2 = config.m2();

        OptibrushQuote {
            tier,
            price_per_m2,
            total_price: round_money(price_per_m2 * m2, 2),
            m2,
        }
    }

    /// Price per m² for a tier: configured table first, built-in table second.
    pub fn tier_price(&self, tier: &OptibrushTier) -> Decimal {
        if let Some(table) = &self.settings.optibrush_tier_table {
            if let Some(row) = table.iter().find(|row| row.tier() == *tier) {
                return row.price_per_m2;
            }
            warn!(?tier, "Optibrush tier missing from configured table, using built-in price");
        } else {
            debug!(?tier, "No configured Optibrush table, using built-in price");
        }
        builtin_tier_price(tier)
    }
}

/// Built-in €/m² table: (edge, colors 2-3, drainage, size, area, price)
const BUILTIN_TIERS: [(bool, bool, bool, SizeClass, AreaClass, u32); 32] = [
    (false, false, false, SizeClass::Standard, AreaClass::Small, 119),
    (false, false, false, SizeClass::Standard, AreaClass::Large, 109),
    (false, false, false, SizeClass::Custom, AreaClass::Small, 134),
    (false, false, false, SizeClass::Custom, AreaClass::Large, 124),
    (false, false, true, SizeClass::Standard, AreaClass::Small, 129),
    (false, false, true, SizeClass::Standard, AreaClass::Large, 119),
    (false, false, true, SizeClass::Custom, AreaClass::Small, 144),
    (false, false, true, SizeClass::Custom, AreaClass::Large, 134),
    (false, true, false, SizeClass::Standard, AreaClass::Small, 134),
    (false, true, false, SizeClass::Standard, AreaClass::Large, 124),
    (false, true, false, SizeClass::Custom, AreaClass::Small, 149),
    (false, true, false, SizeClass::Custom, AreaClass::Large, 139),
    (false, true, true, SizeClass::Standard, AreaClass::Small, 144),
    (false, true, true, SizeClass::Standard, AreaClass::Large, 134),
    (false, true, true, SizeClass::Custom, AreaClass::Small, 159),
    (false, true, true, SizeClass::Custom, AreaClass::Large, 149),
    (true, false, false, SizeClass::Standard, AreaClass::Small, 139),
    (true, false, false, SizeClass::Standard, AreaClass::Large, 129),
    (true, false, false, SizeClass::Custom, AreaClass::Small, 154),
    (true, false, false, SizeClass::Custom, AreaClass::Large, 144),
    (true, false, true, SizeClass::Standard, AreaClass::Small, 149),
    (true, false, true, SizeClass::Standard, AreaClass::Large, 139),
    (true, false, true, SizeClass::Custom, AreaClass::Small, 164),
    (true, false, true, SizeClass::Custom, AreaClass::Large, 154),
    (true, true, false, SizeClass::Standard, AreaClass::Small, 154),
    (true, true, false, SizeClass::Standard, AreaClass::Large, 144),
    (true, true, false, SizeClass::Custom, AreaClass::Small, 169),
    (true, true, false, SizeClass::Custom, AreaClass::Large, 159),
    (true, true, true, SizeClass::Standard, AreaClass::Small, 164),
    (true, true, true, SizeClass::Standard, AreaClass::Large, 154),
    (true, true, true, SizeClass::Custom, AreaClass::Small, 179),
    (true, true, true, SizeClass::Custom, AreaClass::Large, 169),
];

pub fn builtin_tier_price(tier: &OptibrushTier) -> Decimal {
    let two_to_three = tier.color_count == ColorCount::TwoToThree;
    BUILTIN_TIERS
        .iter()
        .find(|(edge, colors, drainage, size, area, _)| {
            *edge == tier.has_edge
                && *colors == two_to_three
                && *drainage == tier.has_drainage
                && *size == tier.size
                && *area == tier.area
        })
        .map(|row| Decimal::from(row.5))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32) -> OptibrushConfig {
        OptibrushConfig {
            width_cm: Some(width),
            height_cm: Some(height),
            ..Default::default()
        }
    }

    // ==================== classification tests ====================

    #[test]
    fn test_standard_size_either_orientation() {
        assert!(is_standard_size(85, 60));
        assert!(is_standard_size(60, 85));
        assert!(!is_standard_size(100, 100));
    }

    #[test]
    fn test_classify_area_threshold() {
        // 250 x 300 = 7.50 m², not above the threshold
        assert_eq!(config(250, 300).classify().area, AreaClass::Small);
        // 250 x 301 = 7.53 m²
        assert_eq!(config(250, 301).classify().area, AreaClass::Large);
        assert_eq!(config(200, 400).classify().size, SizeClass::Standard);
        assert_eq!(config(200, 400).classify().area, AreaClass::Large);
    }

    #[test]
    fn test_classify_missing_dimensions_is_custom_small() {
        let tier = OptibrushConfig::default().classify();
        assert_eq!(tier.size, SizeClass::Custom);
        assert_eq!(tier.area, AreaClass::Small);
    }

    #[test]
    fn test_builtin_table_complete() {
        for has_edge in [false, true] {
            for color_count in [ColorCount::One, ColorCount::TwoToThree] {
                for has_drainage in [false, true] {
                    for size in [SizeClass::Standard, SizeClass::Custom] {
                        for area in [AreaClass::Small, AreaClass::Large] {
                            let tier = OptibrushTier {
                                has_edge,
                                color_count,
                                has_drainage,
                                size,
                                area,
                            };
                            assert!(builtin_tier_price(&tier) > Decimal::ZERO, "{:?}", tier);
                        }
                    }
                }
            }
        }
    }

    // ==================== pricing tests ====================

    #[test]
    fn test_quote_standard_plain() {
        let settings = PricingSettings::default();
        let quote = OptibrushPricer::new(&settings).quote(&config(85, 150));
        assert_eq!(quote.m2, dec!(1.28));
        assert_eq!(quote.price_per_m2, dec!(119));
        assert_eq!(quote.total_price, dec!(152.32));
    }

    #[test]
    fn test_quote_special_shape_uses_optibrush_multiplier() {
        let settings = PricingSettings::default();
        let shaped = OptibrushConfig {
            special_shape: true,
            ..config(85, 150)
        };
        let quote = OptibrushPricer::new(&settings).quote(&shaped);
        // 119 * 1.3
        assert_eq!(quote.price_per_m2, dec!(154.70));
        assert_eq!(quote.total_price, dec!(198.02));
    }

    #[test]
    fn test_quote_all_factors_custom() {
        let settings = PricingSettings::default();
        let cfg = OptibrushConfig {
            has_edge: true,
            color_count: ColorCount::TwoToThree,
            has_drainage: true,
            ..config(100, 100)
        };
        let quote = OptibrushPricer::new(&settings).quote(&cfg);
        assert_eq!(quote.price_per_m2, dec!(179));
        assert_eq!(quote.total_price, dec!(179));
    }

    #[test]
    fn test_configured_table_wins_and_falls_back() {
        let settings = PricingSettings {
            optibrush_tier_table: Some(vec![OptibrushTierRow {
                has_edge: false,
                color_count: ColorCount::One,
                has_drainage: false,
                size: SizeClass::Standard,
                area: AreaClass::Small,
                price_per_m2: dec!(99),
            }]),
            ..Default::default()
        };
        let pricer = OptibrushPricer::new(&settings);
        assert_eq!(pricer.quote(&config(85, 150)).price_per_m2, dec!(99));
        // Custom size is not in the configured table
        assert_eq!(pricer.quote(&config(100, 100)).price_per_m2, dec!(134));
    }

    #[test]
    fn test_quote_without_dimensions_is_zero() {
        let settings = PricingSettings::default();
        let quote = OptibrushPricer::new(&settings).quote(&OptibrushConfig::default());
        assert_eq!(quote.m2, dec!(0));
        assert_eq!(quote.total_price, dec!(0));
    }

    #[test]
    fn test_fingerprint_tracks_every_input() {
        let base = config(85, 150);
        assert_eq!(base.fingerprint(), config(85, 150).fingerprint());
        let variants = [
            OptibrushConfig { has_edge: true, ..base },
            OptibrushConfig { color_count: ColorCount::TwoToThree, ..base },
            OptibrushConfig { has_drainage: true, ..base },
            OptibrushConfig { special_shape: true, ..base },
            OptibrushConfig { width_cm: Some(86), ..base },
            OptibrushConfig { height_cm: None, ..base },
        ];
        for variant in variants {
            assert_ne!(variant.fingerprint(), base.fingerprint());
        }
    }
}
