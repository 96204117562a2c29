//! Free-form dimension parsing and per-m² pricing for design/custom mats.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::calculators::round_money;
use super::catalog::PriceCatalog;
use super::settings::PricingSettings;
use super::types::Frequency;

const SEPARATORS: [char; 4] = ['*', 'x', 'X', '×'];

/// Parse `"120*180"`, `"120x180"` or `"85,5 x 60"` into centimetres.
///
/// Returns `None` for anything that is not two positive numbers.
pub fn parse_dimensions(input: &str) -> Option<(Decimal, Decimal)> {
    let mut parts = input.trim().split(|c| SEPARATORS.contains(&c));
    let width = parse_cm(parts.next()?)?;
    let height = parse_cm(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((width, height))
}

fn parse_cm(part: &str) -> Option<Decimal> {
    let value: Decimal = part.trim().replace(',', ".").parse().ok()?;
    (value > Decimal::ZERO).then_some(value)
}

/// Area in m² from centimetres, rounded to 2 decimals.
pub fn area_m2(width_cm: Decimal, height_cm: Decimal) -> Decimal {
    round_money(width_cm * height_cm / Decimal::from(10_000), 2)
}

/// Area of a dimension string; 0 when it does not parse.
pub fn parse_m2(input: &str) -> Decimal {
    parse_dimensions(input)
        .map(|(w, h)| area_m2(w, h))
        .unwrap_or(Decimal::ZERO)
}

/// Result of pricing a dimension string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionQuote {
    #[serde(with = "rust_decimal::serde::str")]
    pub m2: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    /// Catalog code when the size matched a standard entry
    pub catalog_code: Option<String>,
}

/// Prices design and custom mats from their dimensions.
pub struct DimensionPricer<'a> {
    catalog: &'a dyn PriceCatalog,
    settings: &'a PricingSettings,
}

impl<'a> DimensionPricer<'a> {
    pub fn new(catalog: &'a dyn PriceCatalog, settings: &'a PricingSettings) -> Self {
        Self { catalog, settings }
    }

    /// Rental price per replacement.
    ///
    /// An exact catalog size uses the catalog price; anything else is
    /// `m2 × rate(frequency)`. The special-shape multiplier applies to both.
    pub fn rental(&self, size: &str, frequency: Frequency, special_shape: bool) -> DimensionQuote {
        let Some((width, height)) = parse_dimensions(size) else {
            debug!(size, "Unparseable dimensions, pricing at zero");
            return DimensionQuote::zero();
        };
        let m2 = area_m2(width, height);
        let multiplier = self.settings.shape_multiplier(special_shape);

        if let Some(entry) = self.catalog.find_by_dimensions(width, height) {
            if let Some(price) = entry.rental_price(frequency) {
                return DimensionQuote {
                    m2,
                    price: round_money(price * multiplier, 2),
                    catalog_code: Some(entry.code.clone()),
                };
            }
        }

        let rate = self.settings.rental_rate_per_m2(frequency);
        DimensionQuote {
            m2,
            price: round_money(m2 * rate * multiplier, 2),
            catalog_code: None,
        }
    }

    /// One-time purchase price: `m2 × purchase rate`, independent of frequency.
    pub fn purchase(&self, size: &str, special_shape: bool) -> DimensionQuote {
        let m2 = parse_m2(size);
        let multiplier = self.settings.shape_multiplier(special_shape);
        DimensionQuote {
            m2,
            price: round_money(m2 * self.settings.purchase_price_per_m2 * multiplier, 2),
            catalog_code: None,
        }
    }
}

impl DimensionQuote {
    fn zero() -> Self {
        Self {
            m2: Decimal::ZERO,
            price: Decimal::ZERO,
            catalog_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::catalog::StaticCatalog;
    use rust_decimal_macros::dec;

    // ==================== parsing tests ====================

    #[test]
    fn test_parse_dimensions_separators() {
        assert_eq!(parse_dimensions("120*180"), Some((dec!(120), dec!(180))));
        assert_eq!(parse_dimensions(" 85 x 60 "), Some((dec!(85), dec!(60))));
        assert_eq!(parse_dimensions("85X150"), Some((dec!(85), dec!(150))));
        assert_eq!(parse_dimensions("85,5×60"), Some((dec!(85.5), dec!(60))));
    }

    #[test]
    fn test_parse_dimensions_malformed() {
        assert_eq!(parse_dimensions(""), None);
        assert_eq!(parse_dimensions("120"), None);
        assert_eq!(parse_dimensions("120*"), None);
        assert_eq!(parse_dimensions("abc*100"), None);
        assert_eq!(parse_dimensions("0*100"), None);
        assert_eq!(parse_dimensions("10*10*10"), None);
    }

    #[test]
    fn test_parse_m2() {
        assert_eq!(parse_m2("120*180"), dec!(2.16));
        assert_eq!(parse_m2("85x60"), dec!(0.51));
        assert_eq!(parse_m2("garbage"), dec!(0));
    }

    // ==================== pricing tests ====================

    #[test]
    fn test_purchase_custom_dimensions() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let pricer = DimensionPricer::new(&catalog, &settings);

        let quote = pricer.purchase("120*180", false);
        assert_eq!(quote.m2, dec!(2.16));
        assert_eq!(quote.price, dec!(356.40));
    }

    #[test]
    fn test_purchase_special_shape() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let pricer = DimensionPricer::new(&catalog, &settings);

        assert_eq!(pricer.purchase("120*180", true).price, dec!(534.60));
    }

    #[test]
    fn test_rental_uses_catalog_for_exact_size() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let pricer = DimensionPricer::new(&catalog, &settings);

        let quote = pricer.rental("60*85", Frequency::BIWEEKLY, false);
        assert_eq!(quote.price, dec!(12.00));
        assert_eq!(quote.catalog_code.as_deref(), Some("STD-85x60"));
    }

    #[test]
    fn test_rental_custom_size_uses_rate() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let pricer = DimensionPricer::new(&catalog, &settings);

        // 2.16 m² * 19.00
        let quote = pricer.rental("120*180", Frequency::FOUR_WEEKLY, false);
        assert_eq!(quote.price, dec!(41.04));
        assert!(quote.catalog_code.is_none());

        let shaped = pricer.rental("120*180", Frequency::FOUR_WEEKLY, true);
        assert_eq!(shaped.price, dec!(61.56));
    }

    #[test]
    fn test_malformed_prices_at_zero() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let pricer = DimensionPricer::new(&catalog, &settings);

        assert_eq!(pricer.rental("12O*180", Frequency::WEEKLY, true).price, dec!(0));
        assert_eq!(pricer.purchase("", false).price, dec!(0));
    }
}
