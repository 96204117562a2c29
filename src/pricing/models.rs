//! Database models for the pricing reference data.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use std::collections::BTreeMap;
use tracing::warn;

use super::catalog::CatalogEntry;
use super::dimensions::area_m2;
use super::optibrush::OptibrushTierRow;
use super::settings::PricingSettings;
use super::types::Frequency;

/// Catalog row from mat_price_catalog
#[derive(Debug, Clone, FromRow)]
pub struct CatalogRow {
    pub code: String,
    pub name: String,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub price_1w: Option<Decimal>,
    pub price_2w: Option<Decimal>,
    pub price_3w: Option<Decimal>,
    pub price_4w: Option<Decimal>,
    pub purchase_price: Option<Decimal>,
    pub replacement_cost: Option<Decimal>,
    pub active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CatalogRow {
    pub fn is_available(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }

    pub fn into_entry(self) -> CatalogEntry {
        let prices: BTreeMap<Frequency, Decimal> = Frequency::all()
            .into_iter()
            .zip([self.price_1w, self.price_2w, self.price_3w, self.price_4w])
            .filter_map(|(frequency, price)| price.map(|p| (frequency, p)))
            .collect();

        CatalogEntry {
            m2: area_m2(self.width_cm, self.height_cm),
            code: self.code,
            name: self.name,
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            prices,
            purchase_price: self.purchase_price,
            replacement_cost: self.replacement_cost,
        }
    }
}

/// Settings row from mat_pricing_settings
#[derive(Debug, Clone, FromRow)]
pub struct PricingSettingsRow {
    pub special_shape_multiplier: Option<Decimal>,
    pub optibrush_special_shape_multiplier: Option<Decimal>,
    pub purchase_price_per_m2: Option<Decimal>,
    /// `{"1": "26.00", ...}`
    pub rental_price_per_m2: Option<serde_json::Value>,
    /// Array of Optibrush tier rows
    pub optibrush_tier_table: Option<serde_json::Value>,
    pub updated_at: DateTime<Utc>,
}

impl PricingSettingsRow {
    /// Layer the row over `base`; absent or unreadable columns keep the base value.
    pub fn apply_to(self, base: PricingSettings) -> PricingSettings {
        let mut settings = base;
        if let Some(value) = self.special_shape_multiplier {
            settings.special_shape_multiplier = value;
        }
        if let Some(value) = self.optibrush_special_shape_multiplier {
            settings.optibrush_special_shape_multiplier = value;
        }
        if let Some(value) = self.purchase_price_per_m2 {
            settings.purchase_price_per_m2 = value;
        }
        if let Some(json) = self.rental_price_per_m2 {
            match serde_json::from_value::<BTreeMap<Frequency, Decimal>>(json) {
                Ok(rates) => settings.rental_price_per_m2.extend(rates),
                Err(e) => warn!("Ignoring unreadable rental_price_per_m2: {}", e),
            }
        }
        if let Some(json) = self.optibrush_tier_table {
            match serde_json::from_value::<Vec<OptibrushTierRow>>(json) {
                Ok(rows) => settings.optibrush_tier_table = Some(rows),
                Err(e) => warn!("Ignoring unreadable optibrush_tier_table: {}", e),
            }
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog_row() -> CatalogRow {
        CatalogRow {
            code: "STD-85x60".to_string(),
            name: "Predpražnik 85x60 cm".to_string(),
            width_cm: dec!(85),
            height_cm: dec!(60),
            price_1w: Some(dec!(13.90)),
            price_2w: Some(dec!(12.00)),
            price_3w: None,
            price_4w: Some(dec!(9.90)),
            purchase_price: Some(dec!(89.00)),
            replacement_cost: None,
            active: true,
            deleted_at: None,
        }
    }

    #[test]
    fn test_catalog_row_into_entry() {
        let entry = catalog_row().into_entry();
        assert_eq!(entry.m2, dec!(0.51));
        assert_eq!(entry.rental_price(Frequency::BIWEEKLY), Some(dec!(12.00)));
        assert_eq!(entry.rental_price(Frequency::new(3).unwrap()), None);
        assert_eq!(entry.prices.len(), 3);
    }

    #[test]
    fn test_catalog_row_availability() {
        let mut row = catalog_row();
        assert!(row.is_available());
        row.deleted_at = Some(Utc::now());
        assert!(!row.is_available());
    }

    #[test]
    fn test_settings_row_overrides_base() {
        let row = PricingSettingsRow {
            special_shape_multiplier: Some(dec!(1.6)),
            optibrush_special_shape_multiplier: None,
            purchase_price_per_m2: Some(dec!(170)),
            rental_price_per_m2: Some(serde_json::json!({ "2": "23.00" })),
            optibrush_tier_table: Some(serde_json::json!("not a table")),
            updated_at: Utc::now(),
        };
        let settings = row.apply_to(PricingSettings::default());

        assert_eq!(settings.special_shape_multiplier, dec!(1.6));
        assert_eq!(settings.optibrush_special_shape_multiplier, dec!(1.3));
        assert_eq!(settings.purchase_price_per_m2, dec!(170));
        assert_eq!(settings.rental_rate_per_m2(Frequency::BIWEEKLY), dec!(23.00));
        assert_eq!(settings.rental_rate_per_m2(Frequency::FOUR_WEEKLY), dec!(19.00));
        assert!(settings.optibrush_tier_table.is_none());
    }
}
