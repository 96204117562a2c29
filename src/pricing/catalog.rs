//! Price catalog: line-item code to dimensions, area and prices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::dimensions::area_m2;
use super::types::Frequency;

/// One priced size in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub m2: Decimal,
    /// Rental price per replacement, by frequency
    pub prices: BTreeMap<Frequency, Decimal>,
    pub purchase_price: Option<Decimal>,
    /// Charged when a rented mat is lost or destroyed
    pub replacement_cost: Option<Decimal>,
}

impl CatalogEntry {
    /// Display dimensions, e.g. `85x60`
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width_cm.normalize(), self.height_cm.normalize())
    }

    pub fn rental_price(&self, frequency: Frequency) -> Option<Decimal> {
        self.prices.get(&frequency).copied()
    }

    /// Same size in either orientation.
    pub fn matches_size(&self, width_cm: Decimal, height_cm: Decimal) -> bool {
        (self.width_cm == width_cm && self.height_cm == height_cm)
            || (self.width_cm == height_cm && self.height_cm == width_cm)
    }
}

/// Lookup of catalog entries by code.
pub trait PriceCatalog: Send + Sync {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry>;

    fn entries(&self) -> &[CatalogEntry];

    fn find_by_dimensions(&self, width_cm: Decimal, height_cm: Decimal) -> Option<&CatalogEntry> {
        self.entries()
            .iter()
            .find(|entry| entry.matches_size(width_cm, height_cm))
    }
}

/// In-memory catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
    by_code: HashMap<String, usize>,
}

impl StaticCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let by_code = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.code.clone(), idx))
            .collect();
        Self { entries, by_code }
    }

    /// Standard rental mat sizes.
    pub fn builtin() -> Self {
        Self::new(vec![
            standard_entry(
                dec!(85),
                dec!(60),
                [dec!(13.90), dec!(12.00), dec!(10.80), dec!(9.90)],
                dec!(89.00),
                dec!(120.00),
            ),
            standard_entry(
                dec!(85),
                dec!(150),
                [dec!(21.50), dec!(18.90), dec!(17.20), dec!(15.90)],
                dec!(189.00),
                dec!(260.00),
            ),
            standard_entry(
                dec!(115),
                dec!(180),
                [dec!(27.90), dec!(24.70), dec!(22.40), dec!(20.80)],
                dec!(299.00),
                dec!(380.00),
            ),
            standard_entry(
                dec!(115),
                dec!(200),
                [dec!(29.90), dec!(26.50), dec!(24.10), dec!(22.30)],
                dec!(329.00),
                dec!(410.00),
            ),
            standard_entry(
                dec!(150),
                dec!(250),
                [dec!(41.90), dec!(37.20), dec!(33.80), dec!(31.20)],
                dec!(499.00),
                dec!(620.00),
            ),
            standard_entry(
                dec!(150),
                dec!(300),
                [dec!(48.90), dec!(43.40), dec!(39.50), dec!(36.40)],
                dec!(589.00),
                dec!(720.00),
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PriceCatalog for StaticCatalog {
    fn lookup(&self, code: &str) -> Option<&CatalogEntry> {
        self.by_code
            .get(code.trim())
            .and_then(|idx| self.entries.get(*idx))
    }

    fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

fn standard_entry(
    width_cm: Decimal,
    height_cm: Decimal,
    prices: [Decimal; 4],
    purchase_price: Decimal,
    replacement_cost: Decimal,
) -> CatalogEntry {
    CatalogEntry {
        code: format!("STD-{}x{}", width_cm, height_cm),
        name: format!("Predpražnik {}x{} cm", width_cm, height_cm),
        width_cm,
        height_cm,
        m2: area_m2(width_cm, height_cm),
        prices: Frequency::all().into_iter().zip(prices).collect(),
        purchase_price: Some(purchase_price),
        replacement_cost: Some(replacement_cost),
    }
}
