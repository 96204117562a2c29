//! Pricing engine module for mat offers.
//!
//! Pure pricers over a catalog/settings snapshot: catalog prices for
//! standard mats, per-m² prices for design and custom mats, the Optibrush
//! tier model, and the discount math shared by all of them.

pub mod calculators;
pub mod catalog;
pub mod dimensions;
pub mod models;
pub mod optibrush;
pub mod settings;
pub mod types;

// Re-export commonly used items
pub use calculators::{apply_discount, infer_discount, round_money, DiscountedPrice};
pub use catalog::{CatalogEntry, PriceCatalog, StaticCatalog};
pub use dimensions::{area_m2, parse_dimensions, parse_m2, DimensionPricer, DimensionQuote};
pub use optibrush::{OptibrushConfig, OptibrushFingerprint, OptibrushPricer, OptibrushQuote};
pub use settings::PricingSettings;
pub use types::{ColorCount, Frequency, ItemType, PricingError, Purpose, Week};

/// Catalog and settings snapshot every pricing operation reads from.
#[derive(Clone, Copy)]
pub struct PricingContext<'a> {
    pub catalog: &'a dyn PriceCatalog,
    pub settings: &'a PricingSettings,
}

impl<'a> PricingContext<'a> {
    pub fn new(catalog: &'a dyn PriceCatalog, settings: &'a PricingSettings) -> Self {
        Self { catalog, settings }
    }

    pub fn dimensions(&self) -> DimensionPricer<'a> {
        DimensionPricer::new(self.catalog, self.settings)
    }

    pub fn optibrush(&self) -> OptibrushPricer<'a> {
        OptibrushPricer::new(self.settings)
    }
}
