//! One configurable offer line and the edits applied to it.
//!
//! Every edit that changes what an item *is* (code, dimensions, shape,
//! frequency) reprices it from scratch and resets the discount. Price and
//! discount edits only move along the existing baseline.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::pricing::{
    DiscountedPrice, Frequency, ItemType, OptibrushConfig, OptibrushFingerprint, PricingContext,
    PricingError, Purpose, Week,
};

use super::error::OfferError;
use super::seasonal::{PeriodKind, PricingPeriod, SeasonalPricing};

/// Code of free-dimension items
pub const CUSTOM_CODE: &str = "CUSTOM";

/// Optibrush inputs plus the last priced fingerprint
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptibrushState {
    #[serde(flatten)]
    pub config: OptibrushConfig,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_m2: Decimal,
    #[serde(skip)]
    last_fingerprint: Option<OptibrushFingerprint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
    id: u32,
    item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<Purpose>,
    /// Rental or purchase pricing, whether or not `purpose` is shown
    #[serde(skip)]
    billing: Purpose,
    code: String,
    name: String,
    size: String,
    #[serde(with = "rust_decimal::serde::str")]
    m2: Decimal,
    quantity: u32,
    #[serde(flatten)]
    price: DiscountedPrice,
    #[serde(with = "rust_decimal::serde::str_option", skip_serializing_if = "Option::is_none")]
    replacement_cost: Option<Decimal>,
    customized: bool,
    special_shape: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_override: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seasonal: Option<SeasonalPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    optibrush: Option<OptibrushState>,
}

impl OfferItem {
    /// Empty item with the default type for its billing.
    pub fn new(id: u32, billing: Purpose, purpose: Option<Purpose>) -> Self {
        let mut item = Self {
            id,
            item_type: ItemType::Standard,
            purpose,
            billing,
            code: String::new(),
            name: String::new(),
            size: String::new(),
            m2: Decimal::ZERO,
            quantity: 1,
            price: DiscountedPrice::default(),
            replacement_cost: None,
            customized: false,
            special_shape: false,
            frequency_override: None,
            seasonal: None,
            optibrush: None,
        };
        item.reset_configuration(billing.default_item_type());
        item
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    pub fn purpose(&self) -> Option<Purpose> {
        self.purpose
    }

    pub fn billing(&self) -> Purpose {
        self.billing
    }

    pub fn is_rental(&self) -> bool {
        self.billing == Purpose::Najem
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn m2(&self) -> Decimal {
        self.m2
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn pricing(&self) -> DiscountedPrice {
        self.price
    }

    pub fn price_per_unit(&self) -> Decimal {
        self.price.current()
    }

    pub fn original_price(&self) -> Decimal {
        self.price.original()
    }

    pub fn discount(&self) -> u8 {
        self.price.discount()
    }

    pub fn replacement_cost(&self) -> Option<Decimal> {
        self.replacement_cost
    }

    pub fn customized(&self) -> bool {
        self.customized
    }

    pub fn special_shape(&self) -> bool {
        self.special_shape
    }

    pub fn frequency_override(&self) -> Option<Frequency> {
        self.frequency_override
    }

    pub fn seasonal(&self) -> Option<&SeasonalPricing> {
        self.seasonal.as_ref()
    }

    pub fn optibrush(&self) -> Option<&OptibrushState> {
        self.optibrush.as_ref()
    }

    pub fn effective_frequency(&self, offer_frequency: Frequency) -> Frequency {
        self.frequency_override.unwrap_or(offer_frequency)
    }

    /// Has a resolved code, or Optibrush dimensions.
    pub fn is_valid(&self) -> bool {
        match self.item_type {
            ItemType::Optibrush => self
                .optibrush
                .as_ref()
                .is_some_and(|state| state.config.dimensions().is_some()),
            _ => !self.code.trim().is_empty(),
        }
    }

    /// Valid and priced; what the wizard requires before moving on.
    pub fn is_complete(&self) -> bool {
        let priced = match &self.seasonal {
            Some(seasonal) => seasonal.is_priced(),
            None => self.price.is_priced(),
        };
        self.is_valid() && priced
    }

    /// Price billed in `week`; seasonal items use the active period.
    pub fn pricing_in(&self, week: Week) -> DiscountedPrice {
        match &self.seasonal {
            Some(seasonal) => seasonal.active(week).price,
            None => self.price,
        }
    }

    pub fn unit_price_in(&self, week: Week) -> Decimal {
        self.pricing_in(week).current()
    }

    pub fn line_total_in(&self, week: Week) -> Decimal {
        self.unit_price_in(week) * Decimal::from(self.quantity)
    }

    /// Price the item's current configuration at `frequency`.
    ///
    /// `None` means there is nothing to price (no code, catalog miss, no size).
    pub fn base_price(&self, ctx: &PricingContext<'_>, frequency: Frequency) -> Option<Decimal> {
        match self.item_type {
            ItemType::Standard => {
                let entry = ctx.catalog.lookup(&self.code)?;
                match self.billing {
                    Purpose::Najem => entry.rental_price(frequency),
                    Purpose::Nakup => entry.purchase_price,
                }
            }
            ItemType::Design | ItemType::Custom => {
                if self.size.trim().is_empty() {
                    return None;
                }
                let pricer = ctx.dimensions();
                let quote = match self.billing {
                    Purpose::Najem => pricer.rental(&self.size, frequency, self.special_shape),
                    Purpose::Nakup => pricer.purchase(&self.size, self.special_shape),
                };
                Some(quote.price)
            }
            ItemType::Optibrush => self
                .optibrush
                .as_ref()
                .map(|state| ctx.optibrush().quote(&state.config).total_price),
        }
    }

    /// Recompute the price from scratch; keeps the old price on a miss.
    fn reprice(&mut self, ctx: &PricingContext<'_>, frequency: Frequency) -> bool {
        match self.base_price(ctx, frequency) {
            Some(price) => {
                self.price = DiscountedPrice::new(price);
                self.refresh_seasonal(ctx);
                true
            }
            None => {
                debug!(
                    item_id = self.id,
                    code = %self.code,
                    "Nothing to price, keeping previous price"
                );
                false
            }
        }
    }

    fn refresh_seasonal(&mut self, ctx: &PricingContext<'_>) {
        let Some(seasonal) = self.seasonal else {
            return;
        };
        let normal = self.base_price(ctx, seasonal.normal.frequency);
        let season = self.base_price(ctx, seasonal.season.frequency);
        if let Some(seasonal) = self.seasonal.as_mut() {
            seasonal.normal.price = normal.map(DiscountedPrice::new).unwrap_or_default();
            seasonal.season.price = season.map(DiscountedPrice::new).unwrap_or_default();
        }
    }

    fn reset_configuration(&mut self, item_type: ItemType) {
        self.item_type = item_type;
        self.code = match item_type {
            ItemType::Custom => CUSTOM_CODE.to_string(),
            _ => String::new(),
        };
        self.name.clear();
        self.size.clear();
        self.m2 = Decimal::ZERO;
        self.price = DiscountedPrice::default();
        self.customized = false;
        self.special_shape = false;
        self.seasonal = None;
        self.optibrush = (item_type == ItemType::Optibrush).then(OptibrushState::default);
    }

    // ==================== configuration edits ====================

    /// Pick a catalog code. A miss records the code but keeps the price.
    pub fn select_code(
        &mut self,
        ctx: &PricingContext<'_>,
        code: &str,
        offer_frequency: Frequency,
    ) -> bool {
        if self.item_type == ItemType::Optibrush {
            return false;
        }
        let code = code.trim();
        self.code = code.to_string();

        let Some(entry) = ctx.catalog.lookup(code) else {
            debug!(item_id = self.id, code, "Catalog miss");
            return false;
        };
        debug!(item_id = self.id, code, "Catalog hit");
        self.name = entry.name.clone();
        self.size = entry.dimensions();
        self.m2 = entry.m2;
        if self.is_rental() && self.replacement_cost.is_none() {
            self.replacement_cost = entry.replacement_cost;
        }
        let frequency = self.effective_frequency(offer_frequency);
        self.reprice(ctx, frequency)
    }

    /// Set free-form dimensions on a design/custom item.
    ///
    /// Unparseable input leaves the item at m² 0 and price 0.
    pub fn set_dimensions(
        &mut self,
        ctx: &PricingContext<'_>,
        size: &str,
        offer_frequency: Frequency,
    ) -> bool {
        if !self.item_type.is_dimension_priced() {
            return false;
        }
        self.size = size.trim().to_string();
        self.m2 = crate::pricing::parse_m2(&self.size);
        if self.code.is_empty() || ctx.catalog.lookup(&self.code).is_some() {
            self.code = CUSTOM_CODE.to_string();
        }
        self.name = dimension_item_name(self.item_type, &self.size);

        let frequency = self.effective_frequency(offer_frequency);
        let price = self.base_price(ctx, frequency).unwrap_or_default();
        self.price = DiscountedPrice::new(price);
        self.refresh_seasonal(ctx);
        true
    }

    /// Toggle the special-shape multiplier; reprices from m² and drops any discount.
    pub fn set_special_shape(
        &mut self,
        ctx: &PricingContext<'_>,
        enabled: bool,
        offer_frequency: Frequency,
    ) -> bool {
        if let Some(state) = self.optibrush.as_mut() {
            state.config.special_shape = enabled;
            return self.sync_optibrush(ctx);
        }
        if self.special_shape == enabled {
            return false;
        }
        self.special_shape = enabled;
        if self.item_type.is_dimension_priced() {
            let frequency = self.effective_frequency(offer_frequency);
            self.reprice(ctx, frequency);
        }
        true
    }

    pub fn set_customized(&mut self, enabled: bool) -> bool {
        let changed = self.customized != enabled;
        self.customized = enabled;
        changed
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// Switch pricer; clears the configuration, keeps quantity and replacement cost.
    pub fn set_item_type(&mut self, item_type: ItemType) -> bool {
        if self.item_type == item_type {
            return false;
        }
        self.reset_configuration(item_type);
        true
    }

    /// Move the item between rental and purchase pricing.
    ///
    /// Purchase items lose rental-only state: seasonal periods, the frequency
    /// override and the replacement cost.
    pub fn set_purpose(
        &mut self,
        ctx: &PricingContext<'_>,
        purpose: Purpose,
        offer_frequency: Frequency,
    ) -> bool {
        if self.billing == purpose && self.purpose == Some(purpose) {
            return false;
        }
        self.billing = purpose;
        self.purpose = Some(purpose);
        if purpose == Purpose::Nakup {
            self.seasonal = None;
            self.frequency_override = None;
            self.replacement_cost = None;
        }
        if !self.is_valid() {
            self.reset_configuration(purpose.default_item_type());
            return true;
        }
        let frequency = self.effective_frequency(offer_frequency);
        self.reprice(ctx, frequency);
        true
    }

    /// Per-item frequency for a non-seasonal rental item.
    pub fn set_frequency_override(
        &mut self,
        ctx: &PricingContext<'_>,
        frequency: Option<Frequency>,
        offer_frequency: Frequency,
    ) -> Result<bool, OfferError> {
        if !self.is_rental() {
            return Err(OfferError::NotRental(self.id));
        }
        if self.seasonal.is_some() {
            debug!(item_id = self.id, "Frequency override ignored on seasonal item");
            return Ok(false);
        }
        self.frequency_override = frequency;
        let effective = self.effective_frequency(offer_frequency);
        self.reprice(ctx, effective);
        Ok(true)
    }

    /// Reprice after the offer-wide frequency changed.
    ///
    /// Only plain rental items follow it; the discount is dropped.
    pub fn apply_offer_frequency(
        &mut self,
        ctx: &PricingContext<'_>,
        offer_frequency: Frequency,
    ) -> bool {
        if !self.is_rental() || self.seasonal.is_some() || self.frequency_override.is_some() {
            return false;
        }
        self.reprice(ctx, offer_frequency)
    }

    // ==================== price / discount edits ====================

    /// Enter a unit price by hand; the discount follows.
    pub fn set_price(&mut self, price: Decimal) {
        self.price = self.price.with_price(price);
    }

    pub fn set_discount(&mut self, discount_pct: u8) -> Result<(), PricingError> {
        if discount_pct > 100 {
            return Err(PricingError::InvalidDiscount(discount_pct));
        }
        self.price = self.price.with_discount(discount_pct);
        Ok(())
    }

    /// Commit raw quantity input; anything below 1 or unparseable becomes 1.
    pub fn commit_quantity(&mut self, input: &str) -> u32 {
        self.quantity = input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|quantity| *quantity >= 1)
            .unwrap_or(1);
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity.max(1);
    }

    /// Ignored for purchase items.
    pub fn set_replacement_cost(&mut self, cost: Option<Decimal>) -> bool {
        if !self.is_rental() {
            return false;
        }
        self.replacement_cost = cost.map(|c| c.max(Decimal::ZERO));
        true
    }

    // ==================== Optibrush ====================

    pub fn configure_optibrush(
        &mut self,
        ctx: &PricingContext<'_>,
        config: OptibrushConfig,
    ) -> Result<bool, OfferError> {
        let state = self
            .optibrush
            .as_mut()
            .ok_or(OfferError::NotOptibrush(self.id))?;
        state.config = config;
        Ok(self.sync_optibrush(ctx))
    }

    /// Bring price and derived fields in line with the Optibrush inputs.
    ///
    /// Nothing is recomputed while the input fingerprint is unchanged, and
    /// nothing is written unless a computed value differs from the stored
    /// one. Returns whether the item changed.
    pub fn sync_optibrush(&mut self, ctx: &PricingContext<'_>) -> bool {
        let Some(state) = self.optibrush.as_mut() else {
            return false;
        };
        let fingerprint = state.config.fingerprint();
        if state.last_fingerprint == Some(fingerprint) {
            return false;
        }
        state.last_fingerprint = Some(fingerprint);

        let quote = ctx.optibrush().quote(&state.config);
        let (code, size, name) = match state.config.dimensions() {
            Some((w, h)) => (
                format!("OPTIBRUSH-{}x{}", w, h),
                format!("{}*{}", w, h),
                format!("Optibrush {}x{} cm", w, h),
            ),
            None => (String::new(), String::new(), "Optibrush".to_string()),
        };

        let mut changed = false;
        if quote.total_price != self.price.current() || quote.price_per_m2 != state.price_per_m2 {
            state.price_per_m2 = quote.price_per_m2;
            self.price = DiscountedPrice::new(quote.total_price);
            changed = true;
        }
        if self.code != code || self.size != size || self.m2 != quote.m2 {
            self.code = code;
            self.size = size;
            self.name = name;
            self.m2 = quote.m2;
            changed = true;
        }
        if changed {
            debug!(item_id = self.id, total = %quote.total_price, "Optibrush price updated");
            self.refresh_seasonal(ctx);
        }
        changed
    }

    // ==================== seasonal periods ====================

    /// Split the item into normal and season periods priced from the catalog.
    pub fn enable_seasonal(&mut self, ctx: &PricingContext<'_>) -> Result<bool, OfferError> {
        if !self.is_rental() {
            return Err(OfferError::NotRental(self.id));
        }
        if self.seasonal.is_some() {
            return Ok(false);
        }
        let seasonal = SeasonalPricing::seeded(|frequency| self.base_price(ctx, frequency));
        self.seasonal = Some(seasonal);
        Ok(true)
    }

    /// Drop both periods. The single-period price is left as it is now.
    pub fn disable_seasonal(&mut self) -> bool {
        self.seasonal.take().is_some()
    }

    pub fn set_period_frequency(
        &mut self,
        ctx: &PricingContext<'_>,
        kind: PeriodKind,
        frequency: Frequency,
    ) -> Result<(), OfferError> {
        let price = self.base_price(ctx, frequency);
        let period = self.period_mut(kind)?;
        period.frequency = frequency;
        if let Some(price) = price {
            period.price = DiscountedPrice::new(price);
        }
        Ok(())
    }

    pub fn set_period_price(&mut self, kind: PeriodKind, price: Decimal) -> Result<(), OfferError> {
        let period = self.period_mut(kind)?;
        period.price = period.price.with_price(price);
        Ok(())
    }

    pub fn set_period_discount(
        &mut self,
        kind: PeriodKind,
        discount_pct: u8,
    ) -> Result<(), OfferError> {
        if discount_pct > 100 {
            return Err(PricingError::InvalidDiscount(discount_pct).into());
        }
        let period = self.period_mut(kind)?;
        period.price = period.price.with_discount(discount_pct);
        Ok(())
    }

    pub fn set_period_weeks(
        &mut self,
        kind: PeriodKind,
        from_week: Week,
        to_week: Week,
    ) -> Result<(), OfferError> {
        let period = self.period_mut(kind)?;
        period.from_week = from_week;
        period.to_week = to_week;
        Ok(())
    }

    fn period_mut(&mut self, kind: PeriodKind) -> Result<&mut PricingPeriod, OfferError> {
        let id = self.id;
        self.seasonal
            .as_mut()
            .map(|seasonal| seasonal.period_mut(kind))
            .ok_or(OfferError::NotSeasonal(id))
    }
}

fn dimension_item_name(item_type: ItemType, size: &str) -> String {
    match item_type {
        ItemType::Design => format!("Design predpražnik {}", size),
        _ => format!("Predpražnik po meri {}", size),
    }
}
