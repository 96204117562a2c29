//! Core pricing calculation functions.
//!
//! Pure functions for price/discount math - no catalog or session access.

use rust_decimal::prelude::*;
use serde::Serialize;

/// Round to specified decimal places, halves away from zero.
///
/// Quotes are shown to customers with the same rounding the sales UI uses,
/// so `0.125` becomes `0.13` rather than the banker's `0.12`.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use mat_offer_engine::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(1.125), 2), dec!(1.13));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Price after a percentage discount, rounded to cents.
///
/// A discount of 0 returns `original_price` untouched.
pub fn apply_discount(original_price: Decimal, discount_pct: u8) -> Decimal {
    if discount_pct == 0 {
        return original_price;
    }
    let pct = Decimal::from(discount_pct.min(100));
    let factor = Decimal::ONE - pct / Decimal::ONE_HUNDRED;
    round_money(original_price * factor, 2)
}

/// Whole-percent discount that turns `original_price` into `new_price`.
///
/// Returns 0 when there is no usable baseline. A price raised above the
/// baseline is a 0% discount, never a negative one.
pub fn infer_discount(original_price: Decimal, new_price: Decimal) -> u8 {
    if original_price <= Decimal::ZERO {
        return 0;
    }
    let pct = round_money((Decimal::ONE - new_price / original_price) * Decimal::ONE_HUNDRED, 0);
    pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u8()
        .unwrap_or(0)
}

/// A unit price together with the baseline it was discounted from.
///
/// `original` is only replaced by [`DiscountedPrice::new`] (a pricer result);
/// the discount operations derive `current` and `discount` from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedPrice {
    #[serde(rename = "pricePerUnit", with = "rust_decimal::serde::str")]
    current: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    original_price: Decimal,
    discount: u8,
}

impl DiscountedPrice {
    /// Fresh pricer result: no discount, baseline equals the price.
    pub fn new(price: Decimal) -> Self {
        let price = price.max(Decimal::ZERO);
        Self {
            current: price,
            original_price: price,
            discount: 0,
        }
    }

    pub fn current(&self) -> Decimal {
        self.current
    }

    pub fn original(&self) -> Decimal {
        self.original_price
    }

    pub fn discount(&self) -> u8 {
        self.discount
    }

    pub fn is_priced(&self) -> bool {
        self.current > Decimal::ZERO
    }

    /// Apply a percentage discount to the baseline.
    pub fn with_discount(self, discount_pct: u8) -> Self {
        let discount = discount_pct.min(100);
        Self {
            current: apply_discount(self.original_price, discount),
            original_price: self.original_price,
            discount,
        }
    }

    /// Set the displayed price by hand and infer the discount from it.
    ///
    /// Without a baseline the entered price becomes the baseline.
    pub fn with_price(self, price: Decimal) -> Self {
        let price = price.max(Decimal::ZERO);
        if self.original_price <= Decimal::ZERO {
            return Self::new(price);
        }
        Self {
            current: price,
            original_price: self.original_price,
            discount: infer_discount(self.original_price, price),
        }
    }
}
