//! Offer totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::{round_money, Purpose, Week};

use super::item::OfferItem;
use super::wizard::OfferType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSummary {
    pub total_items: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

impl PurchaseSummary {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a OfferItem>) -> Self {
        let (total_items, total_price) = items
            .into_iter()
            .fold((0u32, Decimal::ZERO), |(count, total), item| {
                let line = item.price_per_unit() * Decimal::from(item.quantity());
                (count + item.quantity(), total + line)
            });
        Self {
            total_items,
            total_price: round_money(total_price, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSummary {
    pub total_items: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub weekly_total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub four_week_total: Decimal,
}

impl RentalSummary {
    /// Seasonal items count with the period active in `week`.
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a OfferItem>, week: Week) -> Self {
        let (total_items, weekly_total) = items
            .into_iter()
            .fold((0u32, Decimal::ZERO), |(count, total), item| {
                (count + item.quantity(), total + item.line_total_in(week))
            });
        let weekly_total = round_money(weekly_total, 2);
        Self {
            total_items,
            weekly_total,
            four_week_total: weekly_total * Decimal::from(4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuoteSummary {
    Rental(RentalSummary),
    Purchase(PurchaseSummary),
    Split {
        rental: RentalSummary,
        purchase: PurchaseSummary,
    },
}

/// Reduce the offer's item lists to totals.
///
/// Mixed offers are partitioned by purpose, whichever list an item sits in.
pub fn summarize(
    offer_type: OfferType,
    rental_items: &[OfferItem],
    purchase_items: &[OfferItem],
    week: Week,
) -> QuoteSummary {
    match offer_type {
        OfferType::Najem => QuoteSummary::Rental(RentalSummary::from_items(rental_items, week)),
        OfferType::Nakup => QuoteSummary::Purchase(PurchaseSummary::from_items(purchase_items)),
        OfferType::Primerjava | OfferType::Dodatna => {
            let all = || rental_items.iter().chain(purchase_items.iter());
            let is_purchase = |item: &&OfferItem| item.billing() == Purpose::Nakup;
            QuoteSummary::Split {
                rental: RentalSummary::from_items(all().filter(|item| !is_purchase(item)), week),
                purchase: PurchaseSummary::from_items(all().filter(is_purchase)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Frequency, PricingContext, PricingSettings, StaticCatalog};
    use rust_decimal_macros::dec;

    fn week(n: u8) -> Week {
        Week::new(n).unwrap()
    }

    fn rental(ctx: &PricingContext<'_>, id: u32, code: &str, quantity: u32) -> OfferItem {
        let mut item = OfferItem::new(id, Purpose::Najem, Some(Purpose::Najem));
        item.select_code(ctx, code, Frequency::FOUR_WEEKLY);
        item.set_quantity(quantity);
        item
    }

    fn purchase(ctx: &PricingContext<'_>, id: u32, size: &str, quantity: u32) -> OfferItem {
        let mut item = OfferItem::new(id, Purpose::Nakup, Some(Purpose::Nakup));
        item.set_dimensions(ctx, size, Frequency::FOUR_WEEKLY);
        item.set_quantity(quantity);
        item
    }

    #[test]
    fn test_rental_summary_four_week_total() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let ctx = PricingContext::new(&catalog, &settings);
        let items = vec![rental(&ctx, 1, "STD-85x60", 2), rental(&ctx, 2, "STD-85x150", 1)];

        let summary = RentalSummary::from_items(&items, week(20));
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.four_week_total, summary.weekly_total * dec!(4));
        assert_eq!(
            summary.weekly_total,
            dec!(9.90) * dec!(2) + items[1].price_per_unit()
        );
    }

    #[test]
    fn test_seasonal_item_uses_active_period() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let ctx = PricingContext::new(&catalog, &settings);
        let mut item = rental(&ctx, 1, "STD-85x60", 1);
        item.enable_seasonal(&ctx).unwrap();
        let items = vec![item];

        assert_eq!(RentalSummary::from_items(&items, week(20)).weekly_total, dec!(9.90));
        assert_eq!(RentalSummary::from_items(&items, week(50)).weekly_total, dec!(13.90));
    }

    #[test]
    fn test_purchase_summary() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let ctx = PricingContext::new(&catalog, &settings);
        let items = vec![purchase(&ctx, 1, "120*180", 2)];

        let summary = PurchaseSummary::from_items(&items);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_price, dec!(712.80));
    }

    #[test]
    fn test_dodatna_split_excludes_other_purpose() {
        let catalog = StaticCatalog::builtin();
        let settings = PricingSettings::default();
        let ctx = PricingContext::new(&catalog, &settings);
        let items = vec![
            rental(&ctx, 1, "STD-85x60", 1),
            rental(&ctx, 2, "STD-85x60", 1),
            purchase(&ctx, 3, "120*180", 1),
        ];

        let summary = summarize(OfferType::Dodatna, &items, &[], week(20));
        let QuoteSummary::Split { rental, purchase } = summary else {
            panic!("expected split summary, got {:?}", summary);
        };
        assert_eq!(rental.total_items, 2);
        assert_eq!(rental.weekly_total, dec!(19.80));
        assert_eq!(purchase.total_items, 1);
        assert_eq!(purchase.total_price, dec!(356.40));
    }

    #[test]
    fn test_empty_lists() {
        let summary = summarize(OfferType::Nakup, &[], &[], week(1));
        assert_eq!(summary, QuoteSummary::Purchase(PurchaseSummary::default()));
    }

    #[test]
    fn test_summary_serializes_money_as_strings() {
        let summary = QuoteSummary::Rental(RentalSummary {
            total_items: 1,
            weekly_total: dec!(9.90),
            four_week_total: dec!(39.60),
        });
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["kind"], "rental");
        assert_eq!(json["weeklyTotal"], "9.90");
        assert_eq!(json["fourWeekTotal"], "39.60");
    }
}
