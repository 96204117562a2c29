//! Item edits as data, so a whole edit can travel as one JSON body.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::pricing::{Frequency, ItemType, OptibrushConfig, PricingContext, Purpose, Week};

use super::error::OfferError;
use super::item::OfferItem;
use super::seasonal::PeriodKind;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ItemCommand {
    SelectCode {
        code: String,
    },
    SetDimensions {
        size: String,
    },
    SetSpecialShape {
        enabled: bool,
    },
    SetCustomized {
        enabled: bool,
    },
    SetItemType {
        item_type: ItemType,
    },
    SetPurpose {
        purpose: Purpose,
    },
    SetFrequencyOverride {
        #[serde(default)]
        frequency: Option<Frequency>,
    },
    SetPrice {
        #[serde(with = "rust_decimal::serde::str")]
        price: Decimal,
    },
    SetDiscount {
        discount: u8,
    },
    /// Raw quantity text as typed; clamped when committed.
    CommitQuantity {
        quantity: String,
    },
    SetReplacementCost {
        #[serde(default, with = "rust_decimal::serde::str_option")]
        cost: Option<Decimal>,
    },
    SetName {
        name: String,
    },
    ConfigureOptibrush {
        config: OptibrushConfig,
    },
    EnableSeasonal,
    DisableSeasonal,
    SetPeriodFrequency {
        period: PeriodKind,
        frequency: Frequency,
    },
    SetPeriodPrice {
        period: PeriodKind,
        #[serde(with = "rust_decimal::serde::str")]
        price: Decimal,
    },
    SetPeriodDiscount {
        period: PeriodKind,
        discount: u8,
    },
    SetPeriodWeeks {
        period: PeriodKind,
        from_week: Week,
        to_week: Week,
    },
}

impl ItemCommand {
    /// Apply to one item. Offer-level permission checks happen in the session.
    pub(crate) fn apply(
        self,
        item: &mut OfferItem,
        ctx: &PricingContext<'_>,
        offer_frequency: Frequency,
    ) -> Result<(), OfferError> {
        match self {
            ItemCommand::SelectCode { code } => {
                item.select_code(ctx, &code, offer_frequency);
            }
            ItemCommand::SetDimensions { size } => {
                item.set_dimensions(ctx, &size, offer_frequency);
            }
            ItemCommand::SetSpecialShape { enabled } => {
                item.set_special_shape(ctx, enabled, offer_frequency);
            }
            ItemCommand::SetCustomized { enabled } => {
                item.set_customized(enabled);
            }
            ItemCommand::SetItemType { item_type } => {
                item.set_item_type(item_type);
            }
            ItemCommand::SetPurpose { purpose } => {
                item.set_purpose(ctx, purpose, offer_frequency);
            }
            ItemCommand::SetFrequencyOverride { frequency } => {
                item.set_frequency_override(ctx, frequency, offer_frequency)?;
            }
            ItemCommand::SetPrice { price } => item.set_price(price),
            ItemCommand::SetDiscount { discount } => item.set_discount(discount)?,
            ItemCommand::CommitQuantity { quantity } => {
                item.commit_quantity(&quantity);
            }
            ItemCommand::SetReplacementCost { cost } => {
                item.set_replacement_cost(cost);
            }
            ItemCommand::SetName { name } => item.set_name(&name),
            ItemCommand::ConfigureOptibrush { config } => {
                item.configure_optibrush(ctx, config)?;
            }
            ItemCommand::EnableSeasonal => {
                item.enable_seasonal(ctx)?;
            }
            ItemCommand::DisableSeasonal => {
                item.disable_seasonal();
            }
            ItemCommand::SetPeriodFrequency { period, frequency } => {
                item.set_period_frequency(ctx, period, frequency)?
            }
            ItemCommand::SetPeriodPrice { period, price } => item.set_period_price(period, price)?,
            ItemCommand::SetPeriodDiscount { period, discount } => {
                item.set_period_discount(period, discount)?
            }
            ItemCommand::SetPeriodWeeks {
                period,
                from_week,
                to_week,
            } => item.set_period_weeks(period, from_week, to_week)?,
        }
        Ok(())
    }
}
