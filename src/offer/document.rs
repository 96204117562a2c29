//! Save hand-off: the finished offer as structured rows for an external renderer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::{Frequency, ItemType, Purpose, Week};

use super::item::OfferItem;
use super::seasonal::SeasonalPricing;
use super::summary::QuoteSummary;
use super::wizard::{OfferSession, OfferType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRow {
    pub id: u32,
    pub item_type: ItemType,
    pub purpose: Purpose,
    pub code: String,
    pub name: String,
    pub size: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub m2: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_unit: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub original_price: Decimal,
    pub discount: u8,
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub replacement_cost: Option<Decimal>,
    /// Billing frequency for rental rows
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal: Option<SeasonalPricing>,
}

impl OfferRow {
    fn from_item(item: &OfferItem, offer_frequency: Frequency, week: Week) -> Self {
        let rental = item.is_rental();
        let price = item.pricing_in(week);
        let frequency = match item.seasonal() {
            Some(seasonal) => Some(seasonal.active(week).frequency),
            None => rental.then(|| item.effective_frequency(offer_frequency)),
        };
        Self {
            id: item.id(),
            item_type: item.item_type(),
            purpose: item.billing(),
            code: item.code().to_string(),
            name: item.name().to_string(),
            size: item.size().to_string(),
            m2: item.m2(),
            quantity: item.quantity(),
            price_per_unit: price.current(),
            original_price: price.original(),
            discount: price.discount(),
            line_total: item.line_total_in(week),
            replacement_cost: item.replacement_cost().filter(|_| rental),
            frequency,
            seasonal: item.seasonal().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferDocument {
    pub subject: String,
    pub offer_type: OfferType,
    pub frequency: Frequency,
    pub week: Week,
    pub rows: Vec<OfferRow>,
    pub summary: QuoteSummary,
    pub created_at: DateTime<Utc>,
}

impl OfferDocument {
    pub fn build(
        session: &OfferSession,
        company: Option<&str>,
        week: Week,
        now: DateTime<Utc>,
    ) -> Self {
        let frequency = session.offer_frequency();
        let rows = session
            .items()
            .map(|item| OfferRow::from_item(item, frequency, week))
            .collect();
        Self {
            subject: subject_line(session.offer_type(), company),
            offer_type: session.offer_type(),
            frequency,
            week,
            rows,
            summary: session.summary(week),
            created_at: now,
        }
    }
}

pub fn subject_line(offer_type: OfferType, company: Option<&str>) -> String {
    let base = match offer_type {
        OfferType::Najem => "Ponudba za najem predpražnikov",
        OfferType::Nakup => "Ponudba za nakup predpražnikov",
        OfferType::Primerjava => "Primerjava najema in nakupa predpražnikov",
        OfferType::Dodatna => "Ponudba za najem in nakup predpražnikov",
    };
    match company.map(str::trim).filter(|name| !name.is_empty()) {
        Some(company) => format!("{} - {}", base, company),
        None => base.to_string(),
    }
}
