//! Response DTOs for the JSON API.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cache::CacheStats;
use crate::offer::{OfferSession, QuoteSummary, WizardStep};
use crate::pricing::Week;

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog_entries: usize,
    pub cache: CacheStats,
}

/// Response for a price/discount conversion
#[derive(Debug, Serialize)]
pub struct DiscountResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub original_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub discount: u8,
}

/// Offer state plus what the wizard allows next
#[derive(Debug, Serialize)]
pub struct OfferResponse {
    pub offer: OfferSession,
    pub steps: &'static [WizardStep],
    pub can_advance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repriced_items: Option<usize>,
}

impl OfferResponse {
    pub fn new(session: &OfferSession) -> Self {
        Self {
            offer: session.clone(),
            steps: session.offer_type().steps(),
            can_advance: session.can_advance().is_ok(),
            repriced_items: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub week: Week,
    pub summary: QuoteSummary,
}
