//! Catalog and stateless pricing handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::{AppError, Result};
use crate::pricing::{
    apply_discount, infer_discount, CatalogEntry, DimensionQuote, OptibrushConfig, OptibrushQuote,
    PriceCatalog, PricingError, Purpose,
};
use crate::AppState;

use super::requests::{DimensionPriceRequest, DiscountRequest};
use super::responses::DiscountResponse;

pub async fn list_catalog(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    Json(state.catalog.entries().to_vec())
}

pub async fn get_catalog_entry(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CatalogEntry>> {
    state
        .catalog
        .lookup(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Catalog code {}", code)))
}

/// Price a design/custom mat from its dimensions
pub async fn price_dimensions(
    State(state): State<AppState>,
    Json(req): Json<DimensionPriceRequest>,
) -> Json<DimensionQuote> {
    let pricer = state.pricing_context().dimensions();
    let quote = match req.purpose {
        Purpose::Najem => pricer.rental(&req.size, req.frequency, req.special_shape),
        Purpose::Nakup => pricer.purchase(&req.size, req.special_shape),
    };
    tracing::debug!("Dimension quote for {:?}: {}", req.size, quote.price);
    Json(quote)
}

pub async fn price_optibrush(
    State(state): State<AppState>,
    Json(config): Json<OptibrushConfig>,
) -> Json<OptibrushQuote> {
    Json(state.pricing_context().optibrush().quote(&config))
}

/// Convert a discount to a price, or a price back to a discount
pub async fn convert_discount(Json(req): Json<DiscountRequest>) -> Result<Json<DiscountResponse>> {
    let (price, discount) = match (req.discount, req.price) {
        (Some(discount), _) if discount > 100 => {
            return Err(AppError::Offer(PricingError::InvalidDiscount(discount).into()));
        }
        (Some(discount), _) => (apply_discount(req.original_price, discount), discount),
        (None, Some(price)) => (price, infer_discount(req.original_price, price)),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either discount or price is required".to_string(),
            ))
        }
    };
    Ok(Json(DiscountResponse {
        original_price: req.original_price,
        price,
        discount,
    }))
}
