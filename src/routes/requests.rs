//! Request DTOs for the JSON API.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::offer::{ItemList, OfferType};
use crate::pricing::{Frequency, Purpose};

/// Request to price a free-dimension mat
#[derive(Debug, Deserialize)]
pub struct DimensionPriceRequest {
    pub size: String,
    #[serde(default = "default_purpose")]
    pub purpose: Purpose,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub special_shape: bool,
}

fn default_purpose() -> Purpose {
    Purpose::Najem
}

/// Request to convert between price and discount.
///
/// `discount` wins when both it and `price` are given.
#[derive(Debug, Deserialize)]
pub struct DiscountRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub original_price: Decimal,
    #[serde(default)]
    pub discount: Option<u8>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub price: Option<Decimal>,
}

/// Request to open an offer session
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub offer_type: OfferType,
    #[serde(default)]
    pub frequency: Option<Frequency>,
}

#[derive(Debug, Deserialize)]
pub struct SetOfferTypeRequest {
    pub offer_type: OfferType,
}

#[derive(Debug, Deserialize)]
pub struct SetFrequencyRequest {
    pub frequency: Frequency,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub list: ItemList,
}

/// Week used to pick seasonal periods; the current ISO week when absent
#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    #[serde(default)]
    pub week: Option<u8>,
}

/// Request to save an offer from the preview step
#[derive(Debug, Default, Deserialize)]
pub struct SaveOfferRequest {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub week: Option<u8>,
}
