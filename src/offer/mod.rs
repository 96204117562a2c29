//! Offer sessions: configurable items, the wizard that walks them, and the
//! totals and hand-off document built from them.

pub mod command;
pub mod document;
pub mod error;
pub mod item;
pub mod seasonal;
pub mod summary;
pub mod wizard;

pub use command::ItemCommand;
pub use document::{OfferDocument, OfferRow};
pub use error::OfferError;
pub use item::{OfferItem, OptibrushState, CUSTOM_CODE};
pub use seasonal::{PeriodKind, PricingPeriod, SeasonalPricing};
pub use summary::{summarize, PurchaseSummary, QuoteSummary, RentalSummary};
pub use wizard::{ItemList, OfferSession, OfferType, WizardStep};
