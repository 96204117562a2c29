use crate::pricing::PricingError;

use super::wizard::{ItemList, OfferType, WizardStep};

/// Offer session operation that cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferError {
    #[error("Item {0} not found in this offer")]
    ItemNotFound(u32),

    #[error("Offer type can only change at the type step (currently at {0:?})")]
    NotAtTypeStep(WizardStep),

    #[error("{offer_type:?} offers have no {list:?} item list")]
    ListNotUsed { offer_type: OfferType, list: ItemList },

    #[error("Items at step {0:?} are incomplete")]
    Incomplete(WizardStep),

    #[error("No step after {0:?}")]
    NoNextStep(WizardStep),

    #[error("No step before {0:?}")]
    NoPreviousStep(WizardStep),

    #[error("Offer can only be saved from the preview step (currently at {0:?})")]
    NotAtPreview(WizardStep),

    #[error("Item purpose can only change in mixed offers")]
    PurposeNotAllowed,

    #[error("Item {0} is not a rental item")]
    NotRental(u32),

    #[error("Item {0} has no seasonal pricing")]
    NotSeasonal(u32),

    #[error("Item {0} is not an Optibrush item")]
    NotOptibrush(u32),

    #[error("Offer session is closed")]
    Closed,

    #[error(transparent)]
    Pricing(#[from] PricingError),
}
