//! Offer session: the wizard state machine and the item lists it owns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::pricing::{Frequency, PricingContext, Purpose, Week};

use super::command::ItemCommand;
use super::document::OfferDocument;
use super::error::OfferError;
use super::item::OfferItem;
use super::summary::{summarize, QuoteSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferType {
    /// Rental only
    Najem,
    /// Purchase only
    Nakup,
    /// Same mats quoted for purchase and for rental, side by side
    Primerjava,
    /// One list mixing rental and purchase items
    Dodatna,
}

impl OfferType {
    /// Legal steps, in order.
    pub fn steps(self) -> &'static [WizardStep] {
        use WizardStep::*;
        match self {
            OfferType::Najem => &[Type, ItemsNajem, Preview],
            OfferType::Nakup => &[Type, ItemsNakup, Preview],
            OfferType::Primerjava | OfferType::Dodatna => &[Type, ItemsNakup, ItemsNajem, Preview],
        }
    }

    pub fn uses_list(self, list: ItemList) -> bool {
        match self {
            OfferType::Najem => list == ItemList::Rental,
            OfferType::Nakup => list == ItemList::Purchase,
            OfferType::Primerjava | OfferType::Dodatna => true,
        }
    }

    /// Items carry a visible purpose.
    pub fn is_mixed(self) -> bool {
        matches!(self, OfferType::Primerjava | OfferType::Dodatna)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WizardStep {
    Type,
    ItemsNakup,
    ItemsNajem,
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemList {
    Rental,
    Purchase,
}

impl ItemList {
    pub fn purpose(self) -> Purpose {
        match self {
            ItemList::Rental => Purpose::Najem,
            ItemList::Purchase => Purpose::Nakup,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    offer_type: OfferType,
    offer_frequency: Frequency,
    step: WizardStep,
    rental_items: Vec<OfferItem>,
    purchase_items: Vec<OfferItem>,
    #[serde(skip)]
    next_item_id: u32,
    closed: bool,
}

impl OfferSession {
    pub fn new(offer_type: OfferType) -> Self {
        let mut session = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            offer_type,
            offer_frequency: Frequency::default(),
            step: WizardStep::Type,
            rental_items: Vec::new(),
            purchase_items: Vec::new(),
            next_item_id: 1,
            closed: false,
        };
        session.seed_items();
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn offer_type(&self) -> OfferType {
        self.offer_type
    }

    pub fn offer_frequency(&self) -> Frequency {
        self.offer_frequency
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Rental list; the only list of a `dodatna` offer.
    pub fn rental_items(&self) -> &[OfferItem] {
        &self.rental_items
    }

    pub fn purchase_items(&self) -> &[OfferItem] {
        &self.purchase_items
    }

    pub fn items(&self) -> impl Iterator<Item = &OfferItem> {
        self.rental_items.iter().chain(self.purchase_items.iter())
    }

    pub fn item(&self, item_id: u32) -> Option<&OfferItem> {
        self.items().find(|item| item.id() == item_id)
    }

    fn item_mut(&mut self, item_id: u32) -> Result<&mut OfferItem, OfferError> {
        self.rental_items
            .iter_mut()
            .chain(self.purchase_items.iter_mut())
            .find(|item| item.id() == item_id)
            .ok_or(OfferError::ItemNotFound(item_id))
    }

    fn ensure_open(&self) -> Result<(), OfferError> {
        if self.closed {
            Err(OfferError::Closed)
        } else {
            Ok(())
        }
    }

    fn new_item(&mut self, list: ItemList) -> OfferItem {
        let id = self.next_item_id;
        self.next_item_id += 1;
        let billing = list.purpose();
        let purpose = self.offer_type.is_mixed().then_some(billing);
        OfferItem::new(id, billing, purpose)
    }

    /// Storage for `list`; `dodatna` keeps both purposes in one list.
    fn storage_mut(&mut self, list: ItemList) -> &mut Vec<OfferItem> {
        match (self.offer_type, list) {
            (OfferType::Dodatna, _) | (_, ItemList::Rental) => &mut self.rental_items,
            (_, ItemList::Purchase) => &mut self.purchase_items,
        }
    }

    fn seed_items(&mut self) {
        self.rental_items.clear();
        self.purchase_items.clear();
        self.next_item_id = 1;
        let lists: &[ItemList] = match self.offer_type {
            OfferType::Najem | OfferType::Dodatna => &[ItemList::Rental],
            OfferType::Nakup => &[ItemList::Purchase],
            OfferType::Primerjava => &[ItemList::Purchase, ItemList::Rental],
        };
        for &list in lists {
            let item = self.new_item(list);
            self.storage_mut(list).push(item);
        }
    }

    /// Change the offer type; only at the type step. Item lists are rebuilt.
    pub fn set_offer_type(&mut self, offer_type: OfferType) -> Result<bool, OfferError> {
        self.ensure_open()?;
        if self.step != WizardStep::Type {
            return Err(OfferError::NotAtTypeStep(self.step));
        }
        if self.offer_type == offer_type {
            return Ok(false);
        }
        info!(
            session_id = %self.id,
            from = ?self.offer_type,
            to = ?offer_type,
            "Offer type changed"
        );
        self.offer_type = offer_type;
        self.seed_items();
        Ok(true)
    }

    /// Change the offer-wide frequency and reprice the rental items that follow it.
    ///
    /// Returns the number of repriced items.
    pub fn set_offer_frequency(
        &mut self,
        ctx: &PricingContext<'_>,
        frequency: Frequency,
    ) -> Result<usize, OfferError> {
        self.ensure_open()?;
        self.offer_frequency = frequency;
        let repriced = self
            .rental_items
            .iter_mut()
            .chain(self.purchase_items.iter_mut())
            .map(|item| item.apply_offer_frequency(ctx, frequency))
            .filter(|repriced| *repriced)
            .count();
        debug!(session_id = %self.id, %frequency, repriced, "Offer frequency changed");
        Ok(repriced)
    }

    pub fn add_item(&mut self, list: ItemList) -> Result<&OfferItem, OfferError> {
        self.ensure_open()?;
        if !self.offer_type.uses_list(list) {
            return Err(OfferError::ListNotUsed {
                offer_type: self.offer_type,
                list,
            });
        }
        let item = self.new_item(list);
        let items = self.storage_mut(list);
        items.push(item);
        let added = &items[items.len() - 1];
        Ok(added)
    }

    /// Remove an item. A list is never left empty; its last item is replaced
    /// by a fresh default.
    pub fn remove_item(&mut self, item_id: u32) -> Result<(), OfferError> {
        self.ensure_open()?;
        let list = if let Some(pos) = self.rental_items.iter().position(|i| i.id() == item_id) {
            self.rental_items.remove(pos);
            ItemList::Rental
        } else if let Some(pos) = self.purchase_items.iter().position(|i| i.id() == item_id) {
            self.purchase_items.remove(pos);
            ItemList::Purchase
        } else {
            return Err(OfferError::ItemNotFound(item_id));
        };

        if self.storage_mut(list).is_empty() {
            let item = self.new_item(list);
            self.storage_mut(list).push(item);
        }
        Ok(())
    }

    /// Apply one edit to one item.
    pub fn apply(
        &mut self,
        ctx: &PricingContext<'_>,
        item_id: u32,
        command: ItemCommand,
    ) -> Result<&OfferItem, OfferError> {
        self.ensure_open()?;
        let is_purpose_change = matches!(command, ItemCommand::SetPurpose { .. });
        if is_purpose_change && self.offer_type != OfferType::Dodatna {
            return Err(OfferError::PurposeNotAllowed);
        }
        let offer_frequency = self.offer_frequency;
        let item = self.item_mut(item_id)?;
        command.apply(item, ctx, offer_frequency)?;
        Ok(item)
    }

    /// Items the guard checks at `step`.
    pub fn step_items(&self, step: WizardStep) -> Vec<&OfferItem> {
        let purpose = match step {
            WizardStep::ItemsNajem => Purpose::Najem,
            WizardStep::ItemsNakup => Purpose::Nakup,
            WizardStep::Type | WizardStep::Preview => return Vec::new(),
        };
        match self.offer_type {
            OfferType::Dodatna => self
                .rental_items
                .iter()
                .filter(|item| item.billing() == purpose)
                .collect(),
            _ if purpose == Purpose::Najem => self.rental_items.iter().collect(),
            _ => self.purchase_items.iter().collect(),
        }
    }

    /// Whether the current step's items allow moving on.
    ///
    /// The step before the preview checks every item of the offer, whatever
    /// its purpose.
    pub fn can_advance(&self) -> Result<(), OfferError> {
        let items = self.step_items(self.step);
        let is_items_step = matches!(self.step, WizardStep::ItemsNajem | WizardStep::ItemsNakup);
        if is_items_step && items.is_empty() && self.offer_type != OfferType::Dodatna {
            return Err(OfferError::Incomplete(self.step));
        }
        if items.iter().any(|item| !item.is_complete()) {
            return Err(OfferError::Incomplete(self.step));
        }
        if self.next_step() == Some(WizardStep::Preview) && !self.all_items_complete() {
            return Err(OfferError::Incomplete(self.step));
        }
        Ok(())
    }

    fn all_items_complete(&self) -> bool {
        self.items().all(OfferItem::is_complete)
    }

    fn step_index(&self) -> usize {
        self.offer_type
            .steps()
            .iter()
            .position(|step| *step == self.step)
            .unwrap_or(0)
    }

    fn next_step(&self) -> Option<WizardStep> {
        self.offer_type.steps().get(self.step_index() + 1).copied()
    }

    pub fn next(&mut self, ctx: &PricingContext<'_>) -> Result<WizardStep, OfferError> {
        self.ensure_open()?;
        self.can_advance()?;
        let next = self.next_step().ok_or(OfferError::NoNextStep(self.step))?;

        if self.offer_type == OfferType::Primerjava
            && self.step == WizardStep::ItemsNakup
            && next == WizardStep::ItemsNajem
        {
            self.mirror_purchase_items(ctx)?;
        }
        debug!(session_id = %self.id, from = ?self.step, to = ?next, "Wizard advanced");
        self.step = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<WizardStep, OfferError> {
        self.ensure_open()?;
        let index = self.step_index();
        if index == 0 {
            return Err(OfferError::NoPreviousStep(self.step));
        }
        self.step = self.offer_type.steps()[index - 1];
        debug!(session_id = %self.id, to = ?self.step, "Wizard went back");
        Ok(self.step)
    }

    pub fn close(&mut self) {
        if !self.closed {
            info!(session_id = %self.id, "Offer session closed");
        }
        self.closed = true;
    }

    /// Copy the purchase list into an untouched rental list, priced as rental.
    fn mirror_purchase_items(&mut self, ctx: &PricingContext<'_>) -> Result<(), OfferError> {
        if self.rental_items.iter().any(OfferItem::is_valid) {
            return Ok(());
        }
        let frequency = self.offer_frequency;
        let sources = self.purchase_items.clone();
        self.rental_items.clear();
        for source in &sources {
            let mut item = self.new_item(ItemList::Rental);
            item.set_item_type(source.item_type());
            if let Some(state) = source.optibrush() {
                item.configure_optibrush(ctx, state.config)?;
            } else if source.item_type().is_dimension_priced() {
                item.set_dimensions(ctx, source.size(), frequency);
                item.set_special_shape(ctx, source.special_shape(), frequency);
            } else {
                item.select_code(ctx, source.code(), frequency);
            }
            item.set_customized(source.customized());
            item.set_quantity(source.quantity());
            self.rental_items.push(item);
        }
        if self.rental_items.is_empty() {
            let item = self.new_item(ItemList::Rental);
            self.rental_items.push(item);
        }
        debug!(
            session_id = %self.id,
            count = sources.len(),
            "Mirrored purchase items into rental list"
        );
        Ok(())
    }

    pub fn summary(&self, week: Week) -> QuoteSummary {
        summarize(self.offer_type, &self.rental_items, &self.purchase_items, week)
    }

    /// Structured hand-off of the finished offer.
    pub fn document(&self, company: Option<&str>, week: Week, now: DateTime<Utc>) -> OfferDocument {
        OfferDocument::build(self, company, week, now)
    }

    /// Save from the preview step: build the document and close the session.
    pub fn finalize(
        &mut self,
        company: Option<&str>,
        week: Week,
        now: DateTime<Utc>,
    ) -> Result<OfferDocument, OfferError> {
        self.ensure_open()?;
        if self.step != WizardStep::Preview {
            return Err(OfferError::NotAtPreview(self.step));
        }
        if !self.all_items_complete() {
            return Err(OfferError::Incomplete(self.step));
        }
        let document = self.document(company, week, now);
        info!(session_id = %self.id, rows = document.rows.len(), "Offer saved");
        self.close();
        Ok(document)
    }
}
