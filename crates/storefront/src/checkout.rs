//! Three-step checkout flow: items, address, confirm.
//!
//! The machine owns the ephemeral order draft and walks
//! `Items -> Address -> Confirm -> Submitted`. Every network operation runs
//! under a ticket: [`Checkout::begin_request`] refuses a second trigger
//! while one is in flight (so a double-click cannot place two orders), and
//! a result applied after [`Checkout::abandon`] is rejected as stale rather
//! than mutating a flow the shopper already left.
//!
//! Advancing past `Items` is allowed even when the product load failed -
//! source-compatible behavior, kept deliberately; the degraded advance is
//! logged.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use eshop_client::{ApiError, EshopApi};
use eshop_client::types::{Address, NewAddress, OrderRequest, Product};
use eshop_core::{AddressId, Notification, NotificationQueue, ProductId};

/// One-shot message pushed for the catalog view after a successful order.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";

/// Errors surfaced by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Client-side validation rejected the input; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// A network operation of this flow is already in flight.
    #[error("another request is still in flight")]
    Busy,

    /// The result belongs to a flow that was abandoned meanwhile.
    #[error("checkout was abandoned; result dropped")]
    Stale,

    /// The operation is not valid at the current step.
    #[error("operation not allowed at the {0:?} step")]
    WrongStep(CheckoutStep),

    /// Stock changed since the detail page; the draft quantity no longer fits.
    #[error("only {available} items are available now")]
    OutOfStock {
        /// Stock at submission time.
        available: u32,
    },

    /// The flow already completed; the draft is gone.
    #[error("checkout already completed")]
    Completed,

    /// Remote API call failed. Retryable by the user; never retried
    /// automatically.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Steps of the order flow, strictly ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    /// Review the item being bought.
    Items,
    /// Pick or create a shipping address.
    Address,
    /// Final review; exits only through submission.
    Confirm,
    /// Terminal success state.
    Submitted,
}

/// Entry handoff from the product detail page.
///
/// Produced by [`crate::detail::ProductDetail::begin_checkout`], which has
/// already validated the quantity against stock.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutHandoff {
    pub product_id: ProductId,
    pub quantity: u32,
    /// Snapshot from the detail page, if it was loaded there.
    pub product: Option<Product>,
}

impl CheckoutHandoff {
    /// Bundle the entry data for [`Checkout::new`].
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32, product: Option<Product>) -> Self {
        Self {
            product_id,
            quantity,
            product,
        }
    }
}

/// The ephemeral in-progress purchase.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub product_id: ProductId,
    pub quantity: u32,
    pub selected_address_id: Option<AddressId>,
    /// Latest product snapshot, refreshed by [`Checkout::load_item`].
    pub product: Option<Product>,
}

impl OrderDraft {
    /// Total price of the draft, when the product snapshot is present.
    #[must_use]
    pub fn total_price(&self) -> Option<Decimal> {
        self.product
            .as_ref()
            .map(|p| p.price * Decimal::from(self.quantity))
    }
}

/// Ticket pairing a started network operation with the flow state it was
/// started under.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutTicket {
    epoch: u64,
}

/// The checkout state machine.
#[derive(Debug)]
pub struct Checkout {
    step: CheckoutStep,
    draft: Option<OrderDraft>,
    addresses: Vec<Address>,
    in_flight: bool,
    epoch: u64,
}

impl Checkout {
    /// Enter the flow with the detail-page handoff.
    ///
    /// # Errors
    ///
    /// A zero quantity means the handoff was fabricated rather than
    /// validated; that is a fatal navigation error and the caller must
    /// return the shopper to the catalog.
    pub fn new(handoff: CheckoutHandoff) -> Result<Self, CheckoutError> {
        if handoff.quantity < 1 {
            return Err(CheckoutError::Validation(
                "Missing product, address, or quantity information.".to_string(),
            ));
        }

        Ok(Self {
            step: CheckoutStep::Items,
            draft: Some(OrderDraft {
                product_id: handoff.product_id,
                quantity: handoff.quantity,
                selected_address_id: None,
                product: handoff.product,
            }),
            addresses: Vec::new(),
            in_flight: false,
            epoch: 0,
        })
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The order draft; `None` once the flow completed.
    #[must_use]
    pub const fn draft(&self) -> Option<&OrderDraft> {
        self.draft.as_ref()
    }

    /// Addresses loaded for the address step.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The selected address, resolved against the loaded list.
    #[must_use]
    pub fn selected_address(&self) -> Option<&Address> {
        let selected = self.draft.as_ref()?.selected_address_id?;
        self.addresses.iter().find(|a| a.id == selected)
    }

    fn draft_mut(&mut self) -> Result<&mut OrderDraft, CheckoutError> {
        self.draft.as_mut().ok_or(CheckoutError::Completed)
    }

    // -------------------------------------------------------------------------
    // Request tickets
    // -------------------------------------------------------------------------

    /// Claim the single in-flight slot for a network operation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Busy`] while another operation holds it -
    /// the UI equivalent of a disabled button.
    pub fn begin_request(&mut self) -> Result<CheckoutTicket, CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::Busy);
        }
        self.in_flight = true;
        Ok(CheckoutTicket { epoch: self.epoch })
    }

    /// Release the in-flight slot; `false` means the flow was abandoned
    /// while the request ran and its result must be dropped.
    fn finish_request(&mut self, ticket: CheckoutTicket) -> bool {
        self.in_flight = false;
        ticket.epoch == self.epoch
    }

    /// Abandon the flow: destroy the draft and invalidate in-flight results.
    pub fn abandon(&mut self) {
        debug!(step = ?self.step, "checkout abandoned");
        self.epoch += 1;
        self.in_flight = false;
        self.draft = None;
    }

    // -------------------------------------------------------------------------
    // Step transitions (local, synchronous)
    // -------------------------------------------------------------------------

    /// Move to the next step, gated per step.
    ///
    /// # Errors
    ///
    /// - at `Address` without a selected address: validation error, stays put
    /// - at `Confirm`: not reachable via advance, only via submission
    /// - after completion: [`CheckoutError::Completed`]
    pub fn advance(&mut self) -> Result<CheckoutStep, CheckoutError> {
        let draft = self.draft.as_ref().ok_or(CheckoutError::Completed)?;

        match self.step {
            CheckoutStep::Items => {
                if draft.product.is_none() {
                    // Source-compatible allowance: the failed load was
                    // already surfaced, advancing is still permitted.
                    warn!("advancing past the items step without a product snapshot");
                }
                self.step = CheckoutStep::Address;
            }
            CheckoutStep::Address => {
                if draft.selected_address_id.is_none() {
                    return Err(CheckoutError::Validation(
                        "Please select an existing address or save a new one.".to_string(),
                    ));
                }
                self.step = CheckoutStep::Confirm;
            }
            CheckoutStep::Confirm => return Err(CheckoutError::WrongStep(self.step)),
            CheckoutStep::Submitted => return Err(CheckoutError::Completed),
        }

        debug!(step = ?self.step, "checkout advanced");
        Ok(self.step)
    }

    /// Move to the previous step. A no-op at `Items` and after completion.
    pub fn retreat(&mut self) -> CheckoutStep {
        self.step = match self.step {
            CheckoutStep::Address => CheckoutStep::Items,
            CheckoutStep::Confirm => CheckoutStep::Address,
            CheckoutStep::Items | CheckoutStep::Submitted => self.step,
        };
        self.step
    }

    /// Record a selection from the loaded address list. Local state only.
    ///
    /// # Errors
    ///
    /// Fails when the id is not in the loaded list.
    pub fn select_address(&mut self, id: AddressId) -> Result<(), CheckoutError> {
        if !self.addresses.iter().any(|a| a.id == id) {
            return Err(CheckoutError::Validation(format!(
                "Address {id} is not in the loaded list."
            )));
        }
        self.draft_mut()?.selected_address_id = Some(id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Network operations
    // -------------------------------------------------------------------------

    /// Fetch the product for the items step, refreshing the draft snapshot.
    ///
    /// # Errors
    ///
    /// Failure leaves the step at `Items` with a retryable error; retrying
    /// is up to the shopper.
    pub async fn load_item<A: EshopApi>(&mut self, api: &A) -> Result<(), CheckoutError> {
        let product_id = self.draft_mut()?.product_id;
        let ticket = self.begin_request()?;
        let result = api.get_product(product_id).await;
        self.apply_item(ticket, result)
    }

    /// Apply a product-load result started under `ticket`.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Stale`] when the flow was abandoned meanwhile,
    /// otherwise the API failure.
    pub fn apply_item(
        &mut self,
        ticket: CheckoutTicket,
        result: Result<Product, ApiError>,
    ) -> Result<(), CheckoutError> {
        if !self.finish_request(ticket) {
            return Err(CheckoutError::Stale);
        }
        self.draft_mut()?.product = Some(result?);
        Ok(())
    }

    /// Fetch the saved addresses. Idempotent; called on entry to the
    /// address step and again after a successful save.
    ///
    /// # Errors
    ///
    /// Returns the API failure; the previously loaded list is kept.
    pub async fn load_addresses<A: EshopApi>(&mut self, api: &A) -> Result<(), CheckoutError> {
        let ticket = self.begin_request()?;
        let result = api.list_addresses().await;
        self.apply_addresses(ticket, result)
    }

    /// Apply an address-list result started under `ticket`.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Stale`] when the flow was abandoned meanwhile,
    /// otherwise the API failure.
    pub fn apply_addresses(
        &mut self,
        ticket: CheckoutTicket,
        result: Result<Vec<Address>, ApiError>,
    ) -> Result<(), CheckoutError> {
        if !self.finish_request(ticket) {
            return Err(CheckoutError::Stale);
        }
        self.addresses = result?;
        debug!(count = self.addresses.len(), "addresses loaded");
        Ok(())
    }

    /// Validate and save a new address, then auto-select it.
    ///
    /// Validation failure makes no network call. On success the saved
    /// address (with its server id) is appended to the loaded list - the
    /// list is never mutated optimistically.
    ///
    /// # Errors
    ///
    /// Validation, busy, stale, or API failure.
    pub async fn create_address<A: EshopApi>(
        &mut self,
        api: &A,
        form: &AddressForm,
    ) -> Result<AddressId, CheckoutError> {
        let new_address = form.validate()?;
        self.draft_mut()?;
        let ticket = self.begin_request()?;
        let result = api.create_address(&new_address).await;
        self.apply_created_address(ticket, result)
    }

    /// Apply an address-save result started under `ticket`.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Stale`] when the flow was abandoned meanwhile,
    /// otherwise the API failure.
    pub fn apply_created_address(
        &mut self,
        ticket: CheckoutTicket,
        result: Result<Address, ApiError>,
    ) -> Result<AddressId, CheckoutError> {
        if !self.finish_request(ticket) {
            return Err(CheckoutError::Stale);
        }
        let address = result?;
        let id = address.id;
        info!(%id, "address saved");
        self.addresses.push(address);
        self.draft_mut()?.selected_address_id = Some(id);
        Ok(id)
    }

    /// Submit the order. Only callable from `Confirm`.
    ///
    /// Re-validates that product, address, and quantity are still present,
    /// re-fetches the product to re-check stock (it may have changed since
    /// the detail page), then posts the order. Success moves to
    /// `Submitted`, destroys the draft, and queues the one-shot
    /// [`ORDER_PLACED_MESSAGE`] notification for the catalog view. Failure
    /// stays at `Confirm` with a retryable error.
    ///
    /// # Errors
    ///
    /// Wrong step, validation, busy, stale, out-of-stock, or API failure.
    pub async fn submit_order<A: EshopApi>(
        &mut self,
        api: &A,
        notifications: &mut NotificationQueue,
    ) -> Result<(), CheckoutError> {
        if self.step != CheckoutStep::Confirm {
            return Err(CheckoutError::WrongStep(self.step));
        }

        let draft = self.draft.as_ref().ok_or(CheckoutError::Completed)?;
        let Some(address_id) = draft.selected_address_id else {
            return Err(CheckoutError::Validation(
                "Missing product, address, or quantity information.".to_string(),
            ));
        };
        let order = OrderRequest {
            product_id: draft.product_id,
            quantity: draft.quantity,
            address_id,
        };

        let ticket = self.begin_request()?;
        let result = Self::run_submit(api, order).await;
        self.apply_order_result(ticket, result, notifications)
    }

    async fn run_submit<A: EshopApi>(api: &A, order: OrderRequest) -> Result<(), CheckoutError> {
        // Stock re-check at submission time; the detail-page validation may
        // be minutes old.
        let product = api.get_product(order.product_id).await?;
        if order.quantity > product.available_items {
            return Err(CheckoutError::OutOfStock {
                available: product.available_items,
            });
        }

        api.place_order(&order).await?;
        Ok(())
    }

    /// Apply a submission result started under `ticket`.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::Stale`] when the flow was abandoned meanwhile,
    /// otherwise the submission failure.
    pub fn apply_order_result(
        &mut self,
        ticket: CheckoutTicket,
        result: Result<(), CheckoutError>,
        notifications: &mut NotificationQueue,
    ) -> Result<(), CheckoutError> {
        if !self.finish_request(ticket) {
            return Err(CheckoutError::Stale);
        }

        result?;

        info!("order placed");
        self.step = CheckoutStep::Submitted;
        self.draft = None;
        notifications.push(Notification::success(ORDER_PLACED_MESSAGE));
        Ok(())
    }
}

/// New-address form as typed by the shopper.
#[derive(Debug, Clone, Default)]
pub struct AddressForm {
    pub name: String,
    pub contact_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    /// Optional; everything else is required.
    pub landmark: String,
    pub zip_code: String,
}

impl AddressForm {
    /// Validate the form into a wire payload.
    ///
    /// # Errors
    ///
    /// Returns a validation error when any required field is empty; no
    /// network call is made in that case.
    pub fn validate(&self) -> Result<NewAddress, CheckoutError> {
        let required = [
            &self.name,
            &self.contact_number,
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(CheckoutError::Validation(
                "Please fill all required fields!".to_string(),
            ));
        }

        let landmark = self.landmark.trim();
        Ok(NewAddress {
            name: self.name.trim().to_owned(),
            contact_number: self.contact_number.trim().to_owned(),
            street: self.street.trim().to_owned(),
            city: self.city.trim().to_owned(),
            state: self.state.trim().to_owned(),
            landmark: if landmark.is_empty() {
                None
            } else {
                Some(landmark.to_owned())
            },
            zip_code: self.zip_code.trim().to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use chrono::Utc;

    fn handoff() -> CheckoutHandoff {
        CheckoutHandoff::new(ProductId::new(1), 2, Some(lamp()))
    }

    fn lamp() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Desk Lamp".to_string(),
            category: "Furniture".to_string(),
            price: Decimal::new(200, 0),
            description: String::new(),
            manufacturer: String::new(),
            available_items: 3,
            image_url: None,
            created_at: Utc::now(),
        }
    }

    fn home_address(id: i64) -> Address {
        Address {
            id: AddressId::new(id),
            name: "Ada".to_string(),
            contact_number: "555".to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            landmark: None,
            zip_code: "62704".to_string(),
        }
    }

    #[test]
    fn test_entry_requires_positive_quantity() {
        let bad = CheckoutHandoff::new(ProductId::new(1), 0, None);
        assert!(matches!(
            Checkout::new(bad),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_advance_from_items_always_allowed() {
        let mut checkout = Checkout::new(CheckoutHandoff::new(ProductId::new(1), 1, None)).unwrap();
        // No product snapshot, still allowed (source-compatible).
        assert_eq!(checkout.advance().unwrap(), CheckoutStep::Address);
    }

    #[test]
    fn test_advance_from_address_requires_selection() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        checkout.advance().unwrap();

        let err = checkout.advance().unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(_)));
        assert_eq!(checkout.step(), CheckoutStep::Address);
    }

    #[test]
    fn test_advance_past_confirm_not_reachable() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        let ticket = checkout.begin_request().unwrap();
        checkout
            .apply_addresses(ticket, Ok(vec![home_address(7)]))
            .unwrap();
        checkout.advance().unwrap();
        checkout.select_address(AddressId::new(7)).unwrap();
        checkout.advance().unwrap();
        assert_eq!(checkout.step(), CheckoutStep::Confirm);

        assert!(matches!(
            checkout.advance(),
            Err(CheckoutError::WrongStep(CheckoutStep::Confirm))
        ));
    }

    #[test]
    fn test_retreat_is_noop_at_items() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        assert_eq!(checkout.retreat(), CheckoutStep::Items);
        checkout.advance().unwrap();
        assert_eq!(checkout.retreat(), CheckoutStep::Items);
    }

    #[test]
    fn test_select_address_must_be_loaded() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        assert!(matches!(
            checkout.select_address(AddressId::new(9)),
            Err(CheckoutError::Validation(_))
        ));

        let ticket = checkout.begin_request().unwrap();
        checkout
            .apply_addresses(ticket, Ok(vec![home_address(9)]))
            .unwrap();
        checkout.select_address(AddressId::new(9)).unwrap();
        assert_eq!(
            checkout.draft().unwrap().selected_address_id,
            Some(AddressId::new(9))
        );
    }

    #[test]
    fn test_in_flight_guard_rejects_second_request() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        let _ticket = checkout.begin_request().unwrap();
        assert!(matches!(
            checkout.begin_request(),
            Err(CheckoutError::Busy)
        ));
    }

    #[test]
    fn test_abandoned_result_is_stale() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        let ticket = checkout.begin_request().unwrap();
        checkout.abandon();

        let result = checkout.apply_addresses(ticket, Ok(vec![home_address(7)]));
        assert!(matches!(result, Err(CheckoutError::Stale)));
        assert!(checkout.addresses().is_empty());
    }

    #[test]
    fn test_address_form_requires_city() {
        let form = AddressForm {
            name: "Ada".to_string(),
            contact_number: "555".to_string(),
            street: "1 Main St".to_string(),
            city: String::new(),
            state: "IL".to_string(),
            landmark: String::new(),
            zip_code: "62704".to_string(),
        };
        assert!(matches!(
            form.validate(),
            Err(CheckoutError::Validation(_))
        ));
    }

    #[test]
    fn test_address_form_landmark_optional() {
        let form = AddressForm {
            name: "Ada".to_string(),
            contact_number: "555".to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            landmark: String::new(),
            zip_code: "62704".to_string(),
        };
        let new_address = form.validate().unwrap();
        assert!(new_address.landmark.is_none());
    }

    #[test]
    fn test_total_price() {
        let checkout = Checkout::new(handoff()).unwrap();
        assert_eq!(
            checkout.draft().unwrap().total_price(),
            Some(Decimal::new(400, 0))
        );
    }

    #[test]
    fn test_successful_submission_clears_draft_and_queues_notification() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        let mut notifications = NotificationQueue::new();
        let ticket = checkout.begin_request().unwrap();

        checkout
            .apply_order_result(ticket, Ok(()), &mut notifications)
            .unwrap();

        assert_eq!(checkout.step(), CheckoutStep::Submitted);
        assert!(checkout.draft().is_none());
        let note = notifications.pop().unwrap();
        assert_eq!(note.message, ORDER_PLACED_MESSAGE);
        assert!(notifications.pop().is_none());
    }

    #[test]
    fn test_failed_submission_keeps_draft_at_confirm() {
        let mut checkout = Checkout::new(handoff()).unwrap();
        let ticket = checkout.begin_request().unwrap();
        checkout
            .apply_addresses(ticket, Ok(vec![home_address(7)]))
            .unwrap();
        checkout.advance().unwrap();
        checkout.select_address(AddressId::new(7)).unwrap();
        checkout.advance().unwrap();

        let mut notifications = NotificationQueue::new();
        let ticket = checkout.begin_request().unwrap();
        let result = checkout.apply_order_result(
            ticket,
            Err(CheckoutError::OutOfStock { available: 1 }),
            &mut notifications,
        );

        assert!(matches!(result, Err(CheckoutError::OutOfStock { .. })));
        assert_eq!(checkout.step(), CheckoutStep::Confirm);
        assert!(checkout.draft().is_some());
        assert!(notifications.pop().is_none());
    }
}
