//! Checkout state machine.
//!
//! A linear sequence of steps carrying customer, address, shipping and
//! payment data plus a snapshot of the cart. State changes only through
//! [`CheckoutState::apply`], a pure reducer over [`CheckoutAction`]: each
//! action replaces exactly one field and leaves the rest untouched. Totals
//! are derived on demand and never stored, so they cannot drift when the
//! snapshot or the shipping method changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::cart::CartLine;
use crate::domain::pricing::{default_shipping_price, display_price, tax_rate};

/// Checkout steps, in display order. Navigation is driven by explicit
/// `SetStep` actions; moving backwards to edit an earlier step is allowed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Cart,
    Customer,
    Shipping,
    Payment,
    Review,
    Confirmation,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Customer {
    /// Identifier of an authenticated customer; guests have none.
    #[serde(default)]
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub name: String,
}

/// The record carried through checkout. Instantiated at checkout entry with
/// every optional field unset and `step` at [`CheckoutStep::Cart`]; discarded
/// when checkout is abandoned or completed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutState {
    pub step: CheckoutStep,
    pub customer: Option<Customer>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub shipping_method: Option<ShippingMethod>,
    pub payment_method: Option<PaymentMethod>,
    pub discount_code: Option<String>,
    /// Point-in-time copy of the cart, not a live reference. Refreshed by
    /// `SetCartItems` while the shopper is still on the cart step; later
    /// cart edits do not reach a checkout already past it.
    pub cart_items: Vec<CartLine>,
    pub order_notes: String,
    /// Set from the order-creation response before entering confirmation.
    pub order_id: Option<String>,
}

/// One action per mutable field, plus step navigation. Reducer-dispatched;
/// the serialized form is the tag names below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutAction {
    SetStep(CheckoutStep),
    SetCustomer(Customer),
    SetShippingAddress(Address),
    SetBillingAddress(Address),
    SetShippingMethod(ShippingMethod),
    SetPaymentMethod(PaymentMethod),
    SetDiscountCode(Option<String>),
    SetCartItems(Vec<CartLine>),
    SetOrderNotes(String),
}

impl CheckoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure transition: returns a new state with exactly the targeted field
    /// replaced. The previous state is never mutated.
    #[must_use]
    pub fn apply(&self, action: CheckoutAction) -> CheckoutState {
        let mut next = self.clone();
        match action {
            CheckoutAction::SetStep(step) => next.step = step,
            CheckoutAction::SetCustomer(customer) => next.customer = Some(customer),
            CheckoutAction::SetShippingAddress(address) => next.shipping_address = Some(address),
            CheckoutAction::SetBillingAddress(address) => next.billing_address = Some(address),
            CheckoutAction::SetShippingMethod(method) => next.shipping_method = Some(method),
            CheckoutAction::SetPaymentMethod(method) => next.payment_method = Some(method),
            CheckoutAction::SetDiscountCode(code) => next.discount_code = code,
            CheckoutAction::SetCartItems(items) => next.cart_items = items,
            CheckoutAction::SetOrderNotes(notes) => next.order_notes = notes,
        }
        next
    }

    /// Whether cart-store changes should still refresh the snapshot.
    pub fn accepts_cart_sync(&self) -> bool {
        self.step == CheckoutStep::Cart
    }

    pub fn subtotal(&self) -> Decimal {
        self.cart_items.iter().map(CartLine::line_total).sum()
    }

    pub fn shipping_amount(&self) -> Decimal {
        self.shipping_method
            .as_ref()
            .map(|m| m.price)
            .unwrap_or_else(default_shipping_price)
    }

    pub fn tax_amount(&self) -> Decimal {
        display_price(self.subtotal() * tax_rate())
    }

    pub fn total(&self) -> Decimal {
        self.subtotal() + self.shipping_amount() + self.tax_amount()
    }

    pub fn totals(&self) -> CheckoutTotals {
        CheckoutTotals {
            subtotal: display_price(self.subtotal()),
            shipping: display_price(self.shipping_amount()),
            tax: self.tax_amount(),
            total: display_price(self.total()),
        }
    }
}

/// Derived amounts, recomputed for every response.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckoutTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cart::SizeQuantity;

    fn line(price: Decimal, quantity: u32) -> CartLine {
        CartLine {
            product_id: "p1".into(),
            name: "Classic Tee".into(),
            price,
            image: None,
            color: None,
            print_type: None,
            material: None,
            sizes: vec![SizeQuantity { size: "M".into(), quantity }],
        }
    }

    fn customer() -> Customer {
        Customer {
            id: Some("c1".into()),
            first_name: "Astrid".into(),
            last_name: "Lind".into(),
            email: "astrid@example.com".into(),
            phone: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = CheckoutState::new();
        assert_eq!(state.step, CheckoutStep::Cart);
        assert!(state.customer.is_none());
        assert!(state.cart_items.is_empty());
        assert_eq!(state.order_notes, "");
    }

    #[test]
    fn test_each_action_replaces_one_field() {
        let state = CheckoutState::new()
            .apply(CheckoutAction::SetStep(CheckoutStep::Customer))
            .apply(CheckoutAction::SetCustomer(customer()))
            .apply(CheckoutAction::SetStep(CheckoutStep::Confirmation));
        assert_eq!(state.step, CheckoutStep::Confirmation);
        assert!(state.customer.is_some());
        assert!(state.shipping_address.is_none());
    }

    #[test]
    fn test_apply_leaves_previous_state_untouched() {
        let initial = CheckoutState::new();
        let _next = initial.apply(CheckoutAction::SetOrderNotes("gift wrap".into()));
        assert_eq!(initial.order_notes, "");
    }

    #[test]
    fn test_back_navigation_is_allowed() {
        let state = CheckoutState::new()
            .apply(CheckoutAction::SetStep(CheckoutStep::Review))
            .apply(CheckoutAction::SetStep(CheckoutStep::Shipping));
        assert_eq!(state.step, CheckoutStep::Shipping);
    }

    #[test]
    fn test_totals_with_default_shipping() {
        let state = CheckoutState::new()
            .apply(CheckoutAction::SetCartItems(vec![line(Decimal::new(10, 0), 2)]));
        let totals = state.totals();
        assert_eq!(totals.subtotal, Decimal::new(2000, 2));
        assert_eq!(totals.shipping, Decimal::new(599, 2));
        assert_eq!(totals.tax, Decimal::new(200, 2));
        assert_eq!(totals.total, Decimal::new(2799, 2));
    }

    #[test]
    fn test_selected_method_overrides_default_shipping() {
        let state = CheckoutState::new()
            .apply(CheckoutAction::SetCartItems(vec![line(Decimal::new(10, 0), 2)]))
            .apply(CheckoutAction::SetShippingMethod(ShippingMethod {
                id: "express".into(),
                name: "Express".into(),
                price: Decimal::new(1250, 2),
            }));
        assert_eq!(state.shipping_amount(), Decimal::new(1250, 2));
        assert_eq!(state.total(), Decimal::new(3450, 2));
    }

    #[test]
    fn test_subtotal_is_order_independent() {
        let a = line(Decimal::new(10, 0), 2);
        let b = line(Decimal::new(1999, 2), 1);
        let forward = CheckoutState::new()
            .apply(CheckoutAction::SetCartItems(vec![a.clone(), b.clone()]));
        let reverse = CheckoutState::new().apply(CheckoutAction::SetCartItems(vec![b, a]));
        assert_eq!(forward.subtotal(), reverse.subtotal());
    }

    #[test]
    fn test_cart_sync_only_while_on_cart_step() {
        let state = CheckoutState::new();
        assert!(state.accepts_cart_sync());
        let state = state.apply(CheckoutAction::SetStep(CheckoutStep::Customer));
        assert!(!state.accepts_cart_sync());
    }

    #[test]
    fn test_action_wire_format() {
        let action: CheckoutAction = serde_json::from_value(serde_json::json!({
            "type": "SET_STEP",
            "payload": "review",
        }))
        .unwrap();
        assert_eq!(action, CheckoutAction::SetStep(CheckoutStep::Review));
    }

    #[test]
    fn test_customer_email_is_validated() {
        let mut c = customer();
        assert!(c.validate().is_ok());
        c.email = "not-an-email".into();
        assert!(c.validate().is_err());
    }
}
