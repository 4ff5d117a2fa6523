//! Order submission and the dashboard's status workflow.
//!
//! [`OrderDraft::from_checkout`] is the one-shot transformation of a
//! checkout state into the order-creation payload. It is the only cart or
//! checkout path that can fail: an order needs lines, a shipping address
//! and a payment method. A failed submission leaves the checkout state
//! unchanged at review so the same action can simply be retried.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::cart::{CartLine, SizeQuantity};
use crate::domain::checkout::{Address, CheckoutState};
use crate::domain::pricing::display_price;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("cart is empty")]
    EmptyCart,
    #[error("shipping address is missing")]
    MissingShippingAddress,
    #[error("payment method is missing")]
    MissingPaymentMethod,
}

/// One order line, exploded from a cart line: aggregate quantity up front,
/// size breakdown preserved for the print shop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub product_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    pub sizes: Vec<SizeQuantity>,
}

impl OrderLineItem {
    fn from_cart_line(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            image: line.image.clone(),
            unit_price: display_price(line.price),
            quantity: line.total_quantity(),
            color: line.color.clone(),
            print_type: line.print_type.clone(),
            material: line.material.clone(),
            sizes: line.sizes.clone(),
        }
    }
}

/// The order-creation payload sent to persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: String,
    pub customer_email: Option<String>,
    pub line_items: Vec<OrderLineItem>,
    pub payment_method_id: String,
    pub shipping_address: Address,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub discount_code: Option<String>,
    pub notes: String,
}

impl OrderDraft {
    /// Serializes the current checkout state into an order request. Amounts
    /// are the same derived totals the review step displays.
    pub fn from_checkout(state: &CheckoutState) -> Result<Self, SubmitError> {
        if state.cart_items.is_empty() {
            return Err(SubmitError::EmptyCart);
        }
        let shipping_address = state
            .shipping_address
            .clone()
            .ok_or(SubmitError::MissingShippingAddress)?;
        let payment_method_id = state
            .payment_method
            .as_ref()
            .map(|m| m.id.clone())
            .ok_or(SubmitError::MissingPaymentMethod)?;

        let customer_id = state
            .customer
            .as_ref()
            .and_then(|c| c.id.clone())
            .unwrap_or_else(guest_customer_id);

        Ok(Self {
            customer_id,
            customer_email: state.customer.as_ref().map(|c| c.email.clone()),
            line_items: state.cart_items.iter().map(OrderLineItem::from_cart_line).collect(),
            payment_method_id,
            shipping_address,
            subtotal: display_price(state.subtotal()),
            shipping: display_price(state.shipping_amount()),
            tax: state.tax_amount(),
            total: display_price(state.total()),
            discount_code: state.discount_code.clone(),
            notes: state.order_notes.clone(),
        })
    }

    pub fn total_quantity(&self) -> u32 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }
}

/// Identifier minted for orders placed without an account.
fn guest_customer_id() -> String {
    format!("guest-{}", Uuid::new_v4())
}

/// Human-readable order number for confirmation pages and packing slips.
pub fn order_number() -> String {
    format!("ORD-{:08}", rand::random::<u32>() % 100_000_000)
}

/// Fulfillment states the dashboard moves orders through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Forward-only workflow; cancellation is possible until the order has
    /// shipped. Delivered and cancelled are terminal.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Shipped)
                | (Processing, Cancelled)
                | (Shipped, Delivered)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::checkout::{CheckoutAction, CheckoutStep, Customer, PaymentMethod};

    fn ready_checkout() -> CheckoutState {
        CheckoutState::new()
            .apply(CheckoutAction::SetCartItems(vec![CartLine {
                product_id: "p1".into(),
                name: "Classic Tee".into(),
                price: Decimal::new(10, 0),
                image: None,
                color: Some("red".into()),
                print_type: Some("screen".into()),
                material: None,
                sizes: vec![
                    SizeQuantity { size: "M".into(), quantity: 2 },
                    SizeQuantity { size: "L".into(), quantity: 1 },
                ],
            }]))
            .apply(CheckoutAction::SetShippingAddress(Address {
                first_name: "Astrid".into(),
                last_name: "Lind".into(),
                street: "Storgatan 1".into(),
                apartment: None,
                city: "Kalmar".into(),
                postal_code: "39232".into(),
                country: "SE".into(),
                phone: None,
            }))
            .apply(CheckoutAction::SetPaymentMethod(PaymentMethod {
                id: "card".into(),
                name: "Card".into(),
            }))
            .apply(CheckoutAction::SetStep(CheckoutStep::Review))
    }

    #[test]
    fn test_draft_carries_totals_and_size_breakdown() {
        let draft = OrderDraft::from_checkout(&ready_checkout()).unwrap();
        assert_eq!(draft.line_items.len(), 1);
        assert_eq!(draft.line_items[0].quantity, 3);
        assert_eq!(draft.line_items[0].sizes.len(), 2);
        assert_eq!(draft.subtotal, Decimal::new(3000, 2));
        assert_eq!(draft.tax, Decimal::new(300, 2));
        assert_eq!(draft.total, Decimal::new(3899, 2));
        assert_eq!(draft.payment_method_id, "card");
        assert_eq!(draft.total_quantity(), 3);
    }

    #[test]
    fn test_guest_id_minted_when_no_customer() {
        let draft = OrderDraft::from_checkout(&ready_checkout()).unwrap();
        assert!(draft.customer_id.starts_with("guest-"));
    }

    #[test]
    fn test_existing_customer_id_is_kept() {
        let state = ready_checkout().apply(CheckoutAction::SetCustomer(Customer {
            id: Some("c42".into()),
            first_name: "Astrid".into(),
            last_name: "Lind".into(),
            email: "astrid@example.com".into(),
            phone: None,
        }));
        let draft = OrderDraft::from_checkout(&state).unwrap();
        assert_eq!(draft.customer_id, "c42");
        assert_eq!(draft.customer_email.as_deref(), Some("astrid@example.com"));
    }

    #[test]
    fn test_incomplete_checkout_is_rejected() {
        assert_eq!(
            OrderDraft::from_checkout(&CheckoutState::new()),
            Err(SubmitError::EmptyCart)
        );
        let no_address = CheckoutState::new().apply(CheckoutAction::SetCartItems(
            ready_checkout().cart_items.clone(),
        ));
        assert_eq!(
            OrderDraft::from_checkout(&no_address),
            Err(SubmitError::MissingShippingAddress)
        );
    }

    #[test]
    fn test_status_workflow() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Processing));
        assert!(Processing.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Processing));
    }
}
