//! Domain events, published best-effort after state changes.

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Cart(CartEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CartEvent {
    Synced { user_id: String, line_count: usize, total_items: u32 },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: String, order_number: String, total: Decimal },
    StatusChanged { order_id: String, status: String },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            DomainEvent::Cart(CartEvent::Synced { .. }) => "kalmar.cart.synced",
            DomainEvent::Order(OrderEvent::Placed { .. }) => "kalmar.orders.placed",
            DomainEvent::Order(OrderEvent::StatusChanged { .. }) => "kalmar.orders.status",
        }
    }
}
