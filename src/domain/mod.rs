//! Domain module: cart, checkout and order logic, free of I/O.

pub mod cart;
pub mod checkout;
pub mod events;
pub mod order;
pub mod pricing;

pub use cart::{CartLine, CartStore, NewCartItem, SizeQuantity, VariantKey};
pub use checkout::{CheckoutAction, CheckoutState, CheckoutStep, CheckoutTotals};
pub use order::{OrderDraft, OrderStatus, SubmitError};
