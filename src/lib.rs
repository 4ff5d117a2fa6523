//! Kalmar Studio commerce service
//!
//! Custom-apparel storefront backend: product catalog, per-session shopping
//! carts, multi-step checkout and order management.
//!
//! ## Features
//! - Cart lines keyed by product + color + print type + material, with
//!   per-size quantities
//! - Reducer-driven checkout flow (cart → customer → shipping → payment →
//!   review → confirmation) with derived totals
//! - Best-effort cart mirroring for signed-in shoppers
//! - Order creation with full line-item and size breakdown
//! - Catalog and category management for the dashboard

pub mod domain;
pub mod remote;
