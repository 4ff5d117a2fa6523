//! Cart lines and the cart store.
//!
//! A cart line is identified by its [`VariantKey`]: the product plus the
//! variant axes the customizer exposes (color, print type, material). Two
//! additions merge into one line only on an exact key match. Each line holds
//! per-size quantities; a size entry never persists with quantity zero, and
//! a line with no sizes left is pruned from the store.
//!
//! Every operation is infallible: missing targets degrade to no-ops and
//! quantity updates on absent sizes become inserts. The storefront relies on
//! this tolerance for idempotent retry of quantity edits.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::display_price;

/// Composite identity distinguishing otherwise-identical cart lines.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantKey {
    pub product_id: String,
    pub color: Option<String>,
    pub print_type: Option<String>,
    pub material: Option<String>,
}

/// One size bucket on a cart line. Quantity is always positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeQuantity {
    pub size: String,
    pub quantity: u32,
}

/// One entry in the cart: a variant key plus its per-size quantities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub print_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    pub sizes: Vec<SizeQuantity>,
}

impl CartLine {
    pub fn variant_key(&self) -> VariantKey {
        VariantKey {
            product_id: self.product_id.clone(),
            color: self.color.clone(),
            print_type: self.print_type.clone(),
            material: self.material.clone(),
        }
    }

    /// Sum of all size quantities on this line.
    pub fn total_quantity(&self) -> u32 {
        self.sizes.iter().map(|s| s.quantity).sum()
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.total_quantity())
    }

    pub fn display_price(&self) -> Decimal {
        display_price(self.price)
    }

    /// Additive merge: increments the size if present, appends it otherwise.
    fn merge_size(&mut self, size: &str, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.sizes.iter_mut().find(|s| s.size == size) {
            Some(entry) => entry.quantity += quantity,
            None => self.sizes.push(SizeQuantity { size: size.to_string(), quantity }),
        }
    }

    /// Drops entries that violate the positive-quantity invariant. Used when
    /// hydrating lines from an external source.
    fn normalize(mut self) -> Option<Self> {
        self.sizes.retain(|s| s.quantity > 0);
        if self.sizes.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Request shape for adding an item to the cart.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewCartItem {
    pub product_id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub print_type: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    pub size: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl NewCartItem {
    fn variant_key(&self) -> VariantKey {
        VariantKey {
            product_id: self.product_id.clone(),
            color: self.color.clone(),
            print_type: self.print_type.clone(),
            material: self.material.clone(),
        }
    }
}

/// The cart: an insertion-ordered set of lines, unique per variant key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of `total_quantity` across all lines. Recomputed on every call so
    /// it can never drift from the underlying size entries.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(CartLine::total_quantity).sum()
    }

    /// Merchandise subtotal across all lines.
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Adds an item. Lines merge on an exact variant-key match; the size
    /// quantity is added to any existing bucket, never overwritten.
    pub fn add_item(&mut self, item: NewCartItem) {
        let key = item.variant_key();
        if let Some(line) = self.lines.iter_mut().find(|l| l.variant_key() == key) {
            line.merge_size(&item.size, item.quantity);
            return;
        }
        if item.quantity == 0 {
            return;
        }
        self.lines.push(CartLine {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image: item.image,
            color: item.color,
            print_type: item.print_type,
            material: item.material,
            sizes: vec![SizeQuantity { size: item.size, quantity: item.quantity }],
        });
    }

    /// Adds quantity to a size bucket on the first line matching the product
    /// alone. Callers needing full variant disambiguation use [`add_item`];
    /// this entry point serves the line-detail UI, where one line per product
    /// is on screen. No matching line means nothing happens.
    ///
    /// [`add_item`]: CartStore::add_item
    pub fn add_size(&mut self, product_id: &str, size: &str, quantity: u32) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.merge_size(size, quantity);
        }
    }

    /// Removes every line for the given product. Absent product is a no-op.
    pub fn remove_item(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Removes one size bucket; a line left without sizes is pruned.
    pub fn remove_size(&mut self, product_id: &str, size: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.sizes.retain(|s| s.size != size);
        }
        self.lines.retain(|l| !l.sizes.is_empty());
    }

    /// Sets (not increments) a size quantity. Zero or negative removes the
    /// size; a size not yet on the line is created with the given quantity.
    pub fn update_size_quantity(&mut self, product_id: &str, size: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove_size(product_id, size);
            return;
        }
        let quantity = quantity as u32;
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            match line.sizes.iter_mut().find(|s| s.size == size) {
                Some(entry) => entry.quantity = quantity,
                None => line.sizes.push(SizeQuantity { size: size.to_string(), quantity }),
            }
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Replaces the whole store with lines fetched from the remote mirror.
    /// No merge with local state; invalid entries are dropped.
    pub fn replace_all(&mut self, lines: Vec<CartLine>) {
        self.lines = lines.into_iter().filter_map(CartLine::normalize).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, color: Option<&str>, size: &str, quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: product_id.into(),
            name: "Classic Tee".into(),
            price: Decimal::new(10, 0),
            image: None,
            color: color.map(Into::into),
            print_type: None,
            material: None,
            size: size.into(),
            quantity,
        }
    }

    #[test]
    fn test_same_variant_merges_additively() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 2));
        cart.add_item(item("p1", Some("red"), "M", 3));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].sizes, vec![SizeQuantity { size: "M".into(), quantity: 5 }]);
        assert_eq!(cart.lines()[0].total_quantity(), 5);
    }

    #[test]
    fn test_different_color_is_distinct_line() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 1));
        cart.add_item(item("p1", Some("blue"), "M", 1));
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_items(), 2);
    }

    #[test]
    fn test_new_size_appends_to_existing_line() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 2));
        cart.add_item(item("p1", Some("red"), "L", 1));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].total_quantity(), 3);
    }

    #[test]
    fn test_add_size_matches_on_product_alone() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 1));
        cart.add_size("p1", "M", 2);
        cart.add_size("p1", "XL", 4);
        assert_eq!(cart.lines()[0].total_quantity(), 7);
        // no line for p2: nothing happens
        cart.add_size("p2", "M", 1);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_update_quantity_overwrites_and_is_idempotent() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", None, "M", 2));
        cart.update_size_quantity("p1", "M", 7);
        cart.update_size_quantity("p1", "M", 7);
        assert_eq!(cart.lines()[0].sizes[0].quantity, 7);
        assert_eq!(cart.total_items(), 7);
    }

    #[test]
    fn test_update_quantity_upserts_missing_size() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", None, "M", 1));
        cart.update_size_quantity("p1", "S", 3);
        assert_eq!(cart.lines()[0].sizes.len(), 2);
        assert_eq!(cart.total_items(), 4);
    }

    #[test]
    fn test_update_to_zero_prunes_last_size_and_line() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", None, "M", 2));
        cart.update_size_quantity("p1", "M", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_size_keeps_line_with_remaining_sizes() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", None, "M", 2));
        cart.add_item(item("p1", None, "L", 1));
        cart.remove_size("p1", "M");
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].sizes[0].size, "L");
    }

    #[test]
    fn test_remove_targets_are_tolerant() {
        let mut cart = CartStore::new();
        cart.remove_item("ghost");
        cart.remove_size("ghost", "M");
        cart.update_size_quantity("ghost", "M", -1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_item_drops_all_variants_of_product() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 1));
        cart.add_item(item("p1", Some("blue"), "M", 1));
        cart.add_item(item("p2", None, "M", 1));
        cart.remove_item("p1");
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, "p2");
    }

    #[test]
    fn test_total_items_tracks_sizes() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", Some("red"), "M", 2));
        cart.add_item(item("p2", None, "S", 4));
        cart.update_size_quantity("p2", "S", 1);
        cart.remove_size("p1", "M");
        let expected: u32 = cart.lines().iter().map(CartLine::total_quantity).sum();
        assert_eq!(cart.total_items(), expected);
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_replace_all_drops_invalid_entries() {
        let mut cart = CartStore::new();
        cart.add_item(item("local", None, "M", 1));
        cart.replace_all(vec![
            CartLine {
                product_id: "remote".into(),
                name: "Hoodie".into(),
                price: Decimal::new(2999, 2),
                image: None,
                color: None,
                print_type: None,
                material: None,
                sizes: vec![
                    SizeQuantity { size: "M".into(), quantity: 2 },
                    SizeQuantity { size: "L".into(), quantity: 0 },
                ],
            },
            CartLine {
                product_id: "empty".into(),
                name: "Empty".into(),
                price: Decimal::ZERO,
                image: None,
                color: None,
                print_type: None,
                material: None,
                sizes: vec![],
            },
        ]);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.lines()[0].product_id, "remote");
        assert_eq!(cart.lines()[0].sizes.len(), 1);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut cart = CartStore::new();
        cart.add_item(item("p1", None, "M", 3));
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_items(), 0);
    }
}
