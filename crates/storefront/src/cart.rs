//! Session cart.
//!
//! Items are kept in the order they were first added. Quantities never drop
//! below one; the only way to take an item out is [`Cart::remove`].

use queens_beauty_core::{Price, Product, ProductId};

/// A cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// The shopper's selected items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one of `product`. Returns the new quantity.
    pub fn add(&mut self, product: &Product) -> u32 {
        if let Some(item) = self.items.iter_mut().find(|item| item.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items.push(CartItem {
            product: product.clone(),
            quantity: 1,
        });
        1
    }

    /// Remove a line regardless of quantity.
    pub fn remove(&mut self, id: ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.product.id == id)?;
        Some(self.items.remove(index))
    }

    /// Change a line's quantity by `delta`, never going below 1.
    ///
    /// Returns the new quantity, or `None` if the product is not in the cart.
    pub fn adjust_quantity(&mut self, id: ProductId, delta: i32) -> Option<u32> {
        let item = self.items.iter_mut().find(|item| item.product.id == id)?;
        item.quantity = item.quantity.saturating_add_signed(delta).max(1);
        Some(item.quantity)
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
