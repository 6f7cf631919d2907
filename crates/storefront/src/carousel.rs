//! Rotating window over the catalog.
//!
//! The window always holds every catalog product exactly once. The item at
//! [`ACTIVE_OFFSET`] is the one shown in focus; stepping rotates the window
//! and jumping rebuilds it around a chosen product.

use std::collections::VecDeque;

use queens_beauty_core::{Product, ProductId};

/// Position of the focused item in the window.
pub const ACTIVE_OFFSET: usize = 1;

/// Carousel state.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    window: VecDeque<Product>,
    /// Set while in jump mode, which blocks auto-advance.
    jumped_to: Option<ProductId>,
    /// Set while the search input has focus.
    suspended: bool,
}

impl Carousel {
    /// A carousel showing `catalog` in catalog order.
    #[must_use]
    pub fn new(catalog: &[Product]) -> Self {
        Self {
            window: catalog.iter().cloned().collect(),
            jumped_to: None,
            suspended: false,
        }
    }

    /// The window in display order.
    pub fn window(&self) -> impl ExactSizeIterator<Item = &Product> {
        self.window.iter()
    }

    /// Ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<ProductId> {
        self.window.iter().map(|p| p.id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The focused product. A one-item window focuses its only item.
    #[must_use]
    pub fn active(&self) -> Option<&Product> {
        self.window.get(ACTIVE_OFFSET).or_else(|| self.window.front())
    }

    /// Rotate left by one.
    pub fn advance(&mut self) {
        if let Some(head) = self.window.pop_front() {
            self.window.push_back(head);
        }
    }

    /// Rotate right by one.
    pub fn retreat(&mut self) {
        if let Some(tail) = self.window.pop_back() {
            self.window.push_front(tail);
        }
    }

    /// Rebuild the window from `catalog` with `id` at the active offset and
    /// enter jump mode.
    ///
    /// Returns `false` and changes nothing if `id` is not in `catalog`.
    pub fn jump_to(&mut self, id: ProductId, catalog: &[Product]) -> bool {
        let Some(target) = catalog.iter().find(|p| p.id == id) else {
            tracing::debug!(%id, "Jump target not in catalog");
            return false;
        };
        let mut window: VecDeque<Product> =
            catalog.iter().filter(|p| p.id != id).cloned().collect();
        window.insert(ACTIVE_OFFSET.min(window.len()), target.clone());
        self.window = window;
        self.jumped_to = Some(id);
        true
    }

    /// Whether a jump has disabled auto-advance.
    #[must_use]
    pub const fn in_jump_mode(&self) -> bool {
        self.jumped_to.is_some()
    }

    /// Leave jump mode.
    pub fn enable_auto_advance(&mut self) {
        self.jumped_to = None;
    }

    /// Pause auto-advance while the search input has focus.
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    /// Undo [`suspend`](Self::suspend). Jump mode still blocks auto-advance.
    pub fn resume(&mut self) {
        self.suspended = false;
    }

    /// Whether the auto-advance timer should run.
    #[must_use]
    pub fn auto_advance_enabled(&self) -> bool {
        !self.window.is_empty() && !self.suspended && self.jumped_to.is_none()
    }

    /// Auto-advance tick. Returns whether the window moved.
    pub fn tick(&mut self) -> bool {
        if !self.auto_advance_enabled() {
            return false;
        }
        self.advance();
        true
    }

    /// Replace the window after the catalog changed.
    ///
    /// In jump mode the jump is re-applied if its target survived; otherwise
    /// the window follows catalog order, rotated so the focused product stays
    /// focused when it still exists.
    pub fn sync_catalog(&mut self, catalog: &[Product]) {
        if let Some(id) = self.jumped_to {
            if self.jump_to(id, catalog) {
                return;
            }
            self.jumped_to = None;
        }

        let active = self.active().map(|p| p.id);
        let mut window: VecDeque<Product> = catalog.iter().cloned().collect();
        let position = active.and_then(|id| window.iter().position(|p| p.id == id));
        if let Some(position) = position {
            if window.len() > ACTIVE_OFFSET {
                let len = window.len();
                window.rotate_left((position + len - ACTIVE_OFFSET) % len);
            }
        }
        self.window = window;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use queens_beauty_core::{Price, ProductDraft};

    use super::*;

    fn catalog(count: i64) -> Vec<Product> {
        (1..=count)
            .map(|i| {
                ProductDraft {
                    name: format!("Product {i}"),
                    description: String::new(),
                    price: Price::from_shillings(100),
                    image: None,
                }
                .into_product(ProductId::new(i))
            })
            .collect()
    }

    fn ids(raw: &[i64]) -> Vec<ProductId> {
        raw.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_advance_and_retreat_rotate() {
        let mut carousel = Carousel::new(&catalog(4));
        carousel.advance();
        assert_eq!(carousel.ids(), ids(&[2, 3, 4, 1]));
        assert_eq!(carousel.active().unwrap().id, ProductId::new(3));

        carousel.retreat();
        carousel.retreat();
        assert_eq!(carousel.ids(), ids(&[4, 1, 2, 3]));
    }

    #[test]
    fn test_empty_window_is_inert() {
        let mut carousel = Carousel::new(&[]);
        carousel.advance();
        carousel.retreat();
        assert!(carousel.active().is_none());
        assert!(!carousel.auto_advance_enabled());
        assert!(!carousel.tick());
    }

    #[test]
    fn test_single_item_is_active() {
        let carousel = Carousel::new(&catalog(1));
        assert_eq!(carousel.active().unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_jump_places_target_at_active_offset() {
        let products = catalog(5);
        let mut carousel = Carousel::new(&products);
        carousel.advance();

        assert!(carousel.jump_to(ProductId::new(4), &products));
        assert_eq!(carousel.ids(), ids(&[1, 4, 2, 3, 5]));
        assert!(carousel.in_jump_mode());
        assert!(!carousel.auto_advance_enabled());
        assert!(!carousel.tick());
    }

    #[test]
    fn test_jump_to_first_product() {
        let products = catalog(3);
        let mut carousel = Carousel::new(&products);
        assert!(carousel.jump_to(ProductId::new(1), &products));
        assert_eq!(carousel.ids(), ids(&[2, 1, 3]));
    }

    #[test]
    fn test_jump_to_absent_id_is_noop() {
        let products = catalog(3);
        let mut carousel = Carousel::new(&products);
        carousel.advance();
        let before = carousel.ids();

        assert!(!carousel.jump_to(ProductId::new(42), &products));
        assert_eq!(carousel.ids(), before);
        assert!(!carousel.in_jump_mode());
    }

    #[test]
    fn test_suspend_and_resume() {
        let mut carousel = Carousel::new(&catalog(3));
        carousel.suspend();
        assert!(!carousel.tick());
        carousel.resume();
        assert!(carousel.tick());
    }

    #[test]
    fn test_resume_does_not_leave_jump_mode() {
        let products = catalog(3);
        let mut carousel = Carousel::new(&products);
        carousel.jump_to(ProductId::new(3), &products);
        carousel.suspend();
        carousel.resume();
        assert!(!carousel.auto_advance_enabled());

        carousel.enable_auto_advance();
        assert!(carousel.auto_advance_enabled());
    }

    #[test]
    fn test_sync_keeps_active_product() {
        let mut carousel = Carousel::new(&catalog(4));
        carousel.advance();
        assert_eq!(carousel.active().unwrap().id, ProductId::new(3));

        let mut updated = catalog(5);
        updated.remove(0);
        carousel.sync_catalog(&updated);
        assert_eq!(carousel.active().unwrap().id, ProductId::new(3));
        assert_eq!(carousel.len(), 4);
    }

    #[test]
    fn test_sync_reapplies_jump() {
        let products = catalog(4);
        let mut carousel = Carousel::new(&products);
        carousel.jump_to(ProductId::new(4), &products);

        carousel.sync_catalog(&catalog(6));
        assert_eq!(carousel.ids(), ids(&[1, 4, 2, 3, 5, 6]));
        assert!(carousel.in_jump_mode());
    }

    #[test]
    fn test_sync_leaves_jump_mode_when_target_deleted() {
        let products = catalog(4);
        let mut carousel = Carousel::new(&products);
        carousel.jump_to(ProductId::new(4), &products);

        carousel.sync_catalog(&catalog(3));
        assert!(!carousel.in_jump_mode());
        assert_eq!(carousel.len(), 3);
    }
}
