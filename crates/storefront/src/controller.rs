//! The storefront session.
//!
//! [`Storefront`] owns all session state: the catalog snapshot, the carousel,
//! the search panel and the cart. Events are applied one at a time, either
//! directly through [`Storefront::handle`] or from the event loop in
//! [`Storefront::run`], which also drives the auto-advance timer and follows
//! catalog refreshes.

use std::sync::Arc;

use queens_beauty_core::{CatalogGateway, Product, ProductId};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::instrument;

use crate::carousel::Carousel;
use crate::cart::Cart;
use crate::catalog::{CatalogStore, FEATURED_LIMIT, Snapshot, newest};
use crate::checkout::{
    CheckoutError, ContactForm, Handoff, Launcher, Platform, WebFallback, WhatsAppMessage,
    contact_message, deliver, inquiry_message, order_message,
};
use crate::config::StorefrontConfig;
use crate::search::SearchPanel;

/// Something the shopper did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontEvent {
    /// Carousel "next" arrow.
    Next,
    /// Carousel "previous" arrow.
    Previous,
    /// Bring a product into focus and stop auto-advance.
    JumpTo(ProductId),
    /// Leave jump mode.
    EnableAutoAdvance,
    /// The search input gained focus.
    SearchFocused,
    /// The pointer left the carousel area.
    CarouselLeft,
    /// The search text changed.
    SearchInput(String),
    /// A search result was clicked.
    SelectSearchResult(ProductId),
    AddToCart(ProductId),
    RemoveFromCart(ProductId),
    AdjustQuantity { id: ProductId, delta: i32 },
    ClearCart,
    /// Send the cart as a WhatsApp order.
    Checkout,
    /// Send a single-product inquiry.
    BuyNow(ProductId),
    /// Submit the contact form.
    Contact(ContactForm),
}

impl StorefrontEvent {
    /// Whether the shopper moved the carousel by hand.
    const fn is_manual_navigation(&self) -> bool {
        matches!(
            self,
            Self::Next | Self::Previous | Self::JumpTo(_) | Self::SelectSearchResult(_)
        )
    }
}

/// A storefront session.
pub struct Storefront<G, L> {
    config: StorefrontConfig,
    catalog: CatalogStore<G>,
    snapshot: Snapshot,
    carousel: Carousel,
    search: SearchPanel,
    cart: Cart,
    platform: Platform,
    launcher: Arc<L>,
    notice: Option<String>,
}

impl<G, L> Storefront<G, L>
where
    G: CatalogGateway + 'static,
    L: Launcher + 'static,
{
    /// Start a session over the store's current snapshot.
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        catalog: CatalogStore<G>,
        launcher: Arc<L>,
        platform: Platform,
    ) -> Self {
        let snapshot = catalog.snapshot();
        Self {
            config,
            carousel: Carousel::new(&snapshot),
            catalog,
            snapshot,
            search: SearchPanel::new(),
            cart: Cart::new(),
            platform,
            launcher,
            notice: None,
        }
    }

    #[must_use]
    pub const fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    #[must_use]
    pub const fn search(&self) -> &SearchPanel {
        &self.search
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.snapshot
    }

    /// The category grid: newest products first.
    #[must_use]
    pub fn featured(&self) -> Vec<Product> {
        newest(&self.snapshot, FEATURED_LIMIT)
    }

    /// The last user-visible notice, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Switch to a new catalog snapshot.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        tracing::debug!(count = snapshot.len(), "Applying catalog snapshot");
        self.carousel.sync_catalog(&snapshot);
        self.search.recompute(&snapshot);
        self.snapshot = snapshot;
    }

    /// Apply one event.
    ///
    /// Returns the handoff to run for checkout events.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if an order or contact message cannot be
    /// built. The error text is also kept as the current notice.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: StorefrontEvent) -> Result<Option<Handoff>, CheckoutError> {
        let result = self.apply(event);
        match &result {
            Ok(_) => self.notice = None,
            Err(e) => self.notice = Some(e.to_string()),
        }
        result
    }

    fn apply(&mut self, event: StorefrontEvent) -> Result<Option<Handoff>, CheckoutError> {
        match event {
            StorefrontEvent::Next => self.carousel.advance(),
            StorefrontEvent::Previous => self.carousel.retreat(),
            StorefrontEvent::JumpTo(id) => {
                self.carousel.jump_to(id, &self.snapshot);
            }
            StorefrontEvent::EnableAutoAdvance => self.carousel.enable_auto_advance(),
            StorefrontEvent::SearchFocused => self.carousel.suspend(),
            StorefrontEvent::CarouselLeft => self.carousel.resume(),
            StorefrontEvent::SearchInput(query) => self.search.set_query(query, &self.snapshot),
            StorefrontEvent::SelectSearchResult(id) => {
                if let Some(id) = self.search.select(id) {
                    self.carousel.jump_to(id, &self.snapshot);
                }
            }
            StorefrontEvent::AddToCart(id) => {
                if let Some(product) = self.lookup(id) {
                    let quantity = self.cart.add(&product);
                    tracing::debug!(%id, quantity, "Added to cart");
                }
            }
            StorefrontEvent::RemoveFromCart(id) => {
                self.cart.remove(id);
            }
            StorefrontEvent::AdjustQuantity { id, delta } => {
                self.cart.adjust_quantity(id, delta);
            }
            StorefrontEvent::ClearCart => self.cart.clear(),
            StorefrontEvent::Checkout => {
                let text = order_message(&self.cart)?;
                return Ok(Some(self.order_handoff(text)));
            }
            StorefrontEvent::BuyNow(id) => {
                return Ok(self
                    .lookup(id)
                    .map(|product| self.order_handoff(inquiry_message(&product))));
            }
            StorefrontEvent::Contact(form) => {
                let text = contact_message(&form)?;
                let message = WhatsAppMessage::new(
                    self.config.contact_phone.clone(),
                    text,
                    WebFallback::WebWhatsApp,
                );
                return Ok(Some(message.handoff(self.platform)));
            }
        }
        Ok(None)
    }

    fn lookup(&self, id: ProductId) -> Option<Product> {
        let product = self.snapshot.iter().find(|p| p.id == id).cloned();
        if product.is_none() {
            tracing::debug!(%id, "Product not in catalog");
        }
        product
    }

    fn order_handoff(&self, text: String) -> Handoff {
        WhatsAppMessage::new(self.config.order_phone.clone(), text, WebFallback::WaMe)
            .handoff(self.platform)
    }

    /// Run the session until `events` closes, then return the final state.
    ///
    /// Checkout handoffs run in background tasks so the fallback delay never
    /// holds up the loop. Handoffs still pending when the session ends are
    /// aborted.
    pub async fn run(mut self, mut events: mpsc::Receiver<StorefrontEvent>) -> Self {
        let mut snapshots = self.catalog.watch();
        let initial = snapshots.borrow_and_update().clone();
        self.apply_snapshot(initial);

        let period = self.config.carousel_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut deliveries = JoinSet::new();
        let mut snapshots_open = true;

        loop {
            let was_enabled = self.carousel.auto_advance_enabled();
            let mut restart_timer = false;

            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    restart_timer = event.is_manual_navigation();
                    match self.handle(event) {
                        Ok(Some(handoff)) => {
                            let launcher = Arc::clone(&self.launcher);
                            deliveries.spawn(async move { deliver(launcher.as_ref(), handoff).await });
                        }
                        Ok(None) => {}
                        Err(e) => tracing::info!(error = %e, "Checkout rejected"),
                    }
                }
                _ = ticker.tick(), if was_enabled => {
                    self.carousel.tick();
                }
                changed = snapshots.changed(), if snapshots_open => {
                    if changed.is_ok() {
                        let snapshot = snapshots.borrow_and_update().clone();
                        self.apply_snapshot(snapshot);
                    } else {
                        snapshots_open = false;
                    }
                }
                Some(finished) = deliveries.join_next(), if !deliveries.is_empty() => {
                    if let Err(e) = finished {
                        tracing::warn!(error = %e, "WhatsApp handoff task failed");
                    }
                }
            }

            if restart_timer || (!was_enabled && self.carousel.auto_advance_enabled()) {
                ticker.reset();
            }
        }

        if !deliveries.is_empty() {
            tracing::debug!(pending = deliveries.len(), "Aborting pending WhatsApp handoffs");
        }
        deliveries.shutdown().await;
        self
    }
}
