//! Queens Beauty storefront engines.
//!
//! Everything a shopper's session needs, independent of how it is rendered:
//!
//! - [`catalog`] - Cached catalog snapshot, kept in sync with the gateway
//! - [`carousel`] - Rotating product window with jump and auto-advance
//! - [`search`] - Name/description search and the result panel
//! - [`cart`] - Session cart
//! - [`checkout`] - WhatsApp order, inquiry and contact messages
//! - [`sitemap`] - `sitemap.xml` generation
//! - [`controller`] - The session owner and its event loop
//!
//! # Example
//!
//! ```rust,ignore
//! use queens_beauty_storefront::{CatalogStore, Storefront, StorefrontConfig, StorefrontEvent};
//!
//! let catalog = CatalogStore::new(gateway);
//! catalog.refresh().await?;
//! let _sync = catalog.spawn_sync(config.catalog_poll_interval);
//!
//! let (events, rx) = tokio::sync::mpsc::channel(32);
//! let session = tokio::spawn(Storefront::new(config, catalog, launcher, platform).run(rx));
//! events.send(StorefrontEvent::AddToCart(product_id)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod search;
pub mod sitemap;

pub use carousel::{ACTIVE_OFFSET, Carousel};
pub use cart::{Cart, CartItem};
pub use catalog::{CatalogStore, FEATURED_LIMIT, Snapshot, SyncHandle};
pub use checkout::{CheckoutError, ContactForm, Handoff, Launcher, Platform, WhatsAppMessage};
pub use config::{ConfigError, StorefrontConfig};
pub use controller::{Storefront, StorefrontEvent};
pub use search::{SearchPanel, search};
