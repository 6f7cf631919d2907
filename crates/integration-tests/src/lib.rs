//! Integration tests for Queens Beauty.
//!
//! The storefront and the admin console run against one shared
//! [`MemoryGateway`], the way both sites share the hosted products table.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p queens-beauty-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_sync` - Admin writes reaching storefront sessions
//! - `shopping` - Cart, search and checkout flows
//! - `admin_flows` - Duplicate detection, paging and failure notices
//! - `sync_properties` - Snapshot consistency under random admin edits

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use queens_beauty_admin::{AdminConsole, ProductForm};
use queens_beauty_core::{MemoryGateway, Price, Product, ProductDraft, ProductId};
use queens_beauty_storefront::{
    CatalogStore, Launcher, Platform, Snapshot, Storefront, StorefrontConfig,
};
use tokio::sync::watch;

/// A product with a generated description.
#[must_use]
pub fn product(id: i64, name: &str, price: u32) -> Product {
    ProductDraft {
        name: name.to_string(),
        description: format!("{name} description"),
        price: Price::from_shillings(price),
        image: None,
    }
    .into_product(ProductId::new(id))
}

/// A gateway holding `(name, price)` rows with ids 1, 2, ...
#[must_use]
pub fn seeded_gateway(rows: &[(&str, u32)]) -> Arc<MemoryGateway> {
    let products = rows
        .iter()
        .zip(1..)
        .map(|((name, price), id)| product(id, name, *price))
        .collect();
    Arc::new(MemoryGateway::new(products))
}

/// The admin form for a new product.
#[must_use]
pub fn form(name: &str, description: &str, price: &str) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        description: description.to_string(),
        price: price.to_string(),
        image: String::new(),
    }
}

/// A loaded admin console over `gateway`.
///
/// # Panics
///
/// Panics if the initial load fails.
pub async fn admin(gateway: &Arc<MemoryGateway>) -> AdminConsole<MemoryGateway> {
    let mut console = AdminConsole::new(Arc::clone(gateway));
    console.refresh().await.expect("initial admin load");
    console
}

/// A refreshed catalog store over `gateway`.
///
/// # Panics
///
/// Panics if the initial load fails.
pub async fn store(gateway: &Arc<MemoryGateway>) -> CatalogStore<MemoryGateway> {
    let store = CatalogStore::new(Arc::clone(gateway));
    store.refresh().await.expect("initial catalog load");
    store
}

/// A desktop storefront session with default configuration.
#[must_use]
pub fn session(
    store: CatalogStore<MemoryGateway>,
    launcher: &Arc<RecordingLauncher>,
) -> Storefront<MemoryGateway, RecordingLauncher> {
    Storefront::new(
        StorefrontConfig::default(),
        store,
        Arc::clone(launcher),
        Platform::Desktop,
    )
}

/// Wait until the snapshot satisfies `done`, or give up after `limit`.
pub async fn wait_for(
    snapshots: &mut watch::Receiver<Snapshot>,
    limit: Duration,
    done: impl Fn(&[Product]) -> bool,
) -> bool {
    tokio::time::timeout(limit, snapshots.wait_for(|snapshot| done(snapshot)))
        .await
        .is_ok_and(|result| result.is_ok())
}

/// Records every link it is asked to open.
#[derive(Debug, Default)]
pub struct RecordingLauncher {
    opened: Mutex<Vec<String>>,
}

impl RecordingLauncher {
    /// Links opened so far, in order.
    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, url: &str) {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }
}

impl Launcher for RecordingLauncher {
    fn navigate(&self, url: &str) {
        self.record(url);
    }

    fn open_window(&self, url: &str) {
        self.record(url);
    }

    fn navigated_away(&self) -> bool {
        false
    }
}
