//! Read-only views of the catalog as the storefront sees it.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use queens_beauty_storefront::{CatalogStore, FEATURED_LIMIT, search};

use super::{CommandError, open_backend, product_line};
use crate::backend::Backend;

async fn load(catalog_file: Option<&Path>) -> Result<CatalogStore<Backend>, CommandError> {
    let store = CatalogStore::new(Arc::new(open_backend(catalog_file, false).await?));
    store.refresh().await?;
    Ok(store)
}

/// Print every product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(catalog_file: Option<&Path>) -> Result<(), CommandError> {
    let store = load(catalog_file).await?;
    for product in store.snapshot().iter() {
        println!("{}", product_line(product));
    }
    Ok(())
}

/// Print the category grid: the newest products.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn featured(catalog_file: Option<&Path>) -> Result<(), CommandError> {
    let store = load(catalog_file).await?;
    for product in store.featured(FEATURED_LIMIT) {
        println!("{}", product_line(&product));
    }
    Ok(())
}

/// Print products whose name or description contains `query`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn find(catalog_file: Option<&Path>, query: &str) -> Result<(), CommandError> {
    let store = load(catalog_file).await?;
    let snapshot = store.snapshot();
    let results = search(&snapshot, query);
    if results.is_empty() {
        println!("No products match \"{}\".", query.trim());
    }
    for product in results {
        println!("{}", product_line(product));
    }
    Ok(())
}

/// Follow the catalog and print its size whenever it changes, until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the initial load fails.
#[allow(clippy::print_stdout)]
pub async fn watch(catalog_file: Option<&Path>, poll: Duration) -> Result<(), CommandError> {
    let store = load(catalog_file).await?;
    let mut snapshots = store.watch();
    let _sync = store.spawn_sync(Some(poll));
    let count = snapshots.borrow_and_update().len();
    println!("{count} products. Watching for changes (Ctrl-C to stop)...");

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let count = snapshots.borrow_and_update().len();
                println!("Catalog changed: {count} products");
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
