//! Sitemap generation for the static build.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Public site URL used for every `<loc>`

use std::path::Path;
use std::sync::Arc;

use queens_beauty_storefront::sitemap::{build_sitemap, write_sitemap};
use queens_beauty_storefront::{CatalogStore, StorefrontConfig};

use super::{CommandError, open_backend};

/// Write `sitemap.xml` for the current catalog to `output`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or the file cannot be
/// written.
pub async fn generate(catalog_file: Option<&Path>, output: &Path) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    let store = CatalogStore::new(Arc::new(open_backend(catalog_file, false).await?));
    let count = store.refresh().await?;

    let today = chrono::Local::now().date_naive();
    let xml = build_sitemap(&config.base_url, &store.snapshot(), today)?;
    write_sitemap(output, &xml)?;
    tracing::info!(products = count, "Sitemap generated");
    Ok(())
}
