//! Command implementations.

pub mod catalog;
pub mod checkout;
pub mod products;
pub mod sitemap;

use std::path::Path;

use queens_beauty_core::{Product, ProductId};
use thiserror::Error;

use crate::backend::{Backend, BackendError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// An admin operation failed; carries the user-facing notice.
    #[error("{0}")]
    Admin(String),

    #[error(transparent)]
    Checkout(#[from] queens_beauty_storefront::CheckoutError),

    #[error("Configuration error: {0}")]
    Config(#[from] queens_beauty_storefront::ConfigError),

    #[error("Failed to load products: {0}")]
    Gateway(#[from] queens_beauty_core::GatewayError),

    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render sitemap: {0}")]
    Render(#[from] askama::Error),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Open the backend for a command.
///
/// `admin` commands sign in when talking to Supabase; a catalog file needs
/// no credentials.
async fn open_backend(catalog_file: Option<&Path>, admin: bool) -> Result<Backend, BackendError> {
    match catalog_file {
        Some(path) => Backend::from_file(path),
        None if admin => Backend::supabase_admin().await,
        None => Backend::supabase(),
    }
}

/// One-line listing of a product.
fn product_line(product: &Product) -> String {
    match product.image_url() {
        Some(image) => format!("#{} {} - {} [{image}]", product.id, product.name, product.price),
        None => format!("#{} {} - {}", product.id, product.name, product.price),
    }
}
