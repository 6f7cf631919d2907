//! The remote catalog gateway.
//!
//! The hosted database is the single source of truth for products. Engines
//! talk to it only through [`CatalogGateway`], so the storefront, the admin
//! surface and the tests can swap the Supabase client for an in-memory one.

mod memory;

use std::future::Future;

use thiserror::Error;
use tokio::sync::broadcast;

use crate::types::{Product, ProductDraft, ProductId};

pub use memory::MemoryGateway;

/// A row-level change in the products table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogChange {
    Inserted(ProductId),
    Updated(ProductId),
    Deleted(ProductId),
}

impl CatalogChange {
    /// The product the change applies to.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match self {
            Self::Inserted(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

/// An image file attached through the admin form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name as picked by the user (e.g. `serum.jpg`).
    pub file_name: String,
    /// MIME type sent with the upload.
    pub content_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Errors reported by a gateway implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The addressed row or object does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by the gateway.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// Query and mutation surface of the hosted product table.
///
/// Row ids are assigned and kept unique by the gateway. Implementations
/// publish a [`CatalogChange`] to subscribers after every confirmed
/// insert, update or delete.
pub trait CatalogGateway: Send + Sync {
    /// Fetch every product, ordered by ascending id.
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, GatewayError>> + Send;

    /// Insert a new row and return it as stored.
    fn insert_product(
        &self,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, GatewayError>> + Send;

    /// Replace the mutable fields of an existing row.
    fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> impl Future<Output = Result<Product, GatewayError>> + Send;

    /// Delete a row.
    fn delete_product(&self, id: ProductId)
    -> impl Future<Output = Result<(), GatewayError>> + Send;

    /// Store an image in object storage and return its public URL.
    fn upload_image(
        &self,
        upload: &ImageUpload,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// Subscribe to row changes.
    fn subscribe(&self) -> broadcast::Receiver<CatalogChange>;
}
