//! In-process gateway backed by a `Vec<Product>`.
//!
//! Used for offline runs of the CLI (seeded from a JSON export of the
//! products table) and as the gateway in tests. Ids are assigned like an
//! identity column: one past the largest id ever seen.

use std::sync::{Mutex, MutexGuard};

use tokio::sync::broadcast;

use super::{CatalogChange, CatalogGateway, GatewayError, ImageUpload};
use crate::types::{Product, ProductDraft, ProductId};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Base of the URLs handed out for uploaded images.
pub const MEMORY_IMAGE_BASE: &str = "memory://product-images/public";

struct MemoryState {
    products: Vec<Product>,
    next_id: i64,
    uploads: Vec<String>,
    fail_next: Option<GatewayError>,
}

/// A [`CatalogGateway`] that keeps rows in memory.
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    changes: broadcast::Sender<CatalogChange>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MemoryGateway {
    /// Create a gateway holding `products`.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products.iter().map(|p| p.id.as_i64()).max().unwrap_or(0) + 1;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            state: Mutex::new(MemoryState {
                products,
                next_id,
                uploads: Vec::new(),
                fail_next: None,
            }),
            changes,
        }
    }

    /// Current rows ordered by id.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().map(|state| sorted(&state.products)).unwrap_or_default()
    }

    /// URLs of every image uploaded so far.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        self.lock().map(|state| state.uploads.clone()).unwrap_or_default()
    }

    /// Make the next gateway call fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        if let Ok(mut state) = self.lock() {
            state.fail_next = Some(error);
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        self.state
            .lock()
            .map_err(|_| GatewayError::Transport("memory gateway lock poisoned".to_string()))
    }

    /// Lock the state, consuming an injected failure if one is pending.
    fn begin(&self) -> Result<MutexGuard<'_, MemoryState>, GatewayError> {
        let mut state = self.lock()?;
        match state.fail_next.take() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    fn publish(&self, change: CatalogChange) {
        let _ = self.changes.send(change);
    }
}

fn sorted(products: &[Product]) -> Vec<Product> {
    let mut rows = products.to_vec();
    rows.sort_by_key(|p| p.id);
    rows
}

impl CatalogGateway for MemoryGateway {
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        let state = self.begin()?;
        Ok(sorted(&state.products))
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        let product = {
            let mut state = self.begin()?;
            let id = ProductId::new(state.next_id);
            state.next_id += 1;
            let product = draft.clone().into_product(id);
            state.products.push(product.clone());
            product
        };
        self.publish(CatalogChange::Inserted(product.id));
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError> {
        let product = {
            let mut state = self.begin()?;
            let row = state
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| GatewayError::NotFound(format!("product {id}")))?;
            *row = draft.clone().into_product(id);
            row.clone()
        };
        self.publish(CatalogChange::Updated(id));
        Ok(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        let removed = {
            let mut state = self.begin()?;
            let before = state.products.len();
            state.products.retain(|p| p.id != id);
            state.products.len() < before
        };
        // Deleting a missing row succeeds silently, as PostgREST does
        if removed {
            self.publish(CatalogChange::Deleted(id));
        }
        Ok(())
    }

    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError> {
        let mut state = self.begin()?;
        let url = format!(
            "{MEMORY_IMAGE_BASE}/{}_{}",
            state.uploads.len() + 1,
            upload.file_name
        );
        state.uploads.push(url.clone());
        Ok(url)
    }

    fn subscribe(&self) -> broadcast::Receiver<CatalogChange> {
        self.changes.subscribe()
    }
}
