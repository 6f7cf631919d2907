//! The admin product console.
//!
//! Holds the loaded product list, the search box, the pager, the open edit
//! session and the last notice. Every mutation goes to the gateway first;
//! the local list is reloaded only after the gateway confirms.

use std::sync::Arc;

use queens_beauty_core::{CatalogGateway, GatewayError, ImageUpload, Product, ProductId};
use tracing::instrument;

use crate::duplicate::find_duplicate;
use crate::error::{AdminAction, AdminError};
use crate::form::ProductForm;
use crate::images::resolve_image;
use crate::pagination::{Pager, filter_products, total_pages};

/// Shown after a successful insert.
pub const ADDED_NOTICE: &str = "Product added!";
/// Shown after a successful update.
pub const UPDATED_NOTICE: &str = "Product updated!";
/// Shown when an insert is blocked as a duplicate.
pub const DUPLICATE_NOTICE: &str = "This product already exists! Edit it below.";

/// The product being edited and its form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub product_id: ProductId,
    pub form: ProductForm,
}

/// Result of [`AdminConsole::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The new row as stored.
    Created(Product),
    /// Nothing was written; this existing row is now open for editing.
    Duplicate(Product),
}

/// Admin state over a catalog gateway.
pub struct AdminConsole<G> {
    gateway: Arc<G>,
    products: Vec<Product>,
    query: String,
    pager: Pager,
    editing: Option<EditSession>,
    notice: Option<String>,
}

impl<G: CatalogGateway> AdminConsole<G> {
    /// An empty console. Call [`refresh`](Self::refresh) to load products.
    #[must_use]
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            products: Vec::new(),
            query: String::new(),
            pager: Pager::new(),
            editing: None,
            notice: None,
        }
    }

    /// All loaded products, ordered by id.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products matching the search box.
    #[must_use]
    pub fn filtered(&self) -> Vec<&Product> {
        filter_products(&self.products, &self.query)
    }

    /// The current page of [`filtered`](Self::filtered).
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.pager.page()
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len())
    }

    pub fn next_page(&mut self) {
        let len = self.filtered().len();
        self.pager.next(len);
    }

    pub fn previous_page(&mut self) {
        self.pager.back();
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub const fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// The last notice for the admin.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Load the product list.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Gateway`] if the fetch fails. The loaded list
    /// is left as it was.
    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        let result = self.reload().await;
        self.settle(result)
    }

    /// Open the edit form for a loaded product.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UnknownProduct`] if it is not loaded.
    pub fn open_editor(&mut self, id: ProductId) -> Result<&EditSession, AdminError> {
        let product = self
            .products
            .iter()
            .find(|p| p.id == id)
            .ok_or(AdminError::UnknownProduct(id))?;
        Ok(self.editing.insert(EditSession {
            product_id: id,
            form: ProductForm::from_product(product),
        }))
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    /// Add a product unless it duplicates a loaded one.
    ///
    /// An attached `file` is uploaded and replaces the typed image URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or a gateway call fails.
    #[instrument(skip(self, form, file), fields(name = %form.name))]
    pub async fn create(
        &mut self,
        form: &ProductForm,
        file: Option<ImageUpload>,
    ) -> Result<CreateOutcome, AdminError> {
        let result = self.try_create(form, file.as_ref()).await;
        let outcome = self.settle(result)?;
        if let CreateOutcome::Duplicate(existing) = &outcome {
            tracing::info!(id = %existing.id, "Duplicate product, opening editor");
            self.editing = Some(EditSession {
                product_id: existing.id,
                form: ProductForm::from_product(existing),
            });
            self.notice = Some(DUPLICATE_NOTICE.to_string());
        }
        Ok(outcome)
    }

    async fn try_create(
        &mut self,
        form: &ProductForm,
        file: Option<&ImageUpload>,
    ) -> Result<CreateOutcome, AdminError> {
        let valid = form.validate()?;
        let file_name = file.map(|upload| upload.file_name.as_str());
        if let Some(existing) = find_duplicate(&self.products, &valid, file_name) {
            return Ok(CreateOutcome::Duplicate(existing.clone()));
        }

        let image = resolve_image(self.gateway.as_ref(), valid.image.clone(), file)
            .await
            .map_err(AdminError::gateway(AdminAction::Upload))?;
        let product = self
            .gateway
            .insert_product(&valid.into_draft(image))
            .await
            .map_err(AdminError::gateway(AdminAction::Add))?;
        tracing::info!(id = %product.id, "Product added");

        self.reload_after_success().await;
        self.notice = Some(ADDED_NOTICE.to_string());
        Ok(CreateOutcome::Created(product))
    }

    /// Save the product `id` from `form`.
    ///
    /// An attached `file` is uploaded and replaces the typed image URL.
    /// Closes the editor on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is invalid or a gateway call fails.
    #[instrument(skip(self, form, file))]
    pub async fn update(
        &mut self,
        id: ProductId,
        form: &ProductForm,
        file: Option<ImageUpload>,
    ) -> Result<Product, AdminError> {
        let result = self.try_update(id, form, file.as_ref()).await;
        self.settle(result)
    }

    async fn try_update(
        &mut self,
        id: ProductId,
        form: &ProductForm,
        file: Option<&ImageUpload>,
    ) -> Result<Product, AdminError> {
        let valid = form.validate()?;
        let image = resolve_image(self.gateway.as_ref(), valid.image.clone(), file)
            .await
            .map_err(AdminError::gateway(AdminAction::Upload))?;
        let product = self
            .gateway
            .update_product(id, &valid.into_draft(image))
            .await
            .map_err(AdminError::gateway(AdminAction::Update))?;
        tracing::info!(%id, "Product updated");

        self.reload_after_success().await;
        if self.editing.as_ref().is_some_and(|session| session.product_id == id) {
            self.editing = None;
        }
        self.notice = Some(UPDATED_NOTICE.to_string());
        Ok(product)
    }

    /// Delete the product `id`.
    ///
    /// Steps back a page if the current page would be left empty.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Gateway`] if the delete fails.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: ProductId) -> Result<(), AdminError> {
        let result = self.try_delete(id).await;
        self.settle(result)
    }

    async fn try_delete(&mut self, id: ProductId) -> Result<(), AdminError> {
        self.gateway
            .delete_product(id)
            .await
            .map_err(AdminError::gateway(AdminAction::Delete))?;
        tracing::info!(%id, "Product deleted");

        self.pager.after_delete(self.products.len());
        self.reload_after_success().await;
        if self.editing.as_ref().is_some_and(|session| session.product_id == id) {
            self.editing = None;
        }
        self.notice = None;
        Ok(())
    }

    async fn reload(&mut self) -> Result<(), AdminError> {
        self.products = self
            .gateway
            .list_products()
            .await
            .map_err(AdminError::gateway(AdminAction::Load))?;
        Ok(())
    }

    /// Reload after a confirmed mutation. A failure here does not undo the
    /// mutation, so it is only logged.
    async fn reload_after_success(&mut self) {
        if let Err(e) = self.reload().await {
            e.report();
        }
    }

    /// Record the notice for a failed operation.
    fn settle<T>(&mut self, result: Result<T, AdminError>) -> Result<T, AdminError> {
        if let Err(e) = &result {
            e.report();
            self.notice = Some(e.notice());
        }
        result
    }
}

/// Whether `err` came from a rejected credential.
#[must_use]
pub const fn is_auth_failure(err: &AdminError) -> bool {
    matches!(
        err,
        AdminError::Gateway {
            source: GatewayError::Unauthorized(_),
            ..
        }
    )
}
