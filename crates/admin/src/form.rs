//! The product form shared by the add and edit screens.

use queens_beauty_core::{Price, PriceError, Product, ProductDraft};
use thiserror::Error;

/// Validation failures, worded for the person filling in the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Please enter a product name.")]
    MissingName,
    #[error("Please enter a product description.")]
    MissingDescription,
    #[error("Please enter a price.")]
    MissingPrice,
    #[error("Price must be a non-negative number.")]
    InvalidPrice(PriceError),
}

/// Raw form fields as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    /// Image URL typed by hand. Ignored when a file is attached.
    pub image: String,
}

impl ProductForm {
    /// A form prefilled from an existing product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.as_plain_text(),
            image: product.image.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and parse the price.
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checking fields top to bottom.
    pub fn validate(&self) -> Result<ValidatedForm, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingName);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormError::MissingDescription);
        }
        let price = Price::parse(&self.price).map_err(|e| match e {
            PriceError::Empty => FormError::MissingPrice,
            other => FormError::InvalidPrice(other),
        })?;
        let image = self.image.trim();

        Ok(ValidatedForm {
            name: name.to_string(),
            description: description.to_string(),
            price,
            image: (!image.is_empty()).then(|| image.to_string()),
        })
    }
}

/// A form that passed validation, with text fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub name: String,
    pub description: String,
    pub price: Price,
    /// Typed image URL, absent when left blank.
    pub image: Option<String>,
}

impl ValidatedForm {
    /// The row to write, with the resolved image URL.
    #[must_use]
    pub fn into_draft(self, image: Option<String>) -> ProductDraft {
        ProductDraft {
            name: self.name,
            description: self.description,
            price: self.price,
            image: image.filter(|url| !url.is_empty()),
        }
    }
}
