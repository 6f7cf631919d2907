//! Message text for each kind of checkout.

use std::fmt::Write as _;

use queens_beauty_core::{CURRENCY_LABEL, Product};

use super::CheckoutError;
use crate::cart::Cart;

/// "Buy now" text for a single product.
#[must_use]
pub fn inquiry_message(product: &Product) -> String {
    format!(
        "Hello! I'm interested in {} - {CURRENCY_LABEL} {}",
        product.name,
        product.price.as_plain_text()
    )
}

/// Order text listing every cart line and the grand total.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no items.
pub fn order_message(cart: &Cart) -> Result<String, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut text = String::from("Hello! I'd like to order:\n");
    for (n, item) in cart.items().iter().enumerate() {
        // Writing to a String cannot fail
        let _ = write!(
            text,
            "\n{}. {} x{} - {}",
            n + 1,
            item.product().name,
            item.quantity(),
            item.subtotal()
        );
    }
    let _ = write!(text, "\n\nTotal: {}", cart.total());
    Ok(text)
}

/// Fields of the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// The form with every field trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteContactForm`] if any field is blank.
    pub fn validate(&self) -> Result<Self, CheckoutError> {
        let form = Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        };
        if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
            return Err(CheckoutError::IncompleteContactForm);
        }
        Ok(form)
    }
}

/// Contact form text.
///
/// # Errors
///
/// Returns [`CheckoutError::IncompleteContactForm`] if any field is blank.
pub fn contact_message(form: &ContactForm) -> Result<String, CheckoutError> {
    let form = form.validate()?;
    Ok(format!(
        "*New message from QueensBeauty Contact Form*\n\n👤 Name: {}\n📧 Email: {}\n💬 Message: {}",
        form.name, form.email, form.message
    ))
}
