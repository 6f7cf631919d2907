//! WhatsApp checkout.
//!
//! Orders, single-product inquiries and contact form submissions are all
//! delivered the same way: the text is rendered into a WhatsApp deep link
//! and handed to a [`Launcher`]. There is no delivery confirmation.

mod deeplink;
mod message;

use thiserror::Error;

pub use deeplink::{
    FALLBACK_DELAY, Handoff, Launcher, Platform, WebFallback, WhatsAppMessage, deliver,
};
pub use message::{ContactForm, contact_message, inquiry_message, order_message};

/// Errors raised before a message is handed off.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Your cart is empty.")]
    EmptyCart,

    /// A contact form field was left blank.
    #[error("Please fill out all fields before sending.")]
    IncompleteContactForm,
}
