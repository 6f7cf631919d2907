//! Unified error handling for admin.

use std::fmt;

use queens_beauty_core::{GatewayError, ProductId};
use thiserror::Error;

use crate::form::FormError;

/// The gateway operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Load,
    Add,
    Update,
    Delete,
    Upload,
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load products",
            Self::Add => "add product",
            Self::Update => "update product",
            Self::Delete => "delete product",
            Self::Upload => "upload image",
        })
    }
}

/// Errors from admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// The form failed validation.
    #[error("Invalid product: {0}")]
    Invalid(#[from] FormError),

    /// A gateway call failed.
    #[error("Failed to {action}: {source}")]
    Gateway {
        action: AdminAction,
        #[source]
        source: GatewayError,
    },

    /// The product is not in the loaded list.
    #[error("Product {0} not found")]
    UnknownProduct(ProductId),
}

impl AdminError {
    pub(crate) fn gateway(action: AdminAction) -> impl FnOnce(GatewayError) -> Self {
        move |source| Self::Gateway { action, source }
    }

    /// The message shown to the admin. Never includes gateway details.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Gateway { action, source } => match (action, source) {
                (_, GatewayError::Unauthorized(_)) => {
                    "You are not signed in or your session has expired.".to_string()
                }
                (AdminAction::Load, _) => "Failed to load products".to_string(),
                (AdminAction::Add, _) => "Failed to add product".to_string(),
                (AdminAction::Update, _) => "Failed to update product".to_string(),
                (AdminAction::Delete, _) => "Failed to delete product".to_string(),
                (AdminAction::Upload, _) => "Image upload failed".to_string(),
            },
            Self::UnknownProduct(_) => "Product not found".to_string(),
        }
    }

    /// Log the error, reporting gateway failures to Sentry.
    pub(crate) fn report(&self) {
        if matches!(self, Self::Gateway { .. }) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin operation failed"
            );
        } else {
            tracing::info!(error = %self, "Admin operation rejected");
        }
    }
}
