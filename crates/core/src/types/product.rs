//! Product rows as stored in the hosted `products` table.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product.
///
/// Owned by the gateway; everything else holds read-only copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Gateway-assigned identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Unit price.
    pub price: Price,
    /// Public image URL, if any.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// The image URL, treating an empty string as absent.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|url| !url.is_empty())
    }

    /// The mutable fields of this product, e.g. to prefill an edit form.
    #[must_use]
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// The payload of an insert or update: a product without its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image: Option<String>,
}

impl ProductDraft {
    /// Attach an identifier, producing the row the gateway would return.
    #[must_use]
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            image: self.image,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
