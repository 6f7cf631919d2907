//! Duplicate detection for new products.
//!
//! A new product duplicates an existing row when name, description and
//! price all match and the image matches too. Text comparison trims and
//! ignores case; price comparison is numeric.

use queens_beauty_core::Product;

use crate::form::ValidatedForm;

/// The first existing product the form duplicates.
///
/// `file_name` is the name of an attached image file. It matches a stored
/// image whose last path segment is exactly that name, and the typed image
/// URL is then ignored since the upload replaces it. Without a file, a typed
/// URL matches only an identical stored URL. A product with no image on
/// either side never matches.
#[must_use]
pub fn find_duplicate<'a>(
    products: &'a [Product],
    form: &ValidatedForm,
    file_name: Option<&str>,
) -> Option<&'a Product> {
    let name = form.name.trim().to_lowercase();
    let description = form.description.trim().to_lowercase();

    products.iter().find(|p| {
        p.name.trim().to_lowercase() == name
            && p.description.trim().to_lowercase() == description
            && p.price == form.price
            && image_matches(p.image.as_deref().unwrap_or(""), form.image.as_deref(), file_name)
    })
}

fn image_matches(existing: &str, typed: Option<&str>, file_name: Option<&str>) -> bool {
    match file_name {
        Some(name) => !name.is_empty() && existing.rsplit('/').next() == Some(name),
        None => typed.is_some_and(|url| !url.is_empty() && url == existing),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use queens_beauty_core::{Price, ProductDraft, ProductId};

    use super::*;

    const IMAGE: &str =
        "https://abcd.supabase.co/storage/v1/object/public/product-images/public/1700000000000_rose.jpg";

    fn existing() -> Vec<Product> {
        vec![
            ProductDraft {
                name: "Rose Oil".to_string(),
                description: "Cold pressed".to_string(),
                price: Price::parse("450.00").unwrap(),
                image: Some(IMAGE.to_string()),
            }
            .into_product(ProductId::new(1)),
            ProductDraft {
                name: "Lip Gloss".to_string(),
                description: "Shimmer".to_string(),
                price: Price::from_shillings(300),
                image: None,
            }
            .into_product(ProductId::new(2)),
        ]
    }

    fn form(name: &str, description: &str, price: &str, image: Option<&str>) -> ValidatedForm {
        ValidatedForm {
            name: name.to_string(),
            description: description.to_string(),
            price: Price::parse(price).unwrap(),
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_typed_url_duplicate() {
        let products = existing();
        let found = find_duplicate(&products, &form("ROSE OIL", "cold pressed", "450", Some(IMAGE)), None);
        assert_eq!(found.unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_attached_file_name_duplicate() {
        let products = existing();
        let found = find_duplicate(
            &products,
            &form("Rose Oil", "Cold pressed", "450", None),
            Some("1700000000000_rose.jpg"),
        );
        assert_eq!(found.unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_different_price_is_not_duplicate() {
        let products = existing();
        assert!(find_duplicate(&products, &form("Rose Oil", "Cold pressed", "451", Some(IMAGE)), None).is_none());
    }

    #[test]
    fn test_different_image_is_not_duplicate() {
        let products = existing();
        assert!(find_duplicate(&products, &form("Rose Oil", "Cold pressed", "450", None), Some("rose.jpg")).is_none());
        assert!(find_duplicate(&products, &form("Rose Oil", "Cold pressed", "450", None), None).is_none());
    }

    #[test]
    fn test_attached_file_overrides_typed_url() {
        let products = existing();
        let typed = form("Rose Oil", "Cold pressed", "450", Some(IMAGE));
        assert!(find_duplicate(&products, &typed, Some("different.png")).is_none());
        let found = find_duplicate(&products, &typed, Some("1700000000000_rose.jpg"));
        assert_eq!(found.unwrap().id, ProductId::new(1));
    }

    #[test]
    fn test_missing_images_never_match() {
        let products = existing();
        assert!(find_duplicate(&products, &form("Lip Gloss", "Shimmer", "300", None), None).is_none());
    }
}
