//! WhatsApp checkout links from the terminal.
//!
//! Builds the same order, inquiry and contact messages the storefront sends
//! and prints the links instead of opening them.
//!
//! # Usage
//!
//! ```bash
//! # Order two of product 3 and one of product 5
//! qb-cli checkout order --item 3 --item 3 --item 5
//!
//! # "Buy now" for product 3, as a phone would see it
//! qb-cli checkout --user-agent "Mozilla/5.0 (iPhone)" inquiry 3
//!
//! qb-cli checkout contact --name Jane --email jane@example.com --message "Hi"
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_ORDER_PHONE` / `STOREFRONT_CONTACT_PHONE` - WhatsApp numbers,
//!   international format without `+`

use std::path::Path;
use std::sync::Arc;

use queens_beauty_core::ProductId;
use queens_beauty_storefront::checkout::deliver;
use queens_beauty_storefront::{
    CatalogStore, ContactForm, Handoff, Launcher, Platform, Storefront, StorefrontConfig,
    StorefrontEvent,
};

use super::{CommandError, open_backend};
use crate::backend::Backend;

/// What to send.
#[derive(Debug)]
pub enum Request {
    Order(Vec<ProductId>),
    Inquiry(ProductId),
    Contact(ContactForm),
}

/// Prints links instead of opening them. The app never takes over, so the
/// web fallback is always printed too.
struct TerminalLauncher;

impl Launcher for TerminalLauncher {
    #[allow(clippy::print_stdout)]
    fn navigate(&self, url: &str) {
        println!("Open: {url}");
    }

    #[allow(clippy::print_stdout)]
    fn open_window(&self, url: &str) {
        println!("Open in a new window: {url}");
    }

    fn navigated_away(&self) -> bool {
        false
    }
}

/// Turn a request into storefront events.
fn events(request: Request) -> Vec<StorefrontEvent> {
    match request {
        Request::Order(items) => items
            .into_iter()
            .map(StorefrontEvent::AddToCart)
            .chain(std::iter::once(StorefrontEvent::Checkout))
            .collect(),
        Request::Inquiry(id) => vec![StorefrontEvent::BuyNow(id)],
        Request::Contact(form) => vec![StorefrontEvent::Contact(form)],
    }
}

/// Run `request` through a storefront session and return its handoff.
async fn prepare(
    catalog_file: Option<&Path>,
    user_agent: &str,
    request: Request,
) -> Result<Handoff, CommandError> {
    let config = StorefrontConfig::from_env()?;
    let store = CatalogStore::new(Arc::new(open_backend(catalog_file, false).await?));
    if !matches!(request, Request::Contact(_)) {
        store.refresh().await?;
    }

    let unknown = match &request {
        Request::Order(items) => items.iter().find(|id| store.find(**id).is_none()).copied(),
        Request::Inquiry(id) => store.find(*id).is_none().then_some(*id),
        Request::Contact(_) => None,
    };
    if let Some(id) = unknown {
        return Err(CommandError::UnknownProduct(id));
    }

    let platform = Platform::from_user_agent(user_agent);
    let mut session: Storefront<Backend, TerminalLauncher> =
        Storefront::new(config, store, Arc::new(TerminalLauncher), platform);

    let mut handoff = None;
    for event in events(request) {
        handoff = session.handle(event)?.or(handoff);
    }
    tracing::debug!(items = session.cart().item_count(), ?platform, "Checkout prepared");
    handoff.ok_or(CommandError::Checkout(
        queens_beauty_storefront::CheckoutError::EmptyCart,
    ))
}

/// Print the WhatsApp links for `request`.
///
/// # Errors
///
/// Returns an error if a product is unknown, the cart is empty or the
/// contact form is incomplete.
pub async fn run(
    catalog_file: Option<&Path>,
    user_agent: &str,
    request: Request,
) -> Result<(), CommandError> {
    let handoff = prepare(catalog_file, user_agent, request).await?;
    deliver(&TerminalLauncher, handoff).await;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use queens_beauty_core::{CatalogGateway, MemoryGateway, Price, ProductDraft};
    use queens_beauty_storefront::CheckoutError;

    use super::*;

    const DESKTOP: &str = "Mozilla/5.0 (X11; Linux x86_64)";
    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";

    async fn catalog_file(dir: &Path) -> std::path::PathBuf {
        let gateway = MemoryGateway::default();
        for (name, price) in [("Rose Oil", 10), ("Shea Butter", 20)] {
            gateway
                .insert_product(&ProductDraft {
                    name: name.to_string(),
                    description: String::new(),
                    price: Price::from_shillings(price),
                    image: None,
                })
                .await
                .unwrap();
        }
        let path = dir.join("products.json");
        std::fs::write(&path, serde_json::to_string(&gateway.products()).unwrap()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_order_opens_web_whatsapp_on_desktop() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_file(dir.path()).await;
        let request = Request::Order(vec![ProductId::new(1), ProductId::new(2), ProductId::new(1)]);

        let handoff = prepare(Some(&path), DESKTOP, request).await.unwrap();
        let Handoff::NewWindow { url } = handoff else {
            panic!("expected a new window on desktop");
        };
        assert!(url.starts_with("https://web.whatsapp.com/send?phone=254714137554&text="));
        assert!(url.contains("Total%3A%20KSH%2040"));
    }

    #[tokio::test]
    async fn test_inquiry_uses_app_link_on_mobile() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_file(dir.path()).await;

        let handoff = prepare(Some(&path), IPHONE, Request::Inquiry(ProductId::new(2)))
            .await
            .unwrap();
        assert!(matches!(handoff, Handoff::AppWithFallback { .. }));
        assert!(handoff.primary_link().starts_with("whatsapp://send?phone=254714137554"));
    }

    #[tokio::test]
    async fn test_unknown_product_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_file(dir.path()).await;

        let err = prepare(Some(&path), DESKTOP, Request::Inquiry(ProductId::new(9)))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownProduct(_)));
    }

    #[tokio::test]
    async fn test_empty_order_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_file(dir.path()).await;

        let err = prepare(Some(&path), DESKTOP, Request::Order(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Checkout(CheckoutError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_incomplete_contact_form() {
        let dir = tempfile::tempdir().unwrap();
        let path = catalog_file(dir.path()).await;
        let form = ContactForm {
            name: "Jane".to_string(),
            email: "  ".to_string(),
            message: "Hi".to_string(),
        };
        let err = prepare(Some(&path), DESKTOP, Request::Contact(form))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Checkout(CheckoutError::IncompleteContactForm)
        ));
    }
}
