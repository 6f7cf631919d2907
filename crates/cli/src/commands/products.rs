//! Catalog management commands.
//!
//! # Usage
//!
//! ```bash
//! # List products, 20 per page
//! qb-cli products list --query serum --page 2
//!
//! # Add a product with an image file
//! qb-cli products add --name "Rose Oil" --description "Cold pressed" \
//!     --price 450 --image-file ./rose.jpg
//!
//! # Change the price of product 7
//! qb-cli products update 7 --price 500
//!
//! # Delete product 7 without prompting
//! qb-cli products delete 7 --yes
//! ```
//!
//! # Environment Variables
//!
//! - `SUPABASE_URL` / `SUPABASE_ANON_KEY` - Project endpoint and public key
//! - `ADMIN_EMAIL` / `ADMIN_PASSWORD` - Credentials for add, update and delete

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dialoguer::Confirm;
use queens_beauty_admin::{AdminConsole, AdminError, CreateOutcome, ProductForm, load_image};
use queens_beauty_core::{ImageUpload, ProductId};

use super::{CommandError, open_backend, product_line};
use crate::backend::Backend;

/// Fields given on the command line. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct FormArgs {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_file: Option<PathBuf>,
}

impl FormArgs {
    /// Overlay the given fields onto `form`.
    fn apply(self, form: &mut ProductForm) -> Option<PathBuf> {
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(price) = self.price {
            form.price = price;
        }
        if let Some(image) = self.image_url {
            form.image = image;
        }
        self.image_file
    }
}

fn admin_error(e: &AdminError) -> CommandError {
    CommandError::Admin(e.notice())
}

async fn open_console(
    catalog_file: Option<&Path>,
    admin: bool,
) -> Result<(Arc<Backend>, AdminConsole<Backend>), CommandError> {
    let backend = Arc::new(open_backend(catalog_file, admin).await?);
    let mut console = AdminConsole::new(Arc::clone(&backend));
    console.refresh().await.map_err(|e| admin_error(&e))?;
    Ok((backend, console))
}

fn attachment(path: Option<PathBuf>) -> Result<Option<ImageUpload>, CommandError> {
    Ok(path.as_deref().map(load_image).transpose()?)
}

/// Print one page of products matching `query`.
///
/// # Errors
///
/// Returns an error if the products cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(
    catalog_file: Option<&Path>,
    query: Option<String>,
    page: usize,
) -> Result<(), CommandError> {
    let (_, mut console) = open_console(catalog_file, false).await?;
    if let Some(query) = query {
        console.set_query(query);
    }
    for _ in 1..page {
        console.next_page();
    }

    let visible = console.visible();
    if visible.is_empty() {
        println!("No products found.");
    }
    for product in visible {
        println!("{}", product_line(product));
    }
    println!(
        "\nPage {} of {} ({} matching)",
        console.page(),
        console.total_pages().max(1),
        console.filtered().len()
    );
    Ok(())
}

/// Add a product, or show the existing one it duplicates.
///
/// # Errors
///
/// Returns the admin notice if validation, upload or insert fails.
#[allow(clippy::print_stdout)]
pub async fn add(catalog_file: Option<&Path>, args: FormArgs) -> Result<(), CommandError> {
    let mut form = ProductForm::default();
    let file = attachment(args.apply(&mut form))?;

    let (backend, mut console) = open_console(catalog_file, true).await?;
    let outcome = console
        .create(&form, file)
        .await
        .map_err(|e| admin_error(&e))?;
    backend.persist()?;

    if let Some(notice) = console.notice() {
        println!("{notice}");
    }
    match outcome {
        CreateOutcome::Created(product) => println!("{}", product_line(&product)),
        CreateOutcome::Duplicate(existing) => {
            println!("{}", product_line(&existing));
            println!(
                "Edit it with: qb-cli products update {} [--name ..] [--description ..] [--price ..]",
                existing.id
            );
        }
    }
    Ok(())
}

/// Update the product `id`, keeping fields that were not given.
///
/// # Errors
///
/// Returns the admin notice if the product is unknown or the save fails.
#[allow(clippy::print_stdout)]
pub async fn update(
    catalog_file: Option<&Path>,
    id: ProductId,
    args: FormArgs,
) -> Result<(), CommandError> {
    let (backend, mut console) = open_console(catalog_file, true).await?;
    let mut form = console
        .open_editor(id)
        .map_err(|e| admin_error(&e))?
        .form
        .clone();
    let file = attachment(args.apply(&mut form))?;

    let product = console
        .update(id, &form, file)
        .await
        .map_err(|e| admin_error(&e))?;
    backend.persist()?;

    if let Some(notice) = console.notice() {
        println!("{notice}");
    }
    println!("{}", product_line(&product));
    Ok(())
}

/// Delete the product `id` after confirmation.
///
/// # Errors
///
/// Returns the admin notice if the product is unknown or the delete fails.
#[allow(clippy::print_stdout)]
pub async fn delete(
    catalog_file: Option<&Path>,
    id: ProductId,
    confirmed: bool,
) -> Result<(), CommandError> {
    let (backend, mut console) = open_console(catalog_file, true).await?;
    let Some(product) = console.products().iter().find(|p| p.id == id).cloned() else {
        return Err(CommandError::UnknownProduct(id));
    };

    if !confirmed {
        let proceed = Confirm::new()
            .with_prompt(format!("Delete {}?", product_line(&product)))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    console.delete(id).await.map_err(|e| admin_error(&e))?;
    backend.persist()?;
    println!("Deleted {}", product.name);
    Ok(())
}
