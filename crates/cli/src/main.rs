//! Queens Beauty CLI - Catalog management, checkout links and sitemap.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog as shoppers see it
//! qb-cli catalog list
//! qb-cli catalog search "shea"
//!
//! # Manage products (signs in with ADMIN_EMAIL / ADMIN_PASSWORD)
//! qb-cli products add --name "Rose Oil" --description "Cold pressed" --price 450
//! qb-cli products delete 7
//!
//! # Print the WhatsApp order link for a cart
//! qb-cli checkout order --item 3 --item 5
//!
//! # Generate dist/sitemap.xml
//! qb-cli sitemap
//!
//! # Work on a local JSON export instead of Supabase
//! qb-cli --catalog-file products.json products list
//! ```
//!
//! # Commands
//!
//! - `products` - List, add, update and delete products
//! - `catalog` - Storefront views: all products, featured, search, watch
//! - `checkout` - WhatsApp order, inquiry and contact links
//! - `sitemap` - Write `sitemap.xml`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use queens_beauty_core::ProductId;
use queens_beauty_storefront::ContactForm;
use queens_beauty_storefront::sitemap::DEFAULT_SITEMAP_PATH;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backend;
mod commands;

use commands::checkout::Request;
use commands::products::FormArgs;

#[derive(Parser)]
#[command(name = "qb-cli")]
#[command(author, version, about = "Queens Beauty CLI tools")]
struct Cli {
    /// Use a JSON product list instead of Supabase
    #[arg(long, global = true, env = "QB_CATALOG_FILE")]
    catalog_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Browse the catalog as the storefront shows it
    Catalog {
        #[command(subcommand)]
        view: CatalogView,
    },
    /// Build WhatsApp checkout links
    Checkout {
        /// Browser user agent deciding between app and web links
        #[arg(long, default_value = "qb-cli")]
        user_agent: String,

        #[command(subcommand)]
        request: CheckoutRequest,
    },
    /// Write sitemap.xml
    Sitemap {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_SITEMAP_PATH)]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct ProductFields {
    /// Product name
    #[arg(short, long)]
    name: Option<String>,

    /// Product description
    #[arg(short, long)]
    description: Option<String>,

    /// Price in shillings
    #[arg(short, long)]
    price: Option<String>,

    /// Image URL
    #[arg(long)]
    image_url: Option<String>,

    /// Image file to upload (replaces --image-url)
    #[arg(long)]
    image_file: Option<PathBuf>,
}

impl From<ProductFields> for FormArgs {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            image_url: fields.image_url,
            image_file: fields.image_file,
        }
    }
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, 20 per page
    List {
        /// Filter by name, description or price
        #[arg(short, long)]
        query: Option<String>,

        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Add a product
    Add {
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Update a product; omitted fields keep their value
    Update {
        /// Product id
        id: ProductId,

        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete {
        /// Product id
        id: ProductId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum CatalogView {
    /// All products
    List,
    /// The newest products
    Featured,
    /// Products whose name or description contains the query
    Search {
        query: String,
    },
    /// Print catalog changes until Ctrl-C
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 30)]
        poll_secs: u64,
    },
}

#[derive(Subcommand)]
enum CheckoutRequest {
    /// Order a cart of products
    Order {
        /// Product id; repeat to add more than one
        #[arg(short, long = "item", required = true)]
        items: Vec<ProductId>,
    },
    /// Ask about a single product
    Inquiry {
        /// Product id
        id: ProductId,
    },
    /// Send a contact form message
    Contact {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        message: String,
    },
}

impl From<CheckoutRequest> for Request {
    fn from(request: CheckoutRequest) -> Self {
        match request {
            CheckoutRequest::Order { items } => Self::Order(items),
            CheckoutRequest::Inquiry { id } => Self::Inquiry(id),
            CheckoutRequest::Contact {
                name,
                email,
                message,
            } => Self::Contact(ContactForm {
                name,
                email,
                message,
            }),
        }
    }
}

/// Initialize Sentry error tracking if `SENTRY_DSN` is set.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|dsn| !dsn.is_empty())?;
    let environment = std::env::var("SENTRY_ENVIRONMENT").ok();

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: environment.map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Log directives used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "queens_beauty_cli=info,queens_beauty_admin=info,\
    queens_beauty_storefront=info,queens_beauty_supabase=info,queens_beauty_core=info";

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog_file = cli.catalog_file.as_deref();
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List { query, page } => {
                commands::products::list(catalog_file, query, page).await?;
            }
            ProductsAction::Add { fields } => {
                commands::products::add(catalog_file, fields.into()).await?;
            }
            ProductsAction::Update { id, fields } => {
                commands::products::update(catalog_file, id, fields.into()).await?;
            }
            ProductsAction::Delete { id, yes } => {
                commands::products::delete(catalog_file, id, yes).await?;
            }
        },
        Commands::Catalog { view } => match view {
            CatalogView::List => commands::catalog::list(catalog_file).await?,
            CatalogView::Featured => commands::catalog::featured(catalog_file).await?,
            CatalogView::Search { query } => commands::catalog::find(catalog_file, &query).await?,
            CatalogView::Watch { poll_secs } => {
                let poll = Duration::from_secs(poll_secs.max(1));
                commands::catalog::watch(catalog_file, poll).await?;
            }
        },
        Commands::Checkout {
            user_agent,
            request,
        } => commands::checkout::run(catalog_file, &user_agent, request.into()).await?,
        Commands::Sitemap { output } => commands::sitemap::generate(catalog_file, &output).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_order_items() {
        let cli = Cli::try_parse_from(["qb-cli", "checkout", "order", "--item", "3", "-i", "5"])
            .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Checkout { user_agent, request } = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(user_agent, "qb-cli");
        let Request::Order(items) = Request::from(request) else {
            panic!("expected an order");
        };
        assert_eq!(items, vec![ProductId::new(3), ProductId::new(5)]);
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(Cli::try_parse_from(["qb-cli", "products", "delete", "seven"]).is_err());
    }

    #[test]
    fn test_default_log_filter_covers_every_crate() {
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in [
            "queens_beauty_cli",
            "queens_beauty_admin",
            "queens_beauty_storefront",
            "queens_beauty_supabase",
            "queens_beauty_core",
        ] {
            assert!(DEFAULT_LOG_FILTER.contains(&format!("{target}=info")));
        }
        assert!(!DEFAULT_LOG_FILTER.contains(' '));
    }
}
