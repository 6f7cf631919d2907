//! Where the CLI reads and writes products.
//!
//! Online the CLI talks to Supabase. With `--catalog-file` it works on a
//! JSON export of the products table instead and writes changes back to
//! that file.

use std::path::{Path, PathBuf};

use queens_beauty_core::{
    CatalogChange, CatalogGateway, GatewayError, ImageUpload, MemoryGateway, Product,
    ProductDraft, ProductId,
};
use queens_beauty_supabase::{SupabaseClient, SupabaseConfig};
use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors that can occur while setting up a backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Configuration error: {0}")]
    Config(#[from] queens_beauty_supabase::ConfigError),

    #[error("Sign-in failed: {0}")]
    SignIn(#[from] queens_beauty_supabase::SupabaseError),

    #[error("Catalog file {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {path} is not a product list: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The gateway behind every command.
pub enum Backend {
    Supabase(SupabaseClient),
    File {
        gateway: MemoryGateway,
        path: PathBuf,
    },
}

impl Backend {
    /// Anonymous Supabase access configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the Supabase configuration is missing or invalid.
    pub fn supabase() -> Result<Self, BackendError> {
        Ok(Self::Supabase(SupabaseClient::new(SupabaseConfig::from_env()?)))
    }

    /// Supabase access signed in with `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are missing or rejected.
    pub async fn supabase_admin() -> Result<Self, BackendError> {
        let client = SupabaseClient::new(SupabaseConfig::from_env()?);
        let email = std::env::var("ADMIN_EMAIL")
            .map_err(|_| BackendError::MissingEnvVar("ADMIN_EMAIL"))?;
        let password = std::env::var("ADMIN_PASSWORD")
            .map(SecretString::from)
            .map_err(|_| BackendError::MissingEnvVar("ADMIN_PASSWORD"))?;

        let session = client.sign_in(&email, &password).await?;
        Ok(Self::Supabase(client.authenticated(&session)))
    }

    /// Products loaded from a JSON file. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, BackendError> {
        let products: Vec<Product> = match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).map_err(|source| BackendError::Format {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(BackendError::File {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        tracing::debug!(path = %path.display(), count = products.len(), "Loaded catalog file");
        Ok(Self::File {
            gateway: MemoryGateway::new(products),
            path: path.to_path_buf(),
        })
    }

    /// Write file-backed changes back to disk. Does nothing online.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn persist(&self) -> Result<(), BackendError> {
        let Self::File { gateway, path } = self else {
            return Ok(());
        };
        let file_error = |source| BackendError::File {
            path: path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(&gateway.products()).map_err(|source| {
            BackendError::Format {
                path: path.clone(),
                source,
            }
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(file_error)?;
        }
        std::fs::write(path, json).map_err(file_error)?;
        tracing::debug!(path = %path.display(), "Saved catalog file");
        Ok(())
    }
}

impl CatalogGateway for Backend {
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        match self {
            Self::Supabase(client) => client.list_products().await,
            Self::File { gateway, .. } => gateway.list_products().await,
        }
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        match self {
            Self::Supabase(client) => client.insert_product(draft).await,
            Self::File { gateway, .. } => gateway.insert_product(draft).await,
        }
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError> {
        match self {
            Self::Supabase(client) => client.update_product(id, draft).await,
            Self::File { gateway, .. } => gateway.update_product(id, draft).await,
        }
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        match self {
            Self::Supabase(client) => client.delete_product(id).await,
            Self::File { gateway, .. } => gateway.delete_product(id).await,
        }
    }

    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError> {
        match self {
            Self::Supabase(client) => client.upload_image(upload).await,
            Self::File { gateway, .. } => gateway.upload_image(upload).await,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<CatalogChange> {
        match self {
            Self::Supabase(client) => client.subscribe(),
            Self::File { gateway, .. } => gateway.subscribe(),
        }
    }
}
