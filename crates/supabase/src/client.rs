//! Supabase client implementation.
//!
//! Uses PostgREST for the product table, the Storage API for images and
//! GoTrue for admin sign-in, all over `reqwest`.

use std::sync::Arc;

use chrono::Utc;
use queens_beauty_core::{
    CatalogChange, CatalogGateway, GatewayError, ImageUpload, Product, ProductDraft, ProductId,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::instrument;
use url::Url;

use crate::config::{SupabaseConfig, anon_key};
use crate::error::{SupabaseError, api_error};

/// Capacity of the change notification channel.
const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Folder inside the image bucket that is publicly readable.
const PUBLIC_IMAGE_FOLDER: &str = "public";

// =============================================================================
// SupabaseClient
// =============================================================================

/// Client for a Supabase project.
///
/// Cheap to clone. Clones and [`authenticated`](Self::authenticated) copies
/// share one change channel, so a storefront subscribed through the anon
/// client sees mutations made through an admin client.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    http: reqwest::Client,
    config: SupabaseConfig,
    bearer: SecretString,
    changes: broadcast::Sender<CatalogChange>,
}

/// A signed-in admin session.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct AuthSession {
    /// Email the session belongs to
    pub email: String,
    /// Bearer token for row-level-security protected mutations
    pub access_token: SecretString,
    /// Seconds until the token expires
    pub expires_in: u64,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    user: Option<TokenUser>,
}

#[derive(Deserialize)]
struct TokenUser {
    email: Option<String>,
}

impl SupabaseClient {
    /// Create an anonymous client; the anon key doubles as the bearer token.
    #[must_use]
    pub fn new(config: SupabaseConfig) -> Self {
        let bearer = config.anon_key.clone();
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);

        Self {
            inner: Arc::new(SupabaseClientInner {
                http: reqwest::Client::new(),
                config,
                bearer,
                changes,
            }),
        }
    }

    /// A copy of this client that sends the session's access token as bearer.
    #[must_use]
    pub fn authenticated(&self, session: &AuthSession) -> Self {
        Self {
            inner: Arc::new(SupabaseClientInner {
                http: self.inner.http.clone(),
                config: self.inner.config.clone(),
                bearer: session.access_token.clone(),
                changes: self.inner.changes.clone(),
            }),
        }
    }

    /// Get a reference to the client configuration.
    #[must_use]
    pub fn config(&self) -> &SupabaseConfig {
        &self.inner.config
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::Unauthorized` for rejected credentials, or
    /// another variant if the request fails.
    #[instrument(skip(self, password))]
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<AuthSession, SupabaseError> {
        let mut url = self.endpoint(&["auth", "v1", "token"])?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let request = self.inner.http.post(url).json(&PasswordGrant {
            email,
            password: password.expose_secret(),
        });

        let body = match self.send(request).await {
            Ok(body) => body,
            // GoTrue answers 400 invalid_grant for a wrong password
            Err(SupabaseError::Api {
                status: 400,
                message,
            }) => return Err(SupabaseError::Unauthorized(message)),
            Err(e) => return Err(e),
        };

        let token: TokenResponse = serde_json::from_str(&body)?;
        tracing::info!(email, "Admin signed in");

        Ok(AuthSession {
            email: token
                .user
                .and_then(|u| u.email)
                .unwrap_or_else(|| email.to_string()),
            access_token: SecretString::from(token.access_token),
            expires_in: token.expires_in,
        })
    }

    /// Fetch all products ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, SupabaseError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("order", "id.asc");

        let body = self.send(self.inner.http.get(url)).await?;
        let products: Vec<Product> = serde_json::from_str(&body).inspect_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse product list"
            );
        })?;

        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Insert a product row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the row is not echoed back.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, SupabaseError> {
        let request = self
            .inner
            .http
            .post(self.table_url()?)
            .header("Prefer", "return=representation")
            .json(&[draft]);

        let product = self.single_row(request, "inserted product").await?;
        self.publish(CatalogChange::Inserted(product.id));
        tracing::info!(id = %product.id, "Product inserted");
        Ok(product)
    }

    /// Update a product row.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::NotFound` if no row has this id.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn edit_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, SupabaseError> {
        let request = self
            .inner
            .http
            .patch(self.row_url(id)?)
            .header("Prefer", "return=representation")
            .json(draft);

        let product = self.single_row(request, &format!("product {id}")).await?;
        self.publish(CatalogChange::Updated(id));
        tracing::info!(%id, "Product updated");
        Ok(product)
    }

    /// Delete a product row.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, id: ProductId) -> Result<(), SupabaseError> {
        self.send(self.inner.http.delete(self.row_url(id)?)).await?;
        self.publish(CatalogChange::Deleted(id));
        tracing::info!(%id, "Product deleted");
        Ok(())
    }

    /// Upload an image under `public/<millis>_<file name>` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, len = upload.bytes.len()))]
    pub async fn store_image(&self, upload: &ImageUpload) -> Result<String, SupabaseError> {
        let object = object_name(&upload.file_name, Utc::now().timestamp_millis());
        let bucket = self.inner.config.image_bucket.as_str();

        let request = self
            .inner
            .http
            .post(self.endpoint(&["storage", "v1", "object", bucket, PUBLIC_IMAGE_FOLDER, object.as_str()])?)
            .header("Content-Type", &upload.content_type)
            .body(upload.bytes.clone());
        self.send(request).await?;

        let public_url = self.endpoint(&[
            "storage",
            "v1",
            "object",
            "public",
            bucket,
            PUBLIC_IMAGE_FOLDER,
            object.as_str(),
        ])?;
        tracing::info!(url = %public_url, "Image uploaded");
        Ok(public_url.to_string())
    }

    // -------------------------------------------------------------------------
    // Request plumbing
    // -------------------------------------------------------------------------

    /// Send a request with the project headers and return the body text.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, SupabaseError> {
        let response = request
            .header("apikey", anon_key(&self.inner.config))
            .bearer_auth(self.inner.bearer.expose_secret())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Supabase returned non-success status"
            );
            return Err(api_error(status, &body));
        }

        Ok(body)
    }

    /// Send a `return=representation` request and take the single echoed row.
    async fn single_row(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<Product, SupabaseError> {
        let body = self.send(request).await?;
        let rows: Vec<Product> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SupabaseError::NotFound(what.to_string()))
    }

    fn publish(&self, change: CatalogChange) {
        // No subscribers is fine
        let _ = self.inner.changes.send(change);
    }

    /// Build a URL below the project base from raw path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SupabaseError> {
        let mut url = self.inner.config.url.clone();
        url.path_segments_mut()
            .map_err(|()| SupabaseError::InvalidUrl(self.inner.config.url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self) -> Result<Url, SupabaseError> {
        self.endpoint(&["rest", "v1", self.inner.config.products_table.as_str()])
    }

    fn row_url(&self, id: ProductId) -> Result<Url, SupabaseError> {
        let mut url = self.table_url()?;
        url.query_pairs_mut().append_pair("id", &format!("eq.{id}"));
        Ok(url)
    }
}

/// Object name for an uploaded file: `<millis>_<file name>`.
///
/// Only the last path component of `file_name` is kept.
fn object_name(file_name: &str, millis: i64) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim();
    format!("{millis}_{base}")
}

// =============================================================================
// CatalogGateway
// =============================================================================

impl CatalogGateway for SupabaseClient {
    async fn list_products(&self) -> Result<Vec<Product>, GatewayError> {
        Ok(self.fetch_products().await?)
    }

    async fn insert_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        Ok(self.create_product(draft).await?)
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError> {
        Ok(self.edit_product(id, draft).await?)
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), GatewayError> {
        Ok(self.remove_product(id).await?)
    }

    async fn upload_image(&self, upload: &ImageUpload) -> Result<String, GatewayError> {
        Ok(self.store_image(upload).await?)
    }

    fn subscribe(&self) -> broadcast::Receiver<CatalogChange> {
        self.inner.changes.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> SupabaseClient {
        SupabaseClient::new(
            SupabaseConfig::new(base, SecretString::from("anon-key-for-tests")).unwrap(),
        )
    }

    #[test]
    fn test_table_url() {
        let client = client("https://abcd.supabase.co");
        assert_eq!(
            client.table_url().unwrap().as_str(),
            "https://abcd.supabase.co/rest/v1/products"
        );
    }

    #[test]
    fn test_row_url_filters_by_id() {
        let client = client("https://abcd.supabase.co");
        assert_eq!(
            client.row_url(ProductId::new(12)).unwrap().as_str(),
            "https://abcd.supabase.co/rest/v1/products?id=eq.12"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes() {
        let client = client("http://localhost:54321/proxy");
        let url = client
            .endpoint(&["storage", "v1", "object", "product-images", "public", "1_my photo.jpg"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:54321/proxy/storage/v1/object/product-images/public/1_my%20photo.jpg"
        );
    }

    #[test]
    fn test_object_name() {
        assert_eq!(object_name("serum.jpg", 1_700_000_000_000), "1700000000000_serum.jpg");
        assert_eq!(object_name("C:\\pics\\oil.png", 5), "5_oil.png");
        assert_eq!(object_name("dir/lotion.webp", 5), "5_lotion.webp");
    }

    #[tokio::test]
    async fn test_authenticated_client_shares_change_channel() {
        let anon = client("https://abcd.supabase.co");
        let admin = anon.authenticated(&AuthSession {
            email: "owner@queensbeauty.co.ke".to_string(),
            access_token: SecretString::from("token"),
            expires_in: 3600,
        });

        let mut rx = anon.subscribe();
        admin.publish(CatalogChange::Deleted(ProductId::new(4)));
        assert_eq!(rx.recv().await.unwrap(), CatalogChange::Deleted(ProductId::new(4)));
    }

    #[test]
    fn test_auth_session_debug_redacts_token() {
        let session = AuthSession {
            email: "owner@queensbeauty.co.ke".to_string(),
            access_token: SecretString::from("very-secret-token"),
            expires_in: 3600,
        };
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("owner@queensbeauty.co.ke"));
        assert!(!debug_output.contains("very-secret-token"));
    }
}
