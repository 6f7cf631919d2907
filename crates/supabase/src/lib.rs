//! Supabase gateway for the Queens Beauty catalog.
//!
//! # Architecture
//!
//! - PostgREST (`/rest/v1`) for the `products` table
//! - Storage (`/storage/v1`) for product images in the `product-images` bucket
//! - GoTrue (`/auth/v1`) for admin password sign-in
//! - Supabase is the source of truth - NO local persistence
//!
//! Change notifications are published on a broadcast channel after every
//! mutation this process confirms. Changes made elsewhere are picked up by
//! the storefront's catalog poller.
//!
//! # Example
//!
//! ```rust,ignore
//! use queens_beauty_supabase::{SupabaseClient, SupabaseConfig};
//!
//! let client = SupabaseClient::new(SupabaseConfig::from_env()?);
//! let products = client.fetch_products().await?;
//!
//! let session = client.sign_in("owner@queensbeauty.co.ke", &password).await?;
//! let admin = client.authenticated(&session);
//! admin.remove_product(products[0].id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod config;
mod error;

pub use client::{AuthSession, SupabaseClient};
pub use config::{ConfigError, SupabaseConfig};
pub use error::SupabaseError;
