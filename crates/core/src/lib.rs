//! Queens Beauty Core - Shared types library.
//!
//! This crate provides common types used across all Queens Beauty components:
//! - `storefront` - Catalog mirror, carousel, search, cart and WhatsApp checkout
//! - `admin` - Catalog management (create, update, delete, duplicate detection)
//! - `supabase` - The hosted database and object storage gateway
//! - `cli` - Command-line entry point
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! The [`gateway::CatalogGateway`] trait is the seam between the engines and
//! whatever hosts the product table.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, phone numbers and products
//! - [`gateway`] - Remote catalog gateway trait, change events and errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod gateway;
pub mod types;

pub use gateway::{CatalogChange, CatalogGateway, GatewayError, ImageUpload, MemoryGateway};
pub use types::*;
