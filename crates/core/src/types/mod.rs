//! Core types for Queens Beauty.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod phone;
pub mod price;
pub mod product;

pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use price::{CURRENCY_LABEL, Price, PriceError};
pub use product::{Product, ProductDraft};
