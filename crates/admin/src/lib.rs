//! Queens Beauty catalog administration.
//!
//! Form-driven create, update and delete against a [`CatalogGateway`], with
//! duplicate detection before insert, search, paging and image attachment.
//! Who may call these operations is decided by the gateway's credentials:
//! the Supabase client must be signed in for writes to be accepted.
//!
//! [`CatalogGateway`]: queens_beauty_core::CatalogGateway

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod console;
pub mod duplicate;
pub mod error;
pub mod form;
pub mod images;
pub mod pagination;

pub use console::{AdminConsole, CreateOutcome, EditSession, is_auth_failure};
pub use error::{AdminAction, AdminError};
pub use form::{FormError, ProductForm, ValidatedForm};
pub use images::load_image;
pub use pagination::{PAGE_SIZE, Pager};
