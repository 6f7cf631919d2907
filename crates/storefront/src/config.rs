//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_ORDER_PHONE` - WhatsApp number for orders and inquiries (default: 254714137554)
//! - `STOREFRONT_CONTACT_PHONE` - WhatsApp number for the contact form (default: 254736984633)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <https://queensbeauty.netlify.app>)
//! - `STOREFRONT_CAROUSEL_INTERVAL_SECS` - Carousel auto-advance period (default: 7)
//! - `STOREFRONT_CATALOG_POLL_SECS` - Re-fetch the catalog this often to pick up
//!   changes made by other processes (default: disabled)

use std::sync::LazyLock;
use std::time::Duration;

use queens_beauty_core::PhoneNumber;
use thiserror::Error;
use url::Url;

/// Default WhatsApp number for orders and product inquiries.
pub const DEFAULT_ORDER_PHONE: &str = "254714137554";

/// Default WhatsApp number for contact form messages.
pub const DEFAULT_CONTACT_PHONE: &str = "254736984633";

/// Default public URL of the storefront.
pub const DEFAULT_BASE_URL: &str = "https://queensbeauty.netlify.app";

/// Default carousel auto-advance period in seconds.
pub const DEFAULT_CAROUSEL_INTERVAL_SECS: u64 = 7;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// WhatsApp number receiving orders and single-product inquiries
    pub order_phone: PhoneNumber,
    /// WhatsApp number receiving contact form messages
    pub contact_phone: PhoneNumber,
    /// Public base URL, used for sitemap entries
    pub base_url: Url,
    /// Carousel auto-advance period
    pub carousel_interval: Duration,
    /// Catalog poll period, if polling is enabled
    pub catalog_poll_interval: Option<Duration>,
}

/// Configuration built from the `DEFAULT_*` constants, parsed once.
static DEFAULT_CONFIG: LazyLock<StorefrontConfig> = LazyLock::new(|| StorefrontConfig {
    order_phone: PhoneNumber::parse(DEFAULT_ORDER_PHONE).expect("valid default order phone"),
    contact_phone: PhoneNumber::parse(DEFAULT_CONTACT_PHONE).expect("valid default contact phone"),
    base_url: Url::parse(DEFAULT_BASE_URL).expect("valid default base URL"),
    carousel_interval: Duration::from_secs(DEFAULT_CAROUSEL_INTERVAL_SECS),
    catalog_poll_interval: None,
});

impl Default for StorefrontConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let order_phone = parse_env("STOREFRONT_ORDER_PHONE", DEFAULT_ORDER_PHONE, PhoneNumber::parse)?;
        let contact_phone =
            parse_env("STOREFRONT_CONTACT_PHONE", DEFAULT_CONTACT_PHONE, PhoneNumber::parse)?;
        let base_url = parse_env("STOREFRONT_BASE_URL", DEFAULT_BASE_URL, Url::parse)?;
        let carousel_secs = parse_env(
            "STOREFRONT_CAROUSEL_INTERVAL_SECS",
            &DEFAULT_CAROUSEL_INTERVAL_SECS.to_string(),
            str::parse::<u64>,
        )?;
        if carousel_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_CAROUSEL_INTERVAL_SECS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let catalog_poll_interval = get_optional_env("STOREFRONT_CATALOG_POLL_SECS")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("STOREFRONT_CATALOG_POLL_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            order_phone,
            contact_phone,
            base_url,
            carousel_interval: Duration::from_secs(carousel_secs),
            catalog_poll_interval,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable (or its default) with `parse`.
fn parse_env<T, E: std::fmt::Display>(
    key: &str,
    default: &str,
    parse: impl Fn(&str) -> Result<T, E>,
) -> Result<T, ConfigError> {
    let raw = get_env_or_default(key, default);
    parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.order_phone.as_str(), "254714137554");
        assert_eq!(config.contact_phone.as_str(), "254736984633");
        assert_eq!(config.base_url.as_str(), "https://queensbeauty.netlify.app/");
        assert_eq!(config.carousel_interval, Duration::from_secs(7));
        assert!(config.catalog_poll_interval.is_none());
    }

    #[test]
    fn test_default_matches_env_defaults() {
        let config = StorefrontConfig::default();
        let base_url = parse_env("QB_TEST_UNSET_VARIABLE", DEFAULT_BASE_URL, Url::parse).unwrap();
        let phone =
            parse_env("QB_TEST_UNSET_VARIABLE", DEFAULT_ORDER_PHONE, PhoneNumber::parse).unwrap();
        assert_eq!(config.base_url, base_url);
        assert_eq!(config.order_phone, phone);
    }

    #[test]
    fn test_parse_env_uses_default() {
        let secs = parse_env("QB_TEST_UNSET_VARIABLE", "12", str::parse::<u64>).unwrap();
        assert_eq!(secs, 12);
    }

    #[test]
    fn test_parse_env_reports_variable() {
        let err = parse_env("QB_TEST_UNSET_VARIABLE", "abc", str::parse::<u64>).unwrap_err();
        assert!(err.to_string().contains("QB_TEST_UNSET_VARIABLE"));
    }
}
