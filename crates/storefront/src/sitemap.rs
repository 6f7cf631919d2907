//! `sitemap.xml` generation for the static site.

use std::path::Path;

use askama::Template;
use chrono::NaiveDate;
use queens_beauty_core::Product;
use url::Url;

/// Where the static build expects the sitemap.
pub const DEFAULT_SITEMAP_PATH: &str = "dist/sitemap.xml";

/// The `<urlset>` document, rendered from `templates/sitemap.xml`.
///
/// The `.xml` extension turns on escaping, so every `<loc>` is safe to emit.
#[derive(Template)]
#[template(path = "sitemap.xml")]
struct SitemapXml<'a> {
    entries: &'a [SitemapEntry],
    lastmod: String,
}

/// A `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub priority: f32,
}

/// URL path segment for a product name.
///
/// Lowercases, turns runs of whitespace into `-` and drops anything outside
/// `[a-z0-9-]`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            slug.push(c);
        }
    }
    slug
}

/// Entries for the home page, the admin page and one per product.
#[must_use]
pub fn sitemap_entries(base_url: &Url, products: &[Product]) -> Vec<SitemapEntry> {
    let base = base_url.as_str().trim_end_matches('/');
    let mut entries = vec![
        SitemapEntry {
            loc: format!("{base}/"),
            priority: 1.0,
        },
        SitemapEntry {
            loc: format!("{base}/admin"),
            priority: 0.3,
        },
    ];
    entries.extend(products.iter().map(|p| SitemapEntry {
        loc: format!("{base}/product/{}", slugify(&p.name)),
        priority: 0.8,
    }));
    entries
}

/// Render the sitemap XML with `lastmod` set to `today`.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn build_sitemap(
    base_url: &Url,
    products: &[Product],
    today: NaiveDate,
) -> Result<String, askama::Error> {
    let entries = sitemap_entries(base_url, products);
    SitemapXml {
        entries: &entries,
        lastmod: today.format("%Y-%m-%d").to_string(),
    }
    .render()
}

/// Write `xml` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written.
pub fn write_sitemap(path: &Path, xml: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    tracing::info!(path = %path.display(), "Sitemap written");
    Ok(())
}
