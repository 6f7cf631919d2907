//! Filtering and paging for the admin product list.

use queens_beauty_core::Product;

/// Products per page.
pub const PAGE_SIZE: usize = 20;

/// Products matching `query` in name, description or price, in list order.
///
/// The query is trimmed and compared without case. A blank query keeps
/// every product.
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
                || p.price.as_plain_text().contains(&needle)
        })
        .collect()
}

/// Number of pages needed for `len` items.
#[must_use]
pub const fn total_pages(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// The current page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl Pager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Go back one page, stopping at 1.
    pub fn back(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Go forward one page, stopping at the last page of `len` items.
    pub fn next(&mut self, len: usize) {
        self.page = (self.page + 1).min(total_pages(len).max(1));
    }

    /// The items on the current page. Empty if the page is past the end.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.page - 1).saturating_mul(PAGE_SIZE);
        let end = start.saturating_add(PAGE_SIZE).min(items.len());
        items.get(start..end).unwrap_or_default()
    }

    /// Step back a page if deleting one of `len_before` items empties the
    /// current page.
    pub fn after_delete(&mut self, len_before: usize) {
        if self.page > 1 && (self.page - 1) * PAGE_SIZE >= len_before.saturating_sub(1) {
            self.page -= 1;
        }
    }
}
