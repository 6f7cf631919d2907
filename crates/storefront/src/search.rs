//! Product search over the catalog snapshot.

use queens_beauty_core::{Product, ProductId};

/// Products whose name or description contains `query`, ignoring case.
///
/// Leading and trailing whitespace in `query` is ignored. A blank query
/// matches nothing. Results keep catalog order.
#[must_use]
pub fn search<'a>(catalog: &'a [Product], query: &str) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// The search box and its result panel.
#[derive(Debug, Clone, Default)]
pub struct SearchPanel {
    query: String,
    results: Vec<Product>,
}

impl SearchPanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current query text as typed.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current results.
    #[must_use]
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Whether the result panel is shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Update the query and recompute results.
    pub fn set_query(&mut self, query: impl Into<String>, catalog: &[Product]) {
        self.query = query.into();
        self.recompute(catalog);
    }

    /// Recompute results for the current query against a new snapshot.
    pub fn recompute(&mut self, catalog: &[Product]) {
        self.results = search(catalog, &self.query).into_iter().cloned().collect();
    }

    /// Pick a result. Clears the query and returns the chosen id if it was
    /// among the results.
    pub fn select(&mut self, id: ProductId) -> Option<ProductId> {
        let found = self.results.iter().any(|p| p.id == id);
        self.clear();
        found.then_some(id)
    }

    /// Empty the query and hide the panel.
    pub fn clear(&mut self) {
        self.query.clear();
        self.results.clear();
    }
}
