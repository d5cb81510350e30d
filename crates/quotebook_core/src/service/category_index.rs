//! Derived category index and selection widgets.
//!
//! # Invariants
//! - Categories are listed once each, in first-seen order.
//! - The index is computed from the quote list, never stored.

use crate::model::filter::CategoryFilter;
use crate::model::quote::Quote;
use std::collections::HashSet;

/// Distinct categories across `quotes`, in first-seen order.
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    let mut seen = HashSet::new();
    quotes
        .iter()
        .filter(|quote| seen.insert(quote.category.as_str()))
        .map(|quote| quote.category.clone())
        .collect()
}

/// Keeps `persisted` when it still names a known category, otherwise `All`.
pub fn resolve_selection(categories: &[String], persisted: &str) -> CategoryFilter {
    match CategoryFilter::parse(persisted) {
        CategoryFilter::Named(name) if categories.contains(&name) => CategoryFilter::Named(name),
        _ => CategoryFilter::All,
    }
}

/// One category selection widget.
///
/// Several independent widgets can be populated from the same index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategorySelection {
    selected: CategoryFilter,
}

impl CategorySelection {
    pub fn new(selected: CategoryFilter) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    /// Selects a raw value as-is, even when no quote carries that category.
    pub fn select(&mut self, value: &str) -> &CategoryFilter {
        self.selected = CategoryFilter::parse(value);
        &self.selected
    }

    /// Re-populates against a recomputed index.
    pub fn refresh(&mut self, categories: &[String]) {
        self.selected = resolve_selection(categories, self.selected.as_str());
    }
}
