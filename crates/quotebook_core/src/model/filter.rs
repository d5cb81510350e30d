//! Category filter selection.

use crate::model::quote::Quote;
use std::fmt::{Display, Formatter};

/// Reserved selection value meaning "no filtering".
pub const ALL_CATEGORIES: &str = "all";

/// Category selection used by draw and list views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Parses a raw selection value.
    ///
    /// Blank input and the reserved `"all"` both map to [`CategoryFilter::All`].
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Named(trimmed.to_string())
        }
    }

    /// Returns the raw selection value as persisted.
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name.as_str(),
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => quote.category == *name,
        }
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
