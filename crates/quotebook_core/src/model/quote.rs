//! Quote record and creation-time validation.
//!
//! # Invariants
//! - Quotes created from user input have non-empty trimmed fields.
//! - Imported and server-fetched quotes are stored as received.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Category label assigned to quotes fetched from the remote endpoint.
pub const SERVER_CATEGORY: &str = "Server";

/// One quote with its category label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

/// Validation failure for user-entered quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteValidationError {
    EmptyText,
    EmptyCategory,
}

impl Display for QuoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "quote text must not be empty"),
            Self::EmptyCategory => write!(f, "quote category must not be empty"),
        }
    }
}

impl Error for QuoteValidationError {}

impl Quote {
    /// Creates a quote from user input.
    ///
    /// Both fields are trimmed; either one empty after trimming is rejected.
    pub fn new(
        text: impl AsRef<str>,
        category: impl AsRef<str>,
    ) -> Result<Self, QuoteValidationError> {
        let text = text.as_ref().trim();
        let category = category.as_ref().trim();
        if text.is_empty() {
            return Err(QuoteValidationError::EmptyText);
        }
        if category.is_empty() {
            return Err(QuoteValidationError::EmptyCategory);
        }
        Ok(Self::unchecked(text, category))
    }

    /// Creates a quote without trimming or validation.
    ///
    /// Used by import and sync paths, which carry their own acceptance rules.
    pub fn unchecked(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Display line used by every view.
    pub fn display_line(&self) -> String {
        format!("\"{}\" — {}", self.text, self.category)
    }
}

/// The three quotes installed when durable storage holds no snapshot.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::unchecked(
            "The only limit to our realization of tomorrow is our doubts of today.",
            "Motivational",
        ),
        Quote::unchecked(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::unchecked(
            "Success is not in what you have, but who you are.",
            "Success",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{default_quotes, Quote, QuoteValidationError};

    #[test]
    fn new_trims_both_fields() {
        let quote = Quote::new("  Stay curious.  ", "\tLife\n").expect("valid quote");
        assert_eq!(quote.text, "Stay curious.");
        assert_eq!(quote.category, "Life");
    }

    #[test]
    fn new_rejects_blank_fields() {
        assert_eq!(
            Quote::new("   ", "Life").unwrap_err(),
            QuoteValidationError::EmptyText
        );
        assert_eq!(
            Quote::new("text", "  ").unwrap_err(),
            QuoteValidationError::EmptyCategory
        );
        assert_eq!(
            Quote::new("", "").unwrap_err(),
            QuoteValidationError::EmptyText
        );
    }

    #[test]
    fn display_line_quotes_text_and_appends_category() {
        let quote = Quote::unchecked("Life is short", "Life");
        assert_eq!(quote.display_line(), "\"Life is short\" — Life");
    }

    #[test]
    fn defaults_cover_three_distinct_categories() {
        let quotes = default_quotes();
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].category, "Motivational");
        assert_eq!(quotes[1].category, "Life");
        assert_eq!(quotes[2].category, "Success");
    }
}
