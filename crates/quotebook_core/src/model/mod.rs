//! Quote domain model.
//!
//! # Responsibility
//! - Define the quote record shared by repository, reconciler and views.
//! - Define category filter selection semantics.
//!
//! # Invariants
//! - Quote identity is the `(text, category)` pair; there is no id field.
//! - `"all"` is reserved as the unfiltered category selection.

pub mod filter;
pub mod quote;
