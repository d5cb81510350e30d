//! Storage contracts and the quote repository.
//!
//! # Responsibility
//! - Define the string-keyed slot contract used for durable and session storage.
//! - Own the in-memory quote list and mirror it to its slot on every mutation.
//!
//! # Invariants
//! - Validation failures never change in-memory or persisted state.
//! - A failed persist rolls the in-memory list back to its previous length.

pub mod quote_repo;
pub mod slot_repo;
