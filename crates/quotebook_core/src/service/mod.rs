//! Quote use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, category index and reconciler calls.
//! - Keep view layers decoupled from storage details.

pub mod category_index;
pub mod quote_service;
