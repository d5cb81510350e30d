//! Core domain logic for Quotebook.
//! This crate is the single source of truth for quote invariants.

pub mod config;
pub mod db;
pub mod intent;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{AppConfig, ConfigError};
pub use intent::{Intent, QuoteApp, ViewSnapshot};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::filter::{CategoryFilter, ALL_CATEGORIES};
pub use model::quote::{default_quotes, Quote, QuoteValidationError, SERVER_CATEGORY};
pub use notify::{Notification, NotificationInbox, NotificationKind, Notifier};
pub use repo::quote_repo::{ImportReport, QuoteRepository};
pub use repo::slot_repo::{RepoError, RepoResult, SlotStore, SqliteSlotStore};
pub use service::category_index::{categories, resolve_selection, CategorySelection};
pub use service::quote_service::QuoteService;
pub use sync::engine::SyncEngine;
pub use sync::error::{SyncError, SyncResult};
pub use sync::reconciler::{pending_quotes, reconcile, ReconcileOutcome};
pub use sync::remote::{HttpQuoteSource, RemoteQuoteSource};
