//! Quote repository over a durable slot store.
//!
//! # Responsibility
//! - Load the quote list from storage, seeding defaults when absent.
//! - Provide append-only mutations (add, import, extend).
//! - Persist the full list synchronously after each mutation.
//!
//! # Invariants
//! - Insertion order is preserved; duplicates are allowed.
//! - A corrupt stored snapshot is surfaced, never silently replaced.

use crate::model::filter::CategoryFilter;
use crate::model::quote::{default_quotes, Quote};
use crate::repo::slot_repo::{RepoError, RepoResult, SlotStore, QUOTES_SLOT};
use log::{error, info, warn};
use serde_json::Value;

/// Counters returned by [`QuoteRepository::import_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// In-memory quote list bound to its storage slot.
pub struct QuoteRepository<S: SlotStore> {
    store: S,
    quotes: Vec<Quote>,
}

impl<S: SlotStore> QuoteRepository<S> {
    /// Loads the stored snapshot, or installs and persists the default quotes.
    ///
    /// # Errors
    /// - `RepoError::InvalidData` when the stored snapshot is not a quote list.
    /// - `RepoError::Db` when the slot cannot be read or the seed cannot be written.
    pub fn load(store: S) -> RepoResult<Self> {
        match store.get_slot(QUOTES_SLOT)? {
            Some(raw) => {
                let quotes = serde_json::from_str::<Vec<Quote>>(&raw).map_err(|err| {
                    error!(
                        "event=quotes_load module=repo status=error error_code=corrupt_snapshot error={err}"
                    );
                    RepoError::InvalidData(format!("stored quote list is unreadable: {err}"))
                })?;
                info!(
                    "event=quotes_load module=repo status=ok source=storage count={}",
                    quotes.len()
                );
                Ok(Self { store, quotes })
            }
            None => {
                let repo = Self {
                    store,
                    quotes: default_quotes(),
                };
                repo.persist()?;
                info!(
                    "event=quotes_load module=repo status=ok source=defaults count={}",
                    repo.quotes.len()
                );
                Ok(repo)
            }
        }
    }

    /// Validates and appends one user-entered quote.
    pub fn add(&mut self, text: &str, category: &str) -> RepoResult<Quote> {
        let quote = Quote::new(text, category).inspect_err(|err| {
            warn!("event=quote_add module=repo status=rejected reason={err}");
        })?;
        self.append_and_persist(vec![quote.clone()])?;
        info!(
            "event=quote_add module=repo status=ok total={}",
            self.quotes.len()
        );
        Ok(quote)
    }

    /// Appends every well-formed entry of a JSON array.
    ///
    /// An entry is accepted when it is an object whose `text` and `category`
    /// are non-empty strings. Other entries are skipped. Accepted entries are
    /// stored as received and are not checked against existing quotes.
    pub fn import_batch(&mut self, candidates: &Value) -> RepoResult<ImportReport> {
        let Some(items) = candidates.as_array() else {
            warn!("event=quotes_import module=repo status=rejected reason=not_a_sequence");
            return Err(RepoError::NotASequence);
        };

        let accepted = items.iter().filter_map(quote_from_value).collect::<Vec<_>>();
        let report = ImportReport {
            imported: accepted.len(),
            skipped: items.len() - accepted.len(),
        };
        self.append_and_persist(accepted)?;

        info!(
            "event=quotes_import module=repo status=ok imported={} skipped={} total={}",
            report.imported,
            report.skipped,
            self.quotes.len()
        );
        Ok(report)
    }

    /// Appends an already-accepted batch and persists once.
    pub fn extend(&mut self, quotes: Vec<Quote>) -> RepoResult<usize> {
        let added = quotes.len();
        self.append_and_persist(quotes)?;
        Ok(added)
    }

    pub fn all(&self) -> &[Quote] {
        &self.quotes
    }

    /// Returns quotes matching `filter`, in insertion order.
    pub fn by_category(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Storage binding, shared with collaborators that keep their own slots.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn append_and_persist(&mut self, quotes: Vec<Quote>) -> RepoResult<()> {
        if quotes.is_empty() {
            return Ok(());
        }
        let previous_len = self.quotes.len();
        self.quotes.extend(quotes);
        if let Err(err) = self.persist() {
            self.quotes.truncate(previous_len);
            return Err(err);
        }
        Ok(())
    }

    fn persist(&self) -> RepoResult<()> {
        let snapshot = serde_json::to_string(&self.quotes)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode quote list: {err}")))?;
        self.store.set_slot(QUOTES_SLOT, &snapshot).inspect_err(|err| {
            error!("event=quotes_persist module=repo status=error error={err}");
        })
    }
}

fn quote_from_value(value: &Value) -> Option<Quote> {
    let text = value.get("text")?.as_str()?;
    let category = value.get("category")?.as_str()?;
    if text.is_empty() || category.is_empty() {
        return None;
    }
    Some(Quote::unchecked(text, category))
}
