//! Quote use-case service.
//!
//! # Responsibility
//! - Provide the draw, filter, add, import/export and merge use-cases.
//! - Own the two category widgets and the session-scoped last-viewed quote.
//!
//! # Invariants
//! - Every mutation re-populates both widgets from a recomputed index.
//! - The list filter is persisted as the raw selected value.
//! - The last-viewed quote never reaches durable storage.

use crate::model::filter::{CategoryFilter, ALL_CATEGORIES};
use crate::model::quote::Quote;
use crate::repo::quote_repo::{ImportReport, QuoteRepository};
use crate::repo::slot_repo::{
    RepoError, RepoResult, SlotStore, LAST_VIEWED_QUOTE_SLOT, SELECTED_CATEGORY_SLOT,
};
use crate::service::category_index::{categories, resolve_selection, CategorySelection};
use crate::sync::reconciler::{reconcile, ReconcileOutcome};
use log::{debug, info};
use rand::Rng;
use std::path::Path;

/// Message shown when the draw filter selects no quote.
pub const EMPTY_CATEGORY_MESSAGE: &str = "No quotes available in this category.";

/// File name suggested for exports.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "quotes.json";

/// Use-case service over a durable repository and a session store.
pub struct QuoteService<D: SlotStore, S: SlotStore> {
    repo: QuoteRepository<D>,
    session: S,
    draw_filter: CategorySelection,
    list_filter: CategorySelection,
    current: Option<Quote>,
}

impl<D: SlotStore, S: SlotStore> QuoteService<D, S> {
    /// Builds the service and restores remembered state.
    ///
    /// The list widget starts from the persisted filter (falling back to
    /// `all` when its category is gone); the current quote starts from the
    /// session slot.
    pub fn new(repo: QuoteRepository<D>, session: S) -> RepoResult<Self> {
        let index = categories(repo.all());
        let remembered = repo
            .store()
            .get_slot(SELECTED_CATEGORY_SLOT)?
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());
        let list_filter = CategorySelection::new(resolve_selection(&index, &remembered));

        let current = match session.get_slot(LAST_VIEWED_QUOTE_SLOT)? {
            Some(raw) => Some(serde_json::from_str::<Quote>(&raw).map_err(|err| {
                RepoError::InvalidData(format!("last viewed quote is unreadable: {err}"))
            })?),
            None => None,
        };

        Ok(Self {
            repo,
            session,
            draw_filter: CategorySelection::default(),
            list_filter,
            current,
        })
    }

    pub fn repo(&self) -> &QuoteRepository<D> {
        &self.repo
    }

    /// Category index recomputed from the current quote list.
    pub fn categories(&self) -> Vec<String> {
        categories(self.repo.all())
    }

    pub fn draw_filter(&self) -> &CategoryFilter {
        self.draw_filter.selected()
    }

    pub fn list_filter(&self) -> &CategoryFilter {
        self.list_filter.selected()
    }

    /// Quote currently on display, restored from the session on startup.
    pub fn current_quote(&self) -> Option<&Quote> {
        self.current.as_ref()
    }

    /// Draws one quote uniformly from the draw filter's view.
    ///
    /// Returns `None` when the view is empty; the current quote is left as is.
    pub fn show_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> RepoResult<Option<Quote>> {
        let candidates = self.repo.by_category(self.draw_filter.selected());
        if candidates.is_empty() {
            debug!(
                "event=quote_draw module=service status=empty filter={}",
                self.draw_filter.selected()
            );
            return Ok(None);
        }

        let picked = candidates[rng.gen_range(0..candidates.len())].clone();
        let encoded = serde_json::to_string(&picked)
            .map_err(|err| RepoError::InvalidData(format!("cannot encode quote: {err}")))?;
        self.session.set_slot(LAST_VIEWED_QUOTE_SLOT, &encoded)?;
        self.current = Some(picked.clone());
        Ok(Some(picked))
    }

    /// Changes the draw filter for this session only.
    pub fn set_draw_filter(&mut self, value: &str) -> CategoryFilter {
        self.draw_filter.select(value).clone()
    }

    /// Changes and persists the list filter, returning the filtered view.
    pub fn set_list_filter(&mut self, value: &str) -> RepoResult<Vec<Quote>> {
        let selected = self.list_filter.select(value).clone();
        self.repo
            .store()
            .set_slot(SELECTED_CATEGORY_SLOT, selected.as_str())?;
        info!("event=filter_change module=service status=ok filter={selected}");
        Ok(self.listed())
    }

    /// Quotes visible under the list filter.
    pub fn listed(&self) -> Vec<Quote> {
        self.repo.by_category(self.list_filter.selected())
    }

    /// Raw persisted list filter, `all` when never set.
    pub fn remembered_filter(&self) -> RepoResult<String> {
        Ok(self
            .repo
            .store()
            .get_slot(SELECTED_CATEGORY_SLOT)?
            .unwrap_or_else(|| ALL_CATEGORIES.to_string()))
    }

    pub fn add_quote(&mut self, text: &str, category: &str) -> RepoResult<Quote> {
        let quote = self.repo.add(text, category)?;
        self.refresh_widgets();
        Ok(quote)
    }

    /// Imports a JSON document holding an array of quote objects.
    pub fn import_json(&mut self, document: &str) -> RepoResult<ImportReport> {
        let value = serde_json::from_str::<serde_json::Value>(document)
            .map_err(|err| RepoError::InvalidData(format!("import file is not JSON: {err}")))?;
        let report = self.repo.import_batch(&value)?;
        self.refresh_widgets();
        Ok(report)
    }

    pub fn import_from_file(&mut self, path: impl AsRef<Path>) -> RepoResult<ImportReport> {
        let document = std::fs::read_to_string(path)?;
        self.import_json(&document)
    }

    /// Full quote list as a pretty-printed JSON document.
    pub fn export_json(&self) -> RepoResult<String> {
        serde_json::to_string_pretty(self.repo.all())
            .map_err(|err| RepoError::InvalidData(format!("cannot encode export: {err}")))
    }

    pub fn export_to_file(&self, path: impl AsRef<Path>) -> RepoResult<()> {
        let document = self.export_json()?;
        std::fs::write(path.as_ref(), document)?;
        info!(
            "event=quotes_export module=service status=ok count={} path={}",
            self.repo.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Folds a remote snapshot into the repository.
    pub fn merge_remote(&mut self, remote: &[Quote]) -> RepoResult<ReconcileOutcome> {
        let outcome = reconcile(&mut self.repo, remote)?;
        if !outcome.is_noop() {
            self.refresh_widgets();
        }
        Ok(outcome)
    }

    fn refresh_widgets(&mut self) {
        let index = categories(self.repo.all());
        self.draw_filter.refresh(&index);
        self.list_filter.refresh(&index);
    }
}
