//! Additive merge of a remote quote snapshot into the local repository.
//!
//! # Invariants
//! - Local entries are never removed or reordered.
//! - A remote candidate is added only when no local entry has the same
//!   `(text, category)` identity.
//! - Re-running with the same snapshot adds nothing.

use crate::model::quote::Quote;
use crate::repo::quote_repo::QuoteRepository;
use crate::repo::slot_repo::{RepoResult, SlotStore};
use log::info;
use std::collections::HashSet;

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileOutcome {
    /// Quotes appended to the repository, in remote order.
    pub added: Vec<Quote>,
}

impl ReconcileOutcome {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

/// Returns remote candidates missing from `local`, in remote order.
///
/// A candidate repeated within `remote` is returned once.
pub fn pending_quotes(local: &[Quote], remote: &[Quote]) -> Vec<Quote> {
    let mut known = local
        .iter()
        .map(|quote| (quote.text.as_str(), quote.category.as_str()))
        .collect::<HashSet<_>>();

    let mut pending = Vec::new();
    for candidate in remote {
        if known.insert((candidate.text.as_str(), candidate.category.as_str())) {
            pending.push(candidate.clone());
        }
    }
    pending
}

/// Folds `remote` into `repo`, persisting once when anything is new.
pub fn reconcile<S: SlotStore>(
    repo: &mut QuoteRepository<S>,
    remote: &[Quote],
) -> RepoResult<ReconcileOutcome> {
    let pending = pending_quotes(repo.all(), remote);
    if pending.is_empty() {
        info!(
            "event=reconcile module=sync status=ok remote={} added=0",
            remote.len()
        );
        return Ok(ReconcileOutcome::default());
    }

    repo.extend(pending.clone())?;
    info!(
        "event=reconcile module=sync status=ok remote={} added={} total={}",
        remote.len(),
        pending.len(),
        repo.len()
    );
    Ok(ReconcileOutcome { added: pending })
}
