//! View boundary: user intents in, view snapshots out.
//!
//! # Responsibility
//! - Translate discrete user intents into service calls.
//! - Hand views a complete snapshot after every intent, so views hold no
//!   quote state of their own.
//!
//! # Invariants
//! - Every failure becomes an `Error` notification; dispatch never fails.
//! - Pushes started by `AddQuote` never touch local state.

use crate::model::quote::Quote;
use crate::notify::{Notification, NotificationInbox, Notifier};
use crate::repo::slot_repo::{RepoError, SlotStore};
use crate::service::quote_service::{QuoteService, EMPTY_CATEGORY_MESSAGE};
use crate::sync::engine::SyncEngine;
use log::{debug, warn};
use rand::Rng;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Message shown when a quote fails validation.
pub const MISSING_FIELDS_MESSAGE: &str = "Please enter both quote text and category.";

/// Discrete user action emitted by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ShowRandom,
    /// Changes the draw filter, then draws.
    SetDrawFilter(String),
    SetListFilter(String),
    AddQuote { text: String, category: String },
    /// Appends the quotes of a JSON file.
    Import(PathBuf),
    /// Writes every quote to a JSON file.
    Export(PathBuf),
}

/// Everything a view needs to render after one intent.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Shared by both category widgets.
    pub categories: Vec<String>,
    pub draw_filter: String,
    pub list_filter: String,
    /// Display surface text; empty before the first draw.
    pub display: String,
    pub listed: Vec<Quote>,
    pub notifications: Vec<Notification>,
}

/// Intent dispatcher owning the service and the notification channel.
pub struct QuoteApp<D: SlotStore, S: SlotStore, R: Rng> {
    service: QuoteService<D, S>,
    notifier: Notifier,
    inbox: NotificationInbox,
    rng: R,
    engine: Option<SyncEngine>,
    pending_pushes: Vec<JoinHandle<()>>,
}

impl<D: SlotStore, S: SlotStore, R: Rng> QuoteApp<D, S, R> {
    pub fn new(
        service: QuoteService<D, S>,
        notifier: Notifier,
        inbox: NotificationInbox,
        rng: R,
    ) -> Self {
        Self {
            service,
            notifier,
            inbox,
            rng,
            engine: None,
            pending_pushes: Vec::new(),
        }
    }

    /// Enables background pushes of added quotes and `sync`.
    pub fn with_sync(mut self, engine: SyncEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn service(&self) -> &QuoteService<D, S> {
        &self.service
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Applies one intent and returns the resulting snapshot.
    ///
    /// `AddQuote` spawns a push when sync is enabled, so it must run inside a
    /// tokio runtime in that case.
    pub fn dispatch(&mut self, intent: Intent) -> ViewSnapshot {
        let mut display = None;

        match intent {
            Intent::ShowRandom => display = Some(self.draw()),
            Intent::SetDrawFilter(value) => {
                self.service.set_draw_filter(&value);
                display = Some(self.draw());
            }
            Intent::SetListFilter(value) => {
                if let Err(err) = self.service.set_list_filter(&value) {
                    self.report("Failed to save the category filter", &err);
                }
            }
            Intent::AddQuote { text, category } => self.add(&text, &category),
            Intent::Import(path) => match self.service.import_from_file(&path) {
                Ok(report) => self.notifier.success(format!(
                    "Quotes imported successfully! ({} added, {} skipped)",
                    report.imported, report.skipped
                )),
                Err(err) => self.report("Failed to import quotes", &err),
            },
            Intent::Export(path) => match self.service.export_to_file(&path) {
                Ok(()) => self.notifier.success(format!(
                    "Exported {} quote(s) to {}",
                    self.service.repo().len(),
                    path.display()
                )),
                Err(err) => self.report("Failed to export quotes", &err),
            },
        }

        self.snapshot(display)
    }

    /// Pulls from the remote once; requires [`QuoteApp::with_sync`].
    pub async fn sync(&mut self) -> ViewSnapshot {
        match self.engine.clone() {
            Some(engine) => {
                if let Err(err) = engine.sync_once(&mut self.service).await {
                    debug!("event=sync_pull module=intent status=error error={err}");
                }
            }
            None => self.notifier.error("Sync is not configured."),
        }
        self.snapshot(None)
    }

    /// Syncs on every `period` tick until `shutdown` resolves.
    ///
    /// `render` receives the notifications produced by each attempt.
    pub async fn watch<F, V>(&mut self, period: Duration, shutdown: F, mut render: V) -> usize
    where
        F: Future<Output = ()>,
        V: FnMut(Vec<Notification>),
    {
        let Some(engine) = self.engine.clone() else {
            self.notifier.error("Sync is not configured.");
            render(self.inbox.drain());
            return 0;
        };
        let inbox = &mut self.inbox;
        engine
            .run_periodic(&mut self.service, period, shutdown, |_| render(inbox.drain()))
            .await
    }

    /// Waits for outstanding pushes and returns their notifications.
    pub async fn flush_pushes(&mut self) -> Vec<Notification> {
        for handle in self.pending_pushes.drain(..) {
            if let Err(err) = handle.await {
                warn!(
                    "event=sync_push module=intent status=error error_code=task_failed error={err}"
                );
            }
        }
        self.inbox.drain()
    }

    /// Snapshot of the current state without applying an intent.
    pub fn snapshot(&mut self, display: Option<String>) -> ViewSnapshot {
        ViewSnapshot {
            categories: self.service.categories(),
            draw_filter: self.service.draw_filter().to_string(),
            list_filter: self.service.list_filter().to_string(),
            display: display
                .or_else(|| self.service.current_quote().map(Quote::display_line))
                .unwrap_or_default(),
            listed: self.service.listed(),
            notifications: self.inbox.drain(),
        }
    }

    fn draw(&mut self) -> String {
        match self.service.show_random(&mut self.rng) {
            Ok(Some(quote)) => quote.display_line(),
            Ok(None) => EMPTY_CATEGORY_MESSAGE.to_string(),
            Err(err) => {
                self.report("Failed to remember the shown quote", &err);
                self.service
                    .current_quote()
                    .map(Quote::display_line)
                    .unwrap_or_default()
            }
        }
    }

    fn add(&mut self, text: &str, category: &str) {
        match self.service.add_quote(text, category) {
            Ok(quote) => {
                self.notifier.success("Quote added successfully!");
                if let Some(engine) = &self.engine {
                    self.pending_pushes.retain(|handle| !handle.is_finished());
                    self.pending_pushes.push(engine.push_in_background(quote));
                }
            }
            Err(RepoError::Validation(_)) => self.notifier.error(MISSING_FIELDS_MESSAGE),
            Err(err) => self.report("Failed to save the quote", &err),
        }
    }

    fn report(&self, context: &str, err: &RepoError) {
        warn!("event=intent module=intent status=error context={context:?} error={err}");
        self.notifier.error(format!("{context}: {err}"));
    }
}
