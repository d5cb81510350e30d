//! Sync scheduling: one-shot pulls, the periodic loop and background pushes.
//!
//! # Invariants
//! - A failed pull leaves the repository untouched and is reported once.
//! - The next periodic attempt happens on the next tick, with no backoff.
//! - Push outcomes are only reported; they never change local state.

use crate::model::quote::Quote;
use crate::notify::Notifier;
use crate::repo::slot_repo::SlotStore;
use crate::service::quote_service::QuoteService;
use crate::sync::error::{SyncError, SyncResult};
use crate::sync::reconciler::ReconcileOutcome;
use crate::sync::remote::RemoteQuoteSource;
use log::{error, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Shortest period accepted by [`SyncEngine::run_periodic`].
pub const MIN_SYNC_PERIOD: Duration = Duration::from_secs(1);

/// Drives synchronization against one remote source.
#[derive(Clone)]
pub struct SyncEngine {
    remote: Arc<dyn RemoteQuoteSource>,
    notifier: Notifier,
    request_timeout: Duration,
}

impl SyncEngine {
    pub fn new(
        remote: Arc<dyn RemoteQuoteSource>,
        notifier: Notifier,
        request_timeout: Duration,
    ) -> Self {
        Self {
            remote,
            notifier,
            request_timeout,
        }
    }

    /// Pulls the remote snapshot once and merges it.
    ///
    /// The outcome is reported through the notifier and also returned.
    pub async fn sync_once<D: SlotStore, S: SlotStore>(
        &self,
        service: &mut QuoteService<D, S>,
    ) -> SyncResult<ReconcileOutcome> {
        let run_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!("event=sync_pull module=sync status=start run_id={run_id}");

        let result = match self.fetch_with_timeout().await {
            Ok(remote) => service.merge_remote(&remote).map_err(SyncError::from),
            Err(err) => Err(err),
        };

        match &result {
            Ok(outcome) => {
                info!(
                    "event=sync_pull module=sync status=ok run_id={run_id} added={} duration_ms={}",
                    outcome.added.len(),
                    started_at.elapsed().as_millis()
                );
                if outcome.is_noop() {
                    self.notifier.info("Quotes are up to date with the server.");
                } else {
                    self.notifier.success(format!(
                        "Synced {} new quote(s) from the server.",
                        outcome.added.len()
                    ));
                }
            }
            Err(err) => {
                error!(
                    "event=sync_pull module=sync status=error run_id={run_id} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                self.notifier
                    .error(format!("Failed to sync with the server: {err}"));
            }
        }
        result
    }

    /// Runs `sync_once` on every tick until `shutdown` resolves.
    ///
    /// The first tick fires immediately. `after_attempt` sees every result.
    /// Periods below [`MIN_SYNC_PERIOD`] are raised to it. Returns the number
    /// of attempts made.
    pub async fn run_periodic<D, S, F, A>(
        &self,
        service: &mut QuoteService<D, S>,
        period: Duration,
        shutdown: F,
        mut after_attempt: A,
    ) -> usize
    where
        D: SlotStore,
        S: SlotStore,
        F: Future<Output = ()>,
        A: FnMut(&SyncResult<ReconcileOutcome>),
    {
        let period = if period < MIN_SYNC_PERIOD {
            warn!(
                "event=sync_loop module=sync status=clamped requested_ms={} period_ms={}",
                period.as_millis(),
                MIN_SYNC_PERIOD.as_millis()
            );
            MIN_SYNC_PERIOD
        } else {
            period
        };
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut attempts = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    attempts += 1;
                    let result = self.sync_once(service).await;
                    if let Err(err) = &result {
                        warn!(
                            "event=sync_tick module=sync status=error attempt={attempts} error={err}"
                        );
                    }
                    after_attempt(&result);
                }
            }
        }

        info!("event=sync_loop module=sync status=stopped attempts={attempts}");
        attempts
    }

    /// Pushes one quote on a spawned task.
    ///
    /// The echoed response is logged; success or failure is reported as a
    /// notification. Must be called from within a tokio runtime.
    pub fn push_in_background(&self, quote: Quote) -> JoinHandle<()> {
        let remote = Arc::clone(&self.remote);
        let notifier = self.notifier.clone();
        let timeout = self.request_timeout;

        tokio::spawn(async move {
            match tokio::time::timeout(timeout, remote.push_quote(&quote)).await {
                Ok(Ok(echo)) => {
                    info!("event=sync_push module=sync status=ok response={echo}");
                    notifier.success("Quote synced to the server.");
                }
                Ok(Err(err)) => {
                    error!("event=sync_push module=sync status=error error={err}");
                    notifier.error(format!("Failed to push quote to the server: {err}"));
                }
                Err(_) => {
                    let err = SyncError::Timeout(timeout);
                    error!("event=sync_push module=sync status=error error={err}");
                    notifier.error(format!("Failed to push quote to the server: {err}"));
                }
            }
        })
    }

    async fn fetch_with_timeout(&self) -> SyncResult<Vec<Quote>> {
        tokio::time::timeout(self.request_timeout, self.remote.fetch_quotes())
            .await
            .map_err(|_| SyncError::Timeout(self.request_timeout))?
    }
}
