//! Quotebook command-line view.
//!
//! # Responsibility
//! - Turn command-line arguments into core intents.
//! - Render view snapshots and notifications as plain text.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::warn;
use quotebook_core::service::quote_service::DEFAULT_EXPORT_FILE_NAME;
use quotebook_core::{
    db, init_logging, AppConfig, HttpQuoteSource, Intent, Notification, NotificationKind,
    Notifier, QuoteApp, QuoteRepository, QuoteService, SlotStore, SqliteSlotStore, SyncEngine,
    ViewSnapshot,
};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Random quotes with local storage and optional server sync
#[derive(Parser, Debug)]
#[command(name = "quotebook", version)]
#[command(about = "Shows, filters, stores and syncs quotes")]
struct Cli {
    /// Path of the durable quote store
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// REST resource used for sync
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Absolute directory for log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a random quote
    Show {
        /// Only draw from this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes, remembering the category filter
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Add a quote and push it to the server
    Add {
        text: String,
        category: String,
        /// Keep the quote local
        #[arg(long)]
        no_push: bool,
    },
    /// Write all quotes to a JSON file
    Export { path: Option<PathBuf> },
    /// Append quotes from a JSON file
    Import { path: PathBuf },
    /// Pull server quotes once
    Sync,
    /// Pull server quotes periodically until interrupted
    Watch {
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let durable = SqliteSlotStore::new(
        db::open_db(&config.db_path)
            .with_context(|| format!("failed to open {}", config.db_path.display()))?,
    );
    let session = SqliteSlotStore::new(db::open_db_in_memory()?);
    let repo = QuoteRepository::load(durable).context("failed to load stored quotes")?;
    let service = QuoteService::new(repo, session)?;

    let (notifier, inbox) = Notifier::channel();
    let mut app = QuoteApp::new(service, notifier.clone(), inbox, rand::thread_rng());

    let needs_sync = match &cli.command {
        Command::Add { no_push, .. } => !no_push,
        Command::Sync | Command::Watch { .. } => true,
        _ => false,
    };
    if needs_sync {
        let remote = HttpQuoteSource::new(
            &config.endpoint,
            config.request_timeout,
            config.fetch_limit,
        )
        .context("failed to build HTTP client")?;
        app = app.with_sync(SyncEngine::new(
            Arc::new(remote),
            notifier,
            config.request_timeout,
        ));
    }

    run(cli.command, &mut app, &config).await
}

fn resolve_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = &cli.db {
        config.db_path = path.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

async fn run<D, S, R>(
    command: Command,
    app: &mut QuoteApp<D, S, R>,
    config: &AppConfig,
) -> anyhow::Result<()>
where
    D: SlotStore,
    S: SlotStore,
    R: Rng,
{
    match command {
        Command::Show { category } => {
            let intent = match category {
                Some(category) => Intent::SetDrawFilter(category),
                None => Intent::ShowRandom,
            };
            let snapshot = app.dispatch(intent);
            println!("{}", snapshot.display);
            render_notifications(&snapshot.notifications);
        }
        Command::List { category } => {
            let snapshot = match category {
                Some(category) => app.dispatch(Intent::SetListFilter(category)),
                None => app.snapshot(None),
            };
            render_list(&snapshot);
        }
        Command::Categories => {
            let snapshot = app.snapshot(None);
            for category in &snapshot.categories {
                println!("{category}");
            }
        }
        Command::Add { text, category, .. } => {
            let snapshot = app.dispatch(Intent::AddQuote { text, category });
            render_notifications(&snapshot.notifications);
            render_notifications(&app.flush_pushes().await);
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE_NAME));
            let snapshot = app.dispatch(Intent::Export(path));
            render_notifications(&snapshot.notifications);
        }
        Command::Import { path } => {
            let snapshot = app.dispatch(Intent::Import(path));
            render_notifications(&snapshot.notifications);
        }
        Command::Sync => {
            let snapshot = app.sync().await;
            render_notifications(&snapshot.notifications);
        }
        Command::Watch { interval_secs } => {
            let period = interval_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(config.sync_interval);
            println!("Syncing every {}s; press Ctrl-C to stop.", period.as_secs());
            let shutdown = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(
                        "event=watch module=cli status=error error_code=signal_failed error={err}"
                    );
                }
            };
            app.watch(period, shutdown, |notifications| {
                render_notifications(&notifications)
            })
            .await;
        }
    }
    Ok(())
}

fn render_list(snapshot: &ViewSnapshot) {
    println!("Filter: {}", snapshot.list_filter);
    if snapshot.listed.is_empty() {
        println!("(no quotes)");
    }
    for quote in &snapshot.listed {
        println!("{}", quote.display_line());
    }
    render_notifications(&snapshot.notifications);
}

fn render_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let label = match notification.kind {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        eprintln!("[{label}] {}", notification.message);
    }
}
