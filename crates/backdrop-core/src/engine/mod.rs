//! Poll loop
//!
//! The WatchEngine is responsible for:
//! - Fetching the current image URL via ImageSource
//! - Comparing it against the StateStore
//! - Announcing changes via Notifier
//! - Persisting the announced value
//!
//! ## Cycle
//!
//! ```text
//!  ┌─────────────┐  url   ┌─────────────┐ changed ┌────────────┐       ┌─────────────┐
//!  │ ImageSource │──────▶ │ StateStore  │───────▶ │  Notifier  │─────▶ │ StateStore  │
//!  │  (fetch)    │        │  (load)     │         │  (notify)  │       │  (save)     │
//!  └─────────────┘        └─────────────┘         └────────────┘       └─────────────┘
//!         │ nothing              │ unchanged                                  │
//!         └──────────────────────┴───────────────▶ Scheduler::wait() ◀────────┘
//! ```
//!
//! The value is saved after the notification attempt whether or not the
//! webhook confirmed it. A crash between the two steps can therefore repeat a
//! notification after restart, but never lose one.

use std::future::Future;

use crate::error::Error;
use crate::scheduler::Scheduler;
use crate::traits::{ImageSource, Notifier, StateStore};
use tracing::{debug, error, info, trace};

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The source returned nothing; store and notifier were not touched
    SourceUnavailable,

    /// The state could not be read; notifier was not touched
    StateUnavailable,

    /// The fetched URL equals the stored one
    Unchanged {
        image_url: String,
    },

    /// The fetched URL is new; a notification was attempted and the value saved
    Changed {
        previous: Option<String>,
        current: String,
        /// Whether the notifier confirmed delivery
        notified: bool,
        /// Whether the new value reached the store
        saved: bool,
    },
}

/// Poll loop composing source, store, notifier and scheduler
///
/// ## Lifecycle
///
/// 1. Create with [`WatchEngine::new()`]
/// 2. Drive single cycles with [`WatchEngine::run_cycle()`], or
/// 3. Loop with [`WatchEngine::run_until()`]
///
/// No failure inside a cycle ends the loop; only the shutdown future does.
pub struct WatchEngine {
    /// Where the current image URL comes from
    source: Box<dyn ImageSource>,

    /// Where changes are announced
    notifier: Box<dyn Notifier>,

    /// Last announced value
    state_store: Box<dyn StateStore>,

    /// Wait between cycles
    scheduler: Box<dyn Scheduler>,
}

impl WatchEngine {
    /// Create a new engine
    pub fn new(
        source: Box<dyn ImageSource>,
        notifier: Box<dyn Notifier>,
        state_store: Box<dyn StateStore>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            source,
            notifier,
            state_store,
            scheduler,
        }
    }

    /// Run cycles until `shutdown` resolves
    ///
    /// Shutdown is observed between cycles, never in the middle of one. Any
    /// signal handlers behind `shutdown` must already be installed when this
    /// is called.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting watcher (source={}, notifier={}, schedule={})",
            self.source.source_name(),
            self.notifier.notifier_name(),
            self.scheduler.describe()
        );

        tokio::pin!(shutdown);

        loop {
            let outcome = self.run_cycle().await;
            trace!("Cycle finished: {:?}", outcome);

            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received, watcher stopped");
                    break;
                }

                _ = self.scheduler.wait() => {}
            }
        }
    }

    /// Run a single fetch → compare → notify → persist cycle
    pub async fn run_cycle(&self) -> CycleOutcome {
        debug!("Fetching data from {}...", self.source.source_name());

        let current = match self.source.fetch_current().await {
            Ok(Some(url)) => url,
            Ok(None) => return CycleOutcome::SourceUnavailable,
            Err(e) => {
                log_source_error(&e);
                return CycleOutcome::SourceUnavailable;
            }
        };

        let previous = match self.state_store.load().await {
            Ok(record) => record,
            Err(e) => {
                error!("Failed to load previous state: {}", e);
                return CycleOutcome::StateUnavailable;
            }
        };

        if let Some(record) = &previous
            && !record.differs_from(&current)
        {
            debug!("No change in image URL.");
            return CycleOutcome::Unchanged { image_url: current };
        }

        info!(
            "New image detected ({} -> {})! Sending notification...",
            previous.as_ref().map(|r| r.image_url.as_str()).unwrap_or("none"),
            current
        );

        let notified = match self.notifier.notify(&current).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    "Failed to send notification via {}: {}",
                    self.notifier.notifier_name(),
                    e
                );
                false
            }
        };

        let saved = match self.state_store.save(&current).await {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving image data: {}", e);
                false
            }
        };

        CycleOutcome::Changed {
            previous: previous.map(|r| r.image_url),
            current,
            notified,
            saved,
        }
    }
}

fn log_source_error(e: &Error) {
    match e {
        Error::Json(_) => error!("Failed to parse API response as JSON: {}", e),
        _ => error!("API request failed: {}", e),
    }
}
