// # backdrop-core
//
// Core library for the backdrop image change watcher.
//
// ## Architecture Overview
//
// - **ImageSource**: Trait for fetching the currently published image URL
// - **Notifier**: Trait for announcing a new image URL to a webhook
// - **StateStore**: Trait for persisting the last-seen image URL
// - **Scheduler**: Trait for the wait between two poll cycles
// - **WatchEngine**: Poll loop that composes the above (fetch → compare → notify → persist)
//
// ## Design Principles
//
// 1. **Library-First**: The poll loop is usable without the daemon
// 2. **Single-threaded**: One cycle at a time, one blocking step after another
// 3. **Failures stay local**: Every error is logged and skips the current cycle only

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod state;

pub use traits::{ImageSource, Notifier, StateStore, StateRecord};
pub use engine::{CycleOutcome, WatchEngine};
pub use config::{BackdropConfig, EngineConfig, NotifierConfig, SourceConfig, StateStoreConfig};
pub use error::{Error, Result};
pub use scheduler::{FixedInterval, Immediate, Scheduler};
pub use state::{FileStateStore, MemoryStateStore};
