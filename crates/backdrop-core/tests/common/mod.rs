//! Test doubles shared by the poll loop contract tests
//!
//! Every double is `Clone` and shares its counters between clones, so a test
//! keeps one handle while the engine owns a boxed copy.

#![allow(dead_code)]

use backdrop_core::error::{Error, Result};
use backdrop_core::traits::{ImageSource, Notifier, StateRecord, StateStore};
use backdrop_core::{Immediate, WatchEngine};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a scripted source returns on one call
#[derive(Debug, Clone)]
pub enum Fetch {
    Url(&'static str),
    Nothing,
    NetworkDown,
}

/// An ImageSource replaying a script; the last entry repeats forever
#[derive(Clone)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Fetch>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Fetch>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn always(url: &'static str) -> Self {
        Self::new([Fetch::Url(url)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ImageSource for ScriptedSource {
    async fn fetch_current(&self) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let next = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(Fetch::Url(url)) => Ok(Some(url.to_string())),
            Some(Fetch::Nothing) | None => Ok(None),
            Some(Fetch::NetworkDown) => Err(Error::http("connection refused")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A Notifier recording every URL it was asked to announce
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose endpoint answers with an unexpected status
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, image_url: &str) -> Result<()> {
        self.sent.lock().unwrap().push(image_url.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::unexpected_status(500, "webhook down"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A StateStore counting loads and saves
#[derive(Clone, Default)]
pub struct CountingStateStore {
    record: Arc<Mutex<Option<StateRecord>>>,
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
    fail_load: Arc<AtomicBool>,
    fail_save: Arc<AtomicBool>,
}

impl CountingStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(image_url: &str) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(StateRecord::new(image_url));
        store
    }

    pub fn fail_loads(self) -> Self {
        self.fail_load.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_saves(self) -> Self {
        self.fail_save.store(true, Ordering::SeqCst);
        self
    }

    pub fn stored(&self) -> Option<String> {
        self.record
            .lock()
            .unwrap()
            .as_ref()
            .map(|r| r.image_url.clone())
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl StateStore for CountingStateStore {
    async fn load(&self) -> Result<Option<StateRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(Error::state_store("permission denied"));
        }
        Ok(self.record.lock().unwrap().clone())
    }

    async fn save(&self, image_url: &str) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::state_store("disk full"));
        }
        *self.record.lock().unwrap() = Some(StateRecord::new(image_url));
        Ok(())
    }
}

/// Engine wired to the given doubles and an immediate scheduler
pub fn engine_with(
    source: &ScriptedSource,
    notifier: &RecordingNotifier,
    store: &CountingStateStore,
) -> WatchEngine {
    WatchEngine::new(
        Box::new(source.clone()),
        Box::new(notifier.clone()),
        Box::new(store.clone()),
        Box::new(Immediate),
    )
}
