// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Crash Behavior
//
// - State is lost on restart
// - The first cycle after a restart always announces the current image

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

/// In-memory state store implementation
///
/// Clones share the same underlying record.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<Option<StateRecord>>>,
}

impl MemoryStateStore {
    /// Create a new empty memory state store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `image_url`
    pub fn with_record(image_url: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(StateRecord::new(image_url)))),
        }
    }

    /// Current record without going through the trait
    pub async fn snapshot(&self) -> Option<StateRecord> {
        self.inner.read().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self) -> Result<Option<StateRecord>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, image_url: &str) -> Result<(), Error> {
        *self.inner.write().await = Some(StateRecord::new(image_url));
        Ok(())
    }
}
