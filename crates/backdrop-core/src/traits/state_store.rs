// # State Store Trait
//
// Defines the interface for persisting the last-seen image URL.
//
// ## Purpose
//
// The state store is what turns "the endpoint returned a URL" into "the URL
// changed": the engine compares every fetched value against the stored one.
//
// ## Implementations
//
// - File-based: single JSON object, see `state::file`
// - In-memory: see `state::memory`

use async_trait::async_trait;

/// The single persisted record
///
/// On disk this is `{"image_url": "<string>"}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    /// Image URL used in the most recent notification attempt
    pub image_url: String,
}

impl StateRecord {
    /// Create a new state record
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
        }
    }

    /// Whether `current` differs from the stored value
    pub fn differs_from(&self, current: &str) -> bool {
        self.image_url != current
    }
}

/// Trait for state store implementations
///
/// There is exactly one writer and reader (the engine), so implementations
/// need no locking discipline beyond what `Send + Sync` requires.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the stored record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StateRecord))`: A previous value exists
    /// - `Ok(None)`: No previous value (first run, missing or corrupt state)
    /// - `Err(Error)`: The state exists but could not be read
    async fn load(&self) -> Result<Option<StateRecord>, crate::Error>;

    /// Overwrite the stored record with `image_url`
    async fn save(&self, image_url: &str) -> Result<(), crate::Error>;
}
