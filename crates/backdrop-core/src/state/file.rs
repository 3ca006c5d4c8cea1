// # File State Store
//
// File-based implementation of StateStore.
//
// ## Purpose
//
// Keeps the last-seen image URL across restarts so a restart does not
// re-announce an image that was already announced.
//
// ## Crash Behavior
//
// - Writes go to a `.tmp` sibling first and are renamed over the state file
// - A missing file means "first run"
// - A file that does not decode is treated as "first run" as well; the next
//   change notification overwrites it
//
// ## File Format
//
// ```json
// {"image_url": "https://cdn.example.com/background.jpg"}
// ```

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::{StateRecord, StateStore};

/// File-based state store
///
/// # Example
///
/// ```rust,no_run
/// use backdrop_core::state::FileStateStore;
/// use backdrop_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/backdrop/image_data.json").await?;
///
///     store.save("https://cdn.example.com/a.jpg").await?;
///
///     let record = store.load().await?;
///     assert_eq!(record.map(|r| r.image_url).as_deref(), Some("https://cdn.example.com/a.jpg"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a file state store, creating parent directories if needed
    ///
    /// The file itself is not touched until the first `load` or `save`.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        Ok(Self { path })
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self) -> Result<Option<StateRecord>, Error> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("No previous data found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::state_store(format!(
                    "Failed to read state file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        // Invalid UTF-8 fails here like any other malformed JSON
        match serde_json::from_slice::<StateRecord>(&content) {
            Ok(record) => {
                tracing::debug!("Loaded previous image URL: {}", record.image_url);
                Ok(Some(record))
            }
            Err(e) => {
                tracing::warn!(
                    "State file {} is corrupted ({}), treating as first run",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, image_url: &str) -> Result<(), Error> {
        let json = serde_json::to_string(&StateRecord::new(image_url))
            .map_err(|e| Error::state_store(format!("Failed to serialize state: {}", e)))?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::info!("Saved new image URL: {}", image_url);
        Ok(())
    }
}
