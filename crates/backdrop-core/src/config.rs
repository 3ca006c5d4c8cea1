//! Configuration types for the backdrop watcher
//!
//! Every component receives its slice of [`BackdropConfig`] at construction,
//! so endpoints and the state file can be swapped for test doubles.

use serde::{Deserialize, Serialize};

/// Default content endpoint publishing the dynamic backgrounds
pub const DEFAULT_SOURCE_URL: &str = "https://fortnitecontent-website-prod07.ol.epicgames.com/content/api/pages/fortnite-game/dynamicbackgrounds";

/// Default embed title
pub const DEFAULT_EMBED_TITLE: &str = "New Fortnite Dynamic Background";

/// Default embed description
pub const DEFAULT_EMBED_DESCRIPTION: &str = "A new dynamic background has been added!";

/// Default state file path
pub const DEFAULT_STATE_PATH: &str = "image_data.json";

/// Main backdrop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackdropConfig {
    /// Image source configuration
    #[serde(default)]
    pub source: SourceConfig,

    /// Webhook notifier configuration
    pub notifier: NotifierConfig,

    /// State store configuration
    #[serde(default)]
    pub state_store: StateStoreConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl BackdropConfig {
    /// Create a configuration with defaults for everything but the webhook
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            source: SourceConfig::default(),
            notifier: NotifierConfig::new(webhook_url),
            state_store: StateStoreConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.notifier.validate()?;
        self.state_store.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

/// Image source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL queried with a single GET per cycle
    #[serde(default = "default_source_url")]
    pub url: String,
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url("source URL", &self.url)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
        }
    }
}

/// Webhook notifier configuration
///
/// The webhook URL carries a secret token, so `Debug` redacts it.
#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Webhook endpoint receiving the POST
    pub webhook_url: String,

    /// Embed title
    #[serde(default = "default_embed_title")]
    pub title: String,

    /// Embed description
    #[serde(default = "default_embed_description")]
    pub description: String,
}

impl NotifierConfig {
    /// Create a notifier configuration with the default embed texts
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            title: default_embed_title(),
            description: default_embed_description(),
        }
    }

    /// Override the embed title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Override the embed description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate the notifier configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_http_url("webhook URL", &self.webhook_url)
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("webhook_url", &"<REDACTED>")
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

/// State store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateStoreConfig {
    /// File-based state store
    File {
        /// Path to the state file
        path: String,
    },

    /// In-memory state store (not persistent)
    Memory,
}

impl StateStoreConfig {
    /// Validate the state store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StateStoreConfig::File { path } if path.is_empty() => {
                Err(crate::Error::config("State file path cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for StateStoreConfig {
    fn default() -> Self {
        StateStoreConfig::File {
            path: DEFAULT_STATE_PATH.to_string(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds to wait between the end of one cycle and the start of the next
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_secs == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        Ok(())
    }

    /// Poll interval as a [`std::time::Duration`]
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.poll_interval_secs)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if url.is_empty() {
        return Err(crate::Error::config(format!("{} cannot be empty", what)));
    }
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme",
            what
        )));
    }
    Ok(())
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

fn default_embed_title() -> String {
    DEFAULT_EMBED_TITLE.to_string()
}

fn default_embed_description() -> String {
    DEFAULT_EMBED_DESCRIPTION.to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}
