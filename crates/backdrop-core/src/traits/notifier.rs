// # Notifier Trait
//
// Defines the interface for announcing a newly detected image URL.
//
// ## Implementations
//
// - Discord-style webhook embed: `backdrop-notify-discord` crate

use async_trait::async_trait;

/// Trait for notifier implementations
///
/// A notifier makes exactly one delivery attempt per call. Whether the
/// attempt succeeded is reported back, but the engine persists the new value
/// either way.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Announce `image_url`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The endpoint confirmed delivery
    /// - `Err(Error)`: Transport failure or unexpected status
    async fn notify(&self, image_url: &str) -> Result<(), crate::Error>;

    /// Short name used in log lines
    fn notifier_name(&self) -> &'static str;
}
