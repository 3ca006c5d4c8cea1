// # Image Source Trait
//
// Defines the interface for fetching the currently published image URL.
//
// ## Implementations
//
// - HTTP + JSON field extraction: `backdrop-source-http` crate
//
// ## Usage
//
// ```rust,ignore
// use backdrop_core::ImageSource;
//
// let source = /* ImageSource implementation */;
// if let Some(url) = source.fetch_current().await? {
//     println!("current image: {}", url);
// }
// ```

use async_trait::async_trait;

/// Trait for image source implementations
///
/// One call is one attempt: implementations must not retry, cache, or spawn
/// tasks. The engine decides what a failure means for the cycle.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch the current image URL
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))`: The endpoint published an image URL
    /// - `Ok(None)`: The response was valid but did not contain an image URL
    /// - `Err(Error)`: Transport failure, non-success status, or invalid JSON
    async fn fetch_current(&self) -> Result<Option<String>, crate::Error>;

    /// Short name used in log lines
    fn source_name(&self) -> &'static str;
}
