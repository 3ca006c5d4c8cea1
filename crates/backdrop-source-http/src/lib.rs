// # HTTP Image Source
//
// Fetches the currently published image URL with one GET per call.
//
// ## Response Shape
//
// ```json
// {"backgrounds": {"backgrounds": [{"backgroundimage": "https://..."}, ...]}}
// ```
//
// Only the first entry counts. Anything that does not match this shape is
// reported as "no image" rather than as an error.
//
// ## Failure Mapping
//
// - Transport failure or non-success status → `Error::Http`
// - Body is not JSON → `Error::Json`
// - JSON without a usable image URL → `Ok(None)` (logged here as a warning)
//
// No retries, no caching, no timeout override: the client defaults apply.

use async_trait::async_trait;
use backdrop_core::config::SourceConfig;
use backdrop_core::traits::ImageSource;
use backdrop_core::{Error, Result};
use serde_json::Value;

/// HTTP image source
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    /// Endpoint queried on every fetch
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpImageSource {
    /// Create a new HTTP image source for `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a source that uses an existing client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// Create a source from configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.url.clone())
    }

    /// Endpoint this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// GET the endpoint and decode the body as JSON
    async fn fetch_body(&self) -> Result<Value> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(format!("HTTP error: {}", status)));
        }

        let text = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        Ok(serde_json::from_str(&text)?)
    }
}

/// Extract `backgrounds.backgrounds[0].backgroundimage`
///
/// Returns `None` when any step of the path is missing, the value is not a
/// string, or the string is empty.
pub fn extract_image_url(body: &Value) -> Option<&str> {
    body["backgrounds"]["backgrounds"][0]["backgroundimage"]
        .as_str()
        .filter(|url| !url.is_empty())
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch_current(&self) -> Result<Option<String>> {
        let body = self.fetch_body().await?;

        match extract_image_url(&body) {
            Some(url) => {
                tracing::info!("Fetched image URL: {}", url);
                Ok(Some(url.to_string()))
            }
            None => {
                tracing::warn!("No valid background image found in API response!");
                Ok(None)
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
