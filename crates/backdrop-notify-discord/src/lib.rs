// # Discord Webhook Notifier
//
// Announces a new image URL as a webhook embed.
//
// ## Payload
//
// ```json
// {
//   "content": "",
//   "embeds": [{
//     "title": "New Fortnite Dynamic Background",
//     "description": "A new dynamic background has been added!",
//     "image": {"url": "<image_url>"},
//     "thumbnail": {"url": "<image_url>"}
//   }]
// }
// ```
//
// `content` stays empty so the URL is only rendered as an image, never as a
// plain-text link.
//
// ## Security
//
// The webhook URL contains the webhook token. It never appears in logs,
// error messages or `Debug` output.
//
// ## Delivery
//
// One POST per call, no retries. Only `204 No Content` counts as delivered.

use async_trait::async_trait;
use backdrop_core::config::NotifierConfig;
use backdrop_core::traits::Notifier;
use backdrop_core::{Error, Result};
use reqwest::StatusCode;
use serde::Serialize;

/// Status the webhook answers with on successful delivery
const DELIVERED: StatusCode = StatusCode::NO_CONTENT;

/// Webhook request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Plain-text message (always empty)
    pub content: String,
    /// Rich embeds
    pub embeds: Vec<Embed>,
}

/// A single embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub image: EmbedMedia,
    pub thumbnail: EmbedMedia,
}

/// Image reference inside an embed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedMedia {
    pub url: String,
}

impl WebhookPayload {
    /// Build the announcement for `image_url`
    pub fn announce(title: &str, description: &str, image_url: &str) -> Self {
        Self {
            content: String::new(),
            embeds: vec![Embed {
                title: title.to_string(),
                description: description.to_string(),
                image: EmbedMedia {
                    url: image_url.to_string(),
                },
                thumbnail: EmbedMedia {
                    url: image_url.to_string(),
                },
            }],
        }
    }
}

/// Discord webhook notifier
pub struct DiscordNotifier {
    /// Webhook endpoint
    /// ⚠️ NEVER log this value
    webhook_url: String,

    /// Embed title
    title: String,

    /// Embed description
    description: String,

    /// HTTP client
    client: reqwest::Client,
}

// Custom Debug implementation that hides the webhook URL
impl std::fmt::Debug for DiscordNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordNotifier")
            .field("webhook_url", &"<REDACTED>")
            .field("title", &self.title)
            .field("description", &self.description)
            .finish()
    }
}

impl DiscordNotifier {
    /// Create a notifier from configuration
    pub fn from_config(config: &NotifierConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(config, client))
    }

    /// Create a notifier that uses an existing client
    pub fn with_client(config: &NotifierConfig, client: reqwest::Client) -> Self {
        Self {
            webhook_url: config.webhook_url.clone(),
            title: config.title.clone(),
            description: config.description.clone(),
            client,
        }
    }

    /// Payload this notifier sends for `image_url`
    pub fn payload_for(&self, image_url: &str) -> WebhookPayload {
        WebhookPayload::announce(&self.title, &self.description, image_url)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn notify(&self, image_url: &str) -> Result<()> {
        tracing::debug!("Sending webhook to Discord...");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.payload_for(image_url))
            .send()
            .await
            // without_url keeps the webhook token out of the message
            .map_err(|e| Error::http(format!("Webhook request failed: {}", e.without_url())))?;

        let status = response.status();
        if status != DELIVERED {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::unexpected_status(status.as_u16(), body));
        }

        tracing::info!("Webhook sent successfully!");
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "discord"
    }
}
