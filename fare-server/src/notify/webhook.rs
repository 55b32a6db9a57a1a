//! Chat-webhook notifier.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use super::{Channel, Notifier};

/// Webhook URLs per channel. A channel without a URL is silent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookConfig {
    pub search: Option<String>,
    pub error: Option<String>,
    pub registration: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WebhookConfig {
    pub fn url(&self, channel: Channel) -> Option<&str> {
        match channel {
            Channel::Search => self.search.as_deref(),
            Channel::Error => self.error.as_deref(),
            Channel::Registration => self.registration.as_deref(),
        }
    }

    /// Whether any channel is configured.
    pub fn is_enabled(&self) -> bool {
        self.search.is_some() || self.error.is_some() || self.registration.is_some()
    }
}

/// Body accepted by common chat webhooks.
#[derive(Debug, Serialize)]
struct WebhookMessage {
    content: String,
}

/// Posts each notification to the channel's webhook on a background task.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    http: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;
        Ok(Self { http, config })
    }
}

impl Notifier for WebhookNotifier {
    fn notify(&self, channel: Channel, message: String) {
        let Some(url) = self.config.url(channel) else {
            return;
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(?channel, "no async runtime; notification dropped");
            return;
        };

        let http = self.http.clone();
        let url = url.to_string();
        runtime.spawn(async move {
            let body = WebhookMessage { content: message };
            match http.post(&url).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    debug!(?channel, "notification delivered");
                }
                Ok(response) => {
                    warn!(?channel, status = %response.status(), "webhook rejected notification");
                }
                Err(e) => {
                    warn!(?channel, error = %e, "webhook delivery failed");
                }
            }
        });
    }
}
